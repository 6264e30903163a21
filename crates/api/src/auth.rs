// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! There are no sessions. A caller is identified by account id and the
//! id is resolved against the store on every request.

use pilot_dispatch_audit::Actor;
use pilot_dispatch_domain::{Account, AccountId, Role, RoleClass};
use pilot_dispatch_persistence::{PersistenceError, Store};

use crate::error::AuthError;

/// An authenticated caller with the role of its account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The caller's account id.
    pub id: AccountId,
    /// The caller's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: AccountId, role: Role) -> Self {
        Self { id, role }
    }

    /// Builds the actor for an account.
    #[must_use]
    pub fn from_account(account: &Account) -> Self {
        Self::new(account.id().clone(), account.role())
    }

    /// Converts this actor into an audit actor.
    ///
    /// The audit actor type is the role's behavioral class.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        let actor_type: &str = match self.role.class() {
            RoleClass::Client => "client",
            RoleClass::Vendor => "vendor",
            RoleClass::Staff => "staff",
        };
        Actor::new(self.id.to_string(), String::from(actor_type))
    }

    /// Returns true if the actor is the given account.
    #[must_use]
    pub fn is(&self, id: &AccountId) -> bool {
        &self.id == id
    }
}

fn unauthorized(action: &str, required: &str) -> AuthError {
    AuthError::Unauthorized {
        action: action.to_string(),
        required_role: required.to_string(),
    }
}

/// Authorization service for enforcing role-based access control.
///
/// The workflow itself never checks roles; every handler calls one of
/// these first.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Requires any staff role.
    ///
    /// Used for assignment, review, staff listings and audit trails.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for clients and vendors.
    pub fn authorize_staff(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        if actor.role.is_staff() {
            Ok(())
        } else {
            Err(unauthorized(action, "a staff role"))
        }
    }

    /// Requires a vendor or any staff role.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for clients.
    pub fn authorize_staff_or_vendor(
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), AuthError> {
        match actor.role.class() {
            RoleClass::Staff | RoleClass::Vendor => Ok(()),
            RoleClass::Client => Err(unauthorized(action, "VENDOR or a staff role")),
        }
    }

    /// Requires the owning vendor, or a super admin.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for anyone else.
    pub fn authorize_vendor_self(
        actor: &AuthenticatedActor,
        vendor_id: &AccountId,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.role == Role::SuperAdmin || (actor.role == Role::Vendor && actor.is(vendor_id)) {
            Ok(())
        } else {
            Err(unauthorized(action, "the owning vendor or SUPER_ADMIN"))
        }
    }

    /// Requires the account itself, or any staff role.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for other clients and vendors.
    pub fn authorize_self_or_staff(
        actor: &AuthenticatedActor,
        account_id: &AccountId,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.is(account_id) || actor.role.is_staff() {
            Ok(())
        } else {
            Err(unauthorized(action, "the account itself or a staff role"))
        }
    }

    /// Requires the account itself, or a super admin.
    ///
    /// Used for notification logs, which are private to their recipient.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for anyone else.
    pub fn authorize_self_or_super_admin(
        actor: &AuthenticatedActor,
        account_id: &AccountId,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.is(account_id) || actor.role == Role::SuperAdmin {
            Ok(())
        } else {
            Err(unauthorized(action, "the account itself or SUPER_ADMIN"))
        }
    }

    /// Requires a client or any staff role.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for vendors.
    pub fn authorize_submit_order(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role.class() {
            RoleClass::Client | RoleClass::Staff => Ok(()),
            RoleClass::Vendor => Err(unauthorized("submit_order", "CLIENT or a staff role")),
        }
    }

    /// Requires `CONTENT_MARKETING` or `SUPER_ADMIN`.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for every other role.
    pub fn authorize_create_post(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::ContentMarketing | Role::SuperAdmin => Ok(()),
            _ => Err(unauthorized("create_post", "CONTENT_MARKETING or SUPER_ADMIN")),
        }
    }

    /// Decides who may create an account with `role`.
    ///
    /// Anyone, including an anonymous caller, may register a client or
    /// vendor. Staff accounts are created by a super admin.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when a staff account is requested by anyone
    /// other than a super admin.
    pub fn authorize_register(
        actor: Option<&AuthenticatedActor>,
        role: Role,
    ) -> Result<(), AuthError> {
        if !role.is_staff() || actor.is_some_and(|a| a.role == Role::SuperAdmin) {
            Ok(())
        } else {
            Err(unauthorized("register_staff_account", "SUPER_ADMIN"))
        }
    }
}

/// Resolves callers and checks credentials against the store.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Resolves a caller id to an actor.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the id is empty or unknown.
    pub fn resolve_actor<S: Store + ?Sized>(
        store: &S,
        actor_id: &str,
    ) -> Result<AuthenticatedActor, AuthError> {
        let actor_id: &str = actor_id.trim();
        if actor_id.is_empty() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Actor id cannot be empty"),
            });
        }

        match store.get_account(&AccountId::new(actor_id)) {
            Ok(row) => Ok(AuthenticatedActor::from_account(&row.value)),
            Err(PersistenceError::NotFound { .. }) => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown actor '{actor_id}'"),
            }),
            Err(err) => Err(AuthError::AuthenticationFailed {
                reason: err.to_string(),
            }),
        }
    }

    /// Checks an email and password.
    ///
    /// Unknown emails and wrong passwords produce the same error.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the credentials do not match.
    pub fn authenticate<S: Store + ?Sized>(
        store: &S,
        email: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        match store.verify_credentials(email, password) {
            Ok(Some(account)) => Ok(account),
            Ok(None) => Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid email or password"),
            }),
            Err(err) => Err(AuthError::AuthenticationFailed {
                reason: err.to_string(),
            }),
        }
    }
}
