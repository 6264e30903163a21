// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Accounts as a single tagged entity.
//!
//! A vendor is one variant of an account rather than a user record plus a
//! separate vendor record.

use crate::error::DomainError;
use crate::role::Role;
use crate::types::AccountId;
use crate::vendor::Vendor;
use serde::{Deserialize, Serialize};

/// Identity fields shared by every kind of account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Unique account id.
    pub id: AccountId,
    /// Contact name.
    pub name: String,
    /// Unique email address (stored lowercase).
    pub email: String,
    /// Company name, if any.
    #[serde(default)]
    pub company_name: Option<String>,
    /// US DOT number for trucking clients.
    #[serde(default)]
    pub dot_number: Option<String>,
}

impl Identity {
    /// Creates a new identity.
    ///
    /// The email is trimmed and lowercased so uniqueness is case-insensitive.
    #[must_use]
    pub fn new(
        id: AccountId,
        name: &str,
        email: &str,
        company_name: Option<String>,
        dot_number: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            company_name,
            dot_number,
        }
    }

    /// Returns the company name, falling back to the contact name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.company_name.as_deref().unwrap_or(&self.name)
    }
}

/// An account of one of the three behavioral classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Account {
    /// A trucking client.
    Client(Identity),
    /// A pilot-car vendor.
    Vendor(Vendor),
    /// An internal staff member with one of the six staff roles.
    Staff {
        /// The staff role.
        role: Role,
        /// The account identity.
        #[serde(flatten)]
        identity: Identity,
    },
}

impl Account {
    /// Builds an account for the given role.
    ///
    /// Vendor accounts start with the defaults of a new registration.
    #[must_use]
    pub fn for_role(role: Role, identity: Identity) -> Self {
        match role {
            Role::Client => Self::Client(identity),
            Role::Vendor => Self::Vendor(Vendor::new(identity)),
            Role::LeadDispatcher
            | Role::Dispatcher
            | Role::PermitAgent
            | Role::Supervisor
            | Role::ContentMarketing
            | Role::SuperAdmin => Self::Staff { role, identity },
        }
    }

    /// Builds a staff account.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStaffRole` if the role is Client or Vendor.
    pub fn staff(role: Role, identity: Identity) -> Result<Self, DomainError> {
        if role.is_staff() {
            Ok(Self::Staff { role, identity })
        } else {
            Err(DomainError::InvalidStaffRole(role))
        }
    }

    /// Returns the account's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Client(_) => Role::Client,
            Self::Vendor(_) => Role::Vendor,
            Self::Staff { role, .. } => *role,
        }
    }

    /// Returns the identity fields.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        match self {
            Self::Client(identity) | Self::Staff { identity, .. } => identity,
            Self::Vendor(vendor) => &vendor.identity,
        }
    }

    /// Returns the identity fields for in-place normalization.
    pub const fn identity_mut(&mut self) -> &mut Identity {
        match self {
            Self::Client(identity) | Self::Staff { identity, .. } => identity,
            Self::Vendor(vendor) => &mut vendor.identity,
        }
    }

    /// Returns the account id.
    #[must_use]
    pub const fn id(&self) -> &AccountId {
        &self.identity().id
    }

    /// Returns the vendor view of this account, if it is a vendor.
    #[must_use]
    pub const fn as_vendor(&self) -> Option<&Vendor> {
        match self {
            Self::Vendor(vendor) => Some(vendor),
            Self::Client(_) | Self::Staff { .. } => None,
        }
    }

    /// Returns true for staff accounts.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Staff { .. })
    }

    /// Returns the vendor view, or an error naming the account.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotAVendor` if the account is not a vendor.
    pub fn into_vendor(self) -> Result<Vendor, DomainError> {
        match self {
            Self::Vendor(vendor) => Ok(vendor),
            Self::Client(identity) | Self::Staff { identity, .. } => {
                Err(DomainError::NotAVendor(identity.id))
            }
        }
    }
}
