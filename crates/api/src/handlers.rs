// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The dispatch service: every marketplace operation behind authorization.
//!
//! Each operation follows the same shape:
//! 1. Check the caller's authority
//! 2. Wait out the configured latency
//! 3. Read a versioned snapshot and apply the pure core transition
//! 4. Commit with compare-and-swap, re-reading on a version conflict.
//!    Order commits that checked a vendor confirm it is still eligible,
//!    and swap the order back if not.
//! 5. Record the audit event, append notifications, publish live events

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use pilot_dispatch::{
    NotificationDraft, OrderCommand, OrderTransition, Registration, RegistrationResult,
    VendorCommand, VendorTransition, apply_order_command, apply_registration, apply_submission,
    apply_vendor_command, available_loads, loads_by_status,
};
use pilot_dispatch_audit::{Action, AuditEvent, Cause, StateSnapshot, Subject};
use pilot_dispatch_domain::{
    Account, AccountId, BlogPost, DomainError, Notification, NotificationId, OrderId,
    OrderStatus, Permit, PilotOrder, Role, RoleClass, Vendor, VendorLocation,
    VendorProfileUpdate, eligible_candidates, is_eligible_for_assignment, slugify,
    sort_for_assignment, validate_order_draft,
};
use pilot_dispatch_persistence::{PersistenceError, Store, Versioned};
use time::{Date, OffsetDateTime};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::capabilities::compute_capabilities;
use crate::error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    AssignRequest, AssignmentCandidates, Capabilities, CreatePostRequest, CredentialView,
    LiveEvent, LoginRequest, LoginResponse, OrderResponse, RegisterRequest, RegisterResponse,
    ShareLocationRequest, SubmitOrderRequest, UpdateAvailabilityRequest,
};

/// Service tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Delay applied before every operation touches the store.
    pub latency: Duration,
    /// Attempts per mutation before giving up on a contended record.
    pub max_cas_retries: u32,
    /// Rules for registration passwords.
    pub password_policy: PasswordPolicy,
    /// Live events buffered per slow subscriber before it lags.
    pub live_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            max_cas_retries: 16,
            password_policy: PasswordPolicy::default(),
            live_capacity: 256,
        }
    }
}

/// The marketplace operations, over any [`Store`].
pub struct DispatchService<S> {
    store: Arc<S>,
    config: ServiceConfig,
    live: broadcast::Sender<LiveEvent>,
}

impl<S: Store + 'static> DispatchService<S> {
    /// Creates a service over a store.
    #[must_use]
    pub fn new(store: Arc<S>, config: ServiceConfig) -> Self {
        let (live, _) = broadcast::channel(config.live_capacity.max(1));
        Self {
            store,
            config,
            live,
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Subscribes to live events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.live.subscribe()
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    async fn simulate_latency(&self) {
        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }
    }

    const fn max_attempts(&self) -> u32 {
        if self.config.max_cas_retries == 0 {
            1
        } else {
            self.config.max_cas_retries
        }
    }

    fn publish(&self, event: LiveEvent) {
        if self.live.send(event).is_err() {
            debug!("No live subscribers");
        }
    }

    fn record_audit(&self, event: AuditEvent) -> Result<(), ApiError> {
        let recorded: AuditEvent = self
            .store
            .record_audit_event(event)
            .map_err(translate_persistence_error)?;
        debug!(
            event_id = recorded.event_id,
            action = %recorded.action.name,
            "Audit event recorded"
        );
        Ok(())
    }

    fn deliver_notifications(
        &self,
        drafts: Vec<NotificationDraft>,
        now: OffsetDateTime,
    ) -> Result<(), ApiError> {
        if drafts.is_empty() {
            return Ok(());
        }
        let created: Vec<Notification> = self
            .store
            .append_notifications(drafts, now)
            .map_err(translate_persistence_error)?;
        info!(count = created.len(), "Notifications delivered");
        for notification in created {
            self.publish(LiveEvent::Notification { notification });
        }
        Ok(())
    }

    /// Maps a store miss to a domain not-found error.
    fn not_found_as(err: PersistenceError, domain: DomainError) -> ApiError {
        match err {
            PersistenceError::NotFound { .. } => translate_domain_error(domain),
            other => translate_persistence_error(other),
        }
    }

    fn load_order(&self, id: &OrderId) -> Result<Versioned<PilotOrder>, ApiError> {
        self.store
            .get_order(id)
            .map_err(|err| Self::not_found_as(err, DomainError::OrderNotFound(id.clone())))
    }

    fn load_account(&self, id: &AccountId) -> Result<Versioned<Account>, ApiError> {
        self.store
            .get_account(id)
            .map_err(|err| Self::not_found_as(err, DomainError::AccountNotFound(id.clone())))
    }

    /// Loads a vendor; an account of another kind counts as missing.
    fn load_vendor(&self, id: &AccountId) -> Result<Versioned<Vendor>, ApiError> {
        let row: Versioned<Account> = self
            .store
            .get_account(id)
            .map_err(|err| Self::not_found_as(err, DomainError::VendorNotFound(id.clone())))?;
        match row.value {
            Account::Vendor(vendor) => Ok(Versioned {
                version: row.version,
                value: vendor,
            }),
            Account::Client(_) | Account::Staff { .. } => Err(translate_domain_error(
                DomainError::VendorNotFound(id.clone()),
            )),
        }
    }

    fn all_vendors(&self) -> Result<Vec<Vendor>, ApiError> {
        Ok(self
            .store
            .list_accounts()
            .map_err(translate_persistence_error)?
            .into_iter()
            .filter_map(|account| account.as_vendor().cloned())
            .collect())
    }

    fn all_orders(&self) -> Result<Vec<PilotOrder>, ApiError> {
        self.store.list_orders().map_err(translate_persistence_error)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Creates an account.
    ///
    /// Clients and vendors may self-register with no caller. Staff accounts
    /// need a super admin caller.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The role is unknown, or is staff without a super admin caller
    /// - The password breaks the policy
    /// - The name or email is invalid, or the email is taken
    pub async fn register(
        &self,
        actor: Option<&AuthenticatedActor>,
        request: RegisterRequest,
        cause: Cause,
    ) -> Result<RegisterResponse, ApiError> {
        let role: Role = Role::from_str(&request.role).map_err(translate_domain_error)?;
        AuthorizationService::authorize_register(actor, role)?;
        self.config.password_policy.validate(
            &request.password,
            &request.password_confirmation,
            &request.email,
            &request.name,
        )?;

        self.simulate_latency().await;

        let accounts: Vec<Account> = self
            .store
            .list_accounts()
            .map_err(translate_persistence_error)?;
        let account_id: AccountId = self.store.next_account_id();
        let audit_actor = actor.map_or_else(
            || AuthenticatedActor::new(account_id.clone(), role).to_audit_actor(),
            AuthenticatedActor::to_audit_actor,
        );

        let registration: Registration = Registration {
            name: request.name,
            email: request.email,
            role,
            company_name: request.company_name,
            dot_number: request.dot_number,
        };
        let result: RegistrationResult = apply_registration(
            account_id,
            registration,
            accounts.iter().map(|a| a.identity().email.as_str()),
            audit_actor,
            cause,
            OffsetDateTime::now_utc(),
        )
        .map_err(translate_core_error)?;

        let store: Arc<S> = Arc::clone(&self.store);
        let account: Account = result.account.clone();
        let password: String = request.password;
        tokio::task::spawn_blocking(move || store.insert_account(account, &password))
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("Registration task failed: {e}"),
            })?
            .map_err(translate_persistence_error)?;
        self.record_audit(result.audit_event)?;

        info!(
            account_id = %result.account.id(),
            role = %role,
            "Account registered"
        );
        Ok(RegisterResponse {
            message: format!(
                "Registered {} account '{}'",
                role,
                result.account.identity().email
            ),
            account: result.account,
        })
    }

    /// Checks credentials and returns the account with its capabilities.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the email or password is wrong.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        self.simulate_latency().await;

        let store: Arc<S> = Arc::clone(&self.store);
        let account: Account = tokio::task::spawn_blocking(move || {
            AuthenticationService::authenticate(store.as_ref(), &request.email, &request.password)
        })
        .await
        .map_err(|e| ApiError::Internal {
            message: format!("Login task failed: {e}"),
        })??;

        info!(account_id = %account.id(), "Login succeeded");
        Ok(LoginResponse {
            capabilities: compute_capabilities(account.role()),
            account,
        })
    }

    /// Resolves a caller id to an actor.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the id is empty or unknown.
    pub fn resolve_actor(&self, actor_id: &str) -> Result<AuthenticatedActor, ApiError> {
        Ok(AuthenticationService::resolve_actor(
            self.store.as_ref(),
            actor_id,
        )?)
    }

    /// Returns what the caller may do.
    #[must_use]
    pub const fn capabilities(actor: &AuthenticatedActor) -> Capabilities {
        compute_capabilities(actor.role)
    }

    /// Reads one account.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is the account or staff,
    /// and `ResourceNotFound` for an unknown id.
    pub async fn get_account(
        &self,
        actor: &AuthenticatedActor,
        account_id: &AccountId,
    ) -> Result<Account, ApiError> {
        AuthorizationService::authorize_self_or_staff(actor, account_id, "get_account")?;
        self.simulate_latency().await;
        Ok(self.load_account(account_id)?.value)
    }

    /// Lists every account.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-staff callers.
    pub async fn list_accounts(&self, actor: &AuthenticatedActor) -> Result<Vec<Account>, ApiError> {
        AuthorizationService::authorize_staff(actor, "list_accounts")?;
        self.simulate_latency().await;
        self.store.list_accounts().map_err(translate_persistence_error)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Submits a new order and tells every staff account about it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is a vendor, or a client ordering for someone else
    /// - A staff caller omits `client_id`, or it names a non-client
    /// - The draft fails validation
    pub async fn submit_order(
        &self,
        actor: &AuthenticatedActor,
        request: SubmitOrderRequest,
        cause: Cause,
    ) -> Result<OrderResponse, ApiError> {
        AuthorizationService::authorize_submit_order(actor)?;

        let client_id: AccountId = match (actor.role.class(), request.client_id) {
            (RoleClass::Client, None) => actor.id.clone(),
            (RoleClass::Client, Some(id)) if actor.is(&id) => id,
            (RoleClass::Client | RoleClass::Vendor, Some(_)) => {
                return Err(AuthError::Unauthorized {
                    action: String::from("submit_order_for_other_client"),
                    required_role: String::from("a staff role"),
                }
                .into());
            }
            (_, Some(id)) => id,
            (_, None) => {
                return Err(ApiError::InvalidInput {
                    field: String::from("client_id"),
                    message: String::from("Staff must name the client the order is for"),
                });
            }
        };

        let client: Account = self.load_account(&client_id)?.value;
        let Account::Client(identity) = client else {
            return Err(ApiError::InvalidInput {
                field: String::from("client_id"),
                message: format!("Account {client_id} is not a client"),
            });
        };
        validate_order_draft(&request.draft).map_err(translate_domain_error)?;

        self.simulate_latency().await;

        let accounts: Vec<Account> = self
            .store
            .list_accounts()
            .map_err(translate_persistence_error)?;
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let transition: OrderTransition = apply_submission(
            self.store.next_order_id(),
            &identity,
            &request.draft,
            &accounts,
            actor.to_audit_actor(),
            cause,
            now,
        )
        .map_err(translate_core_error)?;

        let order: PilotOrder = transition.new_order;
        self.store
            .insert_order(order.clone())
            .map_err(translate_persistence_error)?;
        self.record_audit(transition.audit_event)?;
        self.deliver_notifications(transition.notifications, now)?;
        self.publish(LiveEvent::order_status(&order));

        info!(order_id = %order.id, client_id = %client_id, "Order submitted");
        Ok(OrderResponse {
            message: format!("Order {} submitted", order.id),
            order,
        })
    }

    /// Lists every order.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-staff callers.
    pub async fn list_orders(
        &self,
        actor: &AuthenticatedActor,
    ) -> Result<Vec<PilotOrder>, ApiError> {
        AuthorizationService::authorize_staff(actor, "list_orders")?;
        self.simulate_latency().await;
        self.all_orders()
    }

    /// Reads one order.
    ///
    /// Staff see every order; clients see their own; vendors see orders
    /// assigned to them.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown id, or `Unauthorized`.
    pub async fn get_order(
        &self,
        actor: &AuthenticatedActor,
        order_id: &OrderId,
    ) -> Result<PilotOrder, ApiError> {
        self.simulate_latency().await;
        let order: PilotOrder = self.load_order(order_id)?.value;
        let visible: bool = actor.role.is_staff()
            || order.belongs_to(&actor.id)
            || order.assigned_vendor_id.as_ref() == Some(&actor.id);
        if visible {
            Ok(order)
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("get_order"),
                required_role: String::from("the ordering client, assigned vendor, or staff"),
            }
            .into())
        }
    }

    /// Orders submitted by one client.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is the client or staff.
    pub async fn orders_for_client(
        &self,
        actor: &AuthenticatedActor,
        client_id: &AccountId,
    ) -> Result<Vec<PilotOrder>, ApiError> {
        AuthorizationService::authorize_self_or_staff(actor, client_id, "orders_for_client")?;
        self.simulate_latency().await;
        Ok(self
            .all_orders()?
            .into_iter()
            .filter(|order| order.belongs_to(client_id))
            .collect())
    }

    /// Orders whose status is any of `statuses`.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-staff callers and `InvalidInput`
    /// for an unknown status string.
    pub async fn loads_by_status(
        &self,
        actor: &AuthenticatedActor,
        statuses: &[String],
    ) -> Result<Vec<PilotOrder>, ApiError> {
        AuthorizationService::authorize_staff(actor, "loads_by_status")?;
        let statuses: Vec<OrderStatus> = statuses
            .iter()
            .map(|s| OrderStatus::from_str(s))
            .collect::<Result<_, _>>()
            .map_err(translate_domain_error)?;
        self.simulate_latency().await;
        Ok(loads_by_status(&self.all_orders()?, &statuses))
    }

    /// The available-loads board: every New or Pending Assignment order.
    ///
    /// The board carries other clients' orders, so clients cannot read it.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for clients.
    pub async fn available_loads(
        &self,
        actor: &AuthenticatedActor,
    ) -> Result<Vec<PilotOrder>, ApiError> {
        AuthorizationService::authorize_staff_or_vendor(actor, "available_loads")?;
        self.simulate_latency().await;
        Ok(available_loads(&self.all_orders()?))
    }

    /// Orders a dispatcher is responsible for that await a vendor.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-staff callers.
    pub async fn orders_for_dispatcher(
        &self,
        actor: &AuthenticatedActor,
        dispatcher_id: &AccountId,
    ) -> Result<Vec<PilotOrder>, ApiError> {
        AuthorizationService::authorize_staff(actor, "orders_for_dispatcher")?;
        self.simulate_latency().await;
        Ok(self
            .all_orders()?
            .into_iter()
            .filter(|order| {
                order.status == OrderStatus::PendingAssignment
                    && order.assigned_dispatcher_id.as_ref() == Some(dispatcher_id)
            })
            .collect())
    }

    /// Orders assigned to a vendor, in any status.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is the vendor or staff.
    pub async fn orders_for_vendor(
        &self,
        actor: &AuthenticatedActor,
        vendor_id: &AccountId,
    ) -> Result<Vec<PilotOrder>, ApiError> {
        AuthorizationService::authorize_self_or_staff(actor, vendor_id, "orders_for_vendor")?;
        self.simulate_latency().await;
        Ok(self
            .all_orders()?
            .into_iter()
            .filter(|order| order.assigned_vendor_id.as_ref() == Some(vendor_id))
            .collect())
    }

    /// The audit trail of one order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-staff callers and `ResourceNotFound`
    /// for an unknown order.
    pub async fn order_audit_trail(
        &self,
        actor: &AuthenticatedActor,
        order_id: &OrderId,
    ) -> Result<Vec<AuditEvent>, ApiError> {
        AuthorizationService::authorize_staff(actor, "order_audit_trail")?;
        self.simulate_latency().await;
        self.load_order(order_id)?;
        self.store
            .audit_events_for_order(order_id)
            .map_err(translate_persistence_error)
    }

    /// Proposes a vendor for an order, moving it to Pending Review.
    ///
    /// The caller is recorded as the order's dispatcher.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The caller is not staff
    /// - The order or vendor does not exist
    /// - The account is not a vendor
    /// - The order is not New or Pending Assignment
    /// - The vendor is not Available
    pub async fn assign(
        &self,
        actor: &AuthenticatedActor,
        order_id: &OrderId,
        request: AssignRequest,
        cause: Cause,
    ) -> Result<OrderResponse, ApiError> {
        let vendor_id: AccountId = request.vendor_id;
        let command: OrderCommand = OrderCommand::Assign {
            vendor_id: vendor_id.clone(),
            dispatcher_id: actor.id.clone(),
        };
        let order: PilotOrder = self
            .run_order_command(actor, order_id, command, cause)
            .await?;
        Ok(OrderResponse {
            message: format!("Vendor {vendor_id} proposed for order {order_id}"),
            order,
        })
    }

    /// Approves the proposed vendor and notifies it.
    ///
    /// The vendor's availability is checked again at approval time.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not staff, the order is unknown
    /// or not Pending Review, or the vendor is no longer Available.
    pub async fn approve(
        &self,
        actor: &AuthenticatedActor,
        order_id: &OrderId,
        cause: Cause,
    ) -> Result<OrderResponse, ApiError> {
        let order: PilotOrder = self
            .run_order_command(actor, order_id, OrderCommand::Approve, cause)
            .await?;
        Ok(OrderResponse {
            message: format!(
                "Order {order_id} approved; vendor {} assigned",
                order
                    .assigned_vendor_id
                    .as_ref()
                    .map_or("none", AccountId::value)
            ),
            order,
        })
    }

    /// Rejects the proposed vendor, returning the order to Pending Assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller is not staff or the order is unknown
    /// or not Pending Review.
    pub async fn decline(
        &self,
        actor: &AuthenticatedActor,
        order_id: &OrderId,
        cause: Cause,
    ) -> Result<OrderResponse, ApiError> {
        let order: PilotOrder = self
            .run_order_command(actor, order_id, OrderCommand::Decline, cause)
            .await?;
        Ok(OrderResponse {
            message: format!("Order {order_id} declined; returned to {}", order.status),
            order,
        })
    }

    /// Resolves the vendor an order command needs, with the version it
    /// was read at.
    ///
    /// Approval passes `None` when the recorded vendor has vanished, so
    /// the transition reports it.
    fn vendor_for_command(
        &self,
        order: &PilotOrder,
        command: &OrderCommand,
    ) -> Result<Option<Versioned<Vendor>>, ApiError> {
        match command {
            OrderCommand::Assign { vendor_id, .. } => self.load_vendor(vendor_id).map(Some),
            OrderCommand::Approve => {
                let Some(vendor_id) = order.assigned_vendor_id.as_ref() else {
                    return Ok(None);
                };
                match self.store.get_account(vendor_id) {
                    Ok(row) => Ok(row.value.as_vendor().map(|vendor| Versioned {
                        version: row.version,
                        value: vendor.clone(),
                    })),
                    Err(PersistenceError::NotFound { .. }) => Ok(None),
                    Err(err) => Err(translate_persistence_error(err)),
                }
            }
            OrderCommand::Decline => Ok(None),
        }
    }

    /// Returns false if the vendor a transition was checked against has
    /// since changed into one that may not be assigned.
    fn vendor_still_eligible(&self, checked: &Versioned<Vendor>) -> Result<bool, ApiError> {
        let row: Versioned<Account> = match self.store.get_account(checked.value.id()) {
            Ok(row) => row,
            Err(PersistenceError::NotFound { .. }) => return Ok(false),
            Err(err) => return Err(translate_persistence_error(err)),
        };
        if row.version == checked.version {
            return Ok(true);
        }
        Ok(row.value.as_vendor().is_some_and(is_eligible_for_assignment))
    }

    fn revert_order(
        &self,
        order_id: &OrderId,
        stored_version: u64,
        previous: PilotOrder,
    ) -> Result<(), ApiError> {
        match self
            .store
            .compare_and_swap_order(order_id, stored_version, previous)
        {
            Ok(_) => Ok(()),
            Err(PersistenceError::VersionConflict { .. }) => Err(ApiError::DomainRuleViolation {
                rule: String::from("concurrent_modification"),
                message: format!("Order {order_id} is being modified concurrently; try again"),
            }),
            Err(err) => Err(translate_persistence_error(err)),
        }
    }

    async fn run_order_command(
        &self,
        actor: &AuthenticatedActor,
        order_id: &OrderId,
        command: OrderCommand,
        cause: Cause,
    ) -> Result<PilotOrder, ApiError> {
        AuthorizationService::authorize_staff(actor, command.action_name())?;
        self.simulate_latency().await;

        for attempt in 1..=self.max_attempts() {
            let current: Versioned<PilotOrder> = self.load_order(order_id)?;
            let vendor: Option<Versioned<Vendor>> =
                self.vendor_for_command(&current.value, &command)?;
            let now: OffsetDateTime = OffsetDateTime::now_utc();

            let transition: OrderTransition = apply_order_command(
                &current.value,
                vendor.as_ref().map(|row| &row.value),
                command.clone(),
                actor.to_audit_actor(),
                cause.clone(),
                now,
            )
            .map_err(translate_core_error)?;

            match self.store.compare_and_swap_order(
                order_id,
                current.version,
                transition.new_order.clone(),
            ) {
                Ok(stored) => {
                    // The vendor is read before the order swap; undo the
                    // swap if the vendor changed underneath it.
                    if let Some(checked) = &vendor
                        && !self.vendor_still_eligible(checked)?
                    {
                        self.revert_order(order_id, stored.version, current.value)?;
                        debug!(
                            order_id = %order_id,
                            attempt,
                            vendor_id = %checked.value.id(),
                            "Vendor changed during commit; re-evaluating"
                        );
                        continue;
                    }
                    self.record_audit(transition.audit_event)?;
                    self.deliver_notifications(transition.notifications, now)?;
                    self.publish(LiveEvent::order_status(&transition.new_order));
                    info!(
                        order_id = %order_id,
                        action = command.action_name(),
                        actor = %actor.id,
                        status = %transition.new_order.status,
                        "Order transition committed"
                    );
                    return Ok(transition.new_order);
                }
                Err(PersistenceError::VersionConflict {
                    expected, actual, ..
                }) => {
                    debug!(
                        order_id = %order_id,
                        attempt,
                        expected,
                        actual,
                        "Order changed concurrently; re-reading"
                    );
                }
                Err(err) => return Err(translate_persistence_error(err)),
            }
        }

        warn!(
            order_id = %order_id,
            action = command.action_name(),
            "Gave up on contended order"
        );
        Err(ApiError::DomainRuleViolation {
            rule: String::from("concurrent_modification"),
            message: format!("Order {order_id} is being modified concurrently; try again"),
        })
    }

    // ========================================================================
    // Vendors
    // ========================================================================

    /// Lists every vendor in registration order.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-staff callers.
    pub async fn list_vendors(&self, actor: &AuthenticatedActor) -> Result<Vec<Vendor>, ApiError> {
        AuthorizationService::authorize_staff(actor, "list_vendors")?;
        self.simulate_latency().await;
        self.all_vendors()
    }

    /// Vendors for the assignment picker.
    ///
    /// `all` holds every vendor with Available ones first; `eligible` holds
    /// only the Available ones, in the same order.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-staff callers.
    pub async fn assignment_candidates(
        &self,
        actor: &AuthenticatedActor,
    ) -> Result<AssignmentCandidates, ApiError> {
        AuthorizationService::authorize_staff(actor, "assignment_candidates")?;
        self.simulate_latency().await;
        let mut all: Vec<Vendor> = self.all_vendors()?;
        sort_for_assignment(&mut all);
        Ok(AssignmentCandidates {
            eligible: eligible_candidates(&all),
            all,
        })
    }

    /// Reads one vendor.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the id is not a vendor.
    pub async fn get_vendor(
        &self,
        _actor: &AuthenticatedActor,
        vendor_id: &AccountId,
    ) -> Result<Vendor, ApiError> {
        self.simulate_latency().await;
        Ok(self.load_vendor(vendor_id)?.value)
    }

    /// A vendor's credentials and whether each is active on `as_of`.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is the vendor or staff, and
    /// `ResourceNotFound` for an unknown vendor.
    pub async fn vendor_credentials(
        &self,
        actor: &AuthenticatedActor,
        vendor_id: &AccountId,
        as_of: Date,
    ) -> Result<Vec<CredentialView>, ApiError> {
        AuthorizationService::authorize_self_or_staff(actor, vendor_id, "vendor_credentials")?;
        self.simulate_latency().await;
        let vendor: Vendor = self.load_vendor(vendor_id)?.value;
        Ok(vendor
            .credential_statuses(as_of)
            .into_iter()
            .map(|(credential, status)| CredentialView {
                credential: credential.clone(),
                status,
            })
            .collect())
    }

    /// Changes a vendor's availability.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is the vendor or a super
    /// admin, and `ResourceNotFound` for an unknown vendor.
    pub async fn update_availability(
        &self,
        actor: &AuthenticatedActor,
        vendor_id: &AccountId,
        request: UpdateAvailabilityRequest,
        cause: Cause,
    ) -> Result<Vendor, ApiError> {
        let command: VendorCommand = VendorCommand::UpdateAvailability {
            availability: request.availability,
        };
        self.run_vendor_command(actor, vendor_id, command, cause)
            .await
    }

    /// Applies a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized`, `ResourceNotFound`, or `InvalidInput` for a
    /// blank name or an empty service list.
    pub async fn update_profile(
        &self,
        actor: &AuthenticatedActor,
        vendor_id: &AccountId,
        update: VendorProfileUpdate,
        cause: Cause,
    ) -> Result<Vendor, ApiError> {
        self.run_vendor_command(actor, vendor_id, VendorCommand::UpdateProfile { update }, cause)
            .await
    }

    /// Records a vendor's current location.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for out-of-range coordinates, plus the
    /// errors of any vendor mutation.
    pub async fn share_location(
        &self,
        actor: &AuthenticatedActor,
        vendor_id: &AccountId,
        request: ShareLocationRequest,
        cause: Cause,
    ) -> Result<Vendor, ApiError> {
        let location: VendorLocation = VendorLocation::new(
            request.lat,
            request.lng,
            &request.address,
            OffsetDateTime::now_utc(),
        )
        .map_err(translate_domain_error)?;
        self.run_vendor_command(
            actor,
            vendor_id,
            VendorCommand::ShareLocation { location },
            cause,
        )
        .await
    }

    /// Forgets a vendor's location.
    ///
    /// # Errors
    ///
    /// Returns the errors of any vendor mutation.
    pub async fn clear_location(
        &self,
        actor: &AuthenticatedActor,
        vendor_id: &AccountId,
        cause: Cause,
    ) -> Result<Vendor, ApiError> {
        self.run_vendor_command(actor, vendor_id, VendorCommand::ClearLocation, cause)
            .await
    }

    async fn run_vendor_command(
        &self,
        actor: &AuthenticatedActor,
        vendor_id: &AccountId,
        command: VendorCommand,
        cause: Cause,
    ) -> Result<Vendor, ApiError> {
        AuthorizationService::authorize_vendor_self(actor, vendor_id, command.action_name())?;
        self.simulate_latency().await;

        for attempt in 1..=self.max_attempts() {
            let current: Versioned<Vendor> = self.load_vendor(vendor_id)?;
            let transition: VendorTransition = apply_vendor_command(
                &current.value,
                command.clone(),
                actor.to_audit_actor(),
                cause.clone(),
                OffsetDateTime::now_utc(),
            )
            .map_err(translate_core_error)?;

            match self.store.compare_and_swap_account(
                vendor_id,
                current.version,
                Account::Vendor(transition.new_vendor.clone()),
            ) {
                Ok(_) => {
                    self.record_audit(transition.audit_event)?;
                    info!(
                        vendor_id = %vendor_id,
                        action = command.action_name(),
                        availability = %transition.new_vendor.availability,
                        "Vendor updated"
                    );
                    return Ok(transition.new_vendor);
                }
                Err(PersistenceError::VersionConflict { .. }) => {
                    debug!(vendor_id = %vendor_id, attempt, "Vendor changed concurrently; re-reading");
                }
                Err(err) => return Err(translate_persistence_error(err)),
            }
        }

        warn!(vendor_id = %vendor_id, "Gave up on contended vendor");
        Err(ApiError::DomainRuleViolation {
            rule: String::from("concurrent_modification"),
            message: format!("Vendor {vendor_id} is being modified concurrently; try again"),
        })
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// A user's notifications, most recent first.
    ///
    /// An unknown user simply has none.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is the user or a super admin.
    pub async fn notifications_for_user(
        &self,
        actor: &AuthenticatedActor,
        user_id: &AccountId,
    ) -> Result<Vec<Notification>, ApiError> {
        AuthorizationService::authorize_self_or_super_admin(actor, user_id, "notifications")?;
        self.simulate_latency().await;
        self.store
            .notifications_for_user(user_id)
            .map_err(translate_persistence_error)
    }

    /// Marks one notification read. Marking twice is harmless.
    ///
    /// Another user's notification is reported as missing.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown or foreign id.
    pub async fn mark_read(
        &self,
        actor: &AuthenticatedActor,
        notification_id: &NotificationId,
    ) -> Result<Notification, ApiError> {
        self.simulate_latency().await;
        let not_found =
            || translate_domain_error(DomainError::NotificationNotFound(notification_id.clone()));

        if actor.role != Role::SuperAdmin {
            let owned: bool = self
                .store
                .notifications_for_user(&actor.id)
                .map_err(translate_persistence_error)?
                .iter()
                .any(|n| &n.id == notification_id);
            if !owned {
                return Err(not_found());
            }
        }

        self.store
            .mark_notification_read(notification_id)
            .map_err(|err| match err {
                PersistenceError::NotFound { .. } => not_found(),
                other => translate_persistence_error(other),
            })
    }

    /// Marks all of a user's notifications read.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` unless the caller is the user or a super admin.
    pub async fn mark_all_read(
        &self,
        actor: &AuthenticatedActor,
        user_id: &AccountId,
    ) -> Result<Vec<Notification>, ApiError> {
        AuthorizationService::authorize_self_or_super_admin(actor, user_id, "mark_all_read")?;
        self.simulate_latency().await;
        self.store
            .mark_all_notifications_read(user_id)
            .map_err(translate_persistence_error)
    }

    // ========================================================================
    // Permits and posts
    // ========================================================================

    /// Permits visible to the caller: all of them for staff, a client's own
    /// for a client.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for vendors.
    pub async fn list_permits(&self, actor: &AuthenticatedActor) -> Result<Vec<Permit>, ApiError> {
        self.simulate_latency().await;
        let permits: Vec<Permit> = self
            .store
            .list_permits()
            .map_err(translate_persistence_error)?;
        match actor.role.class() {
            RoleClass::Staff => Ok(permits),
            RoleClass::Client => Ok(permits
                .into_iter()
                .filter(|permit| permit.client_id == actor.id)
                .collect()),
            RoleClass::Vendor => Err(AuthError::Unauthorized {
                action: String::from("list_permits"),
                required_role: String::from("CLIENT or a staff role"),
            }
            .into()),
        }
    }

    /// Lists posts, newest first. Public.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store fails.
    pub async fn list_posts(&self) -> Result<Vec<BlogPost>, ApiError> {
        self.simulate_latency().await;
        self.store.list_posts().map_err(translate_persistence_error)
    }

    /// Reads a post by slug. Public.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` for an unknown slug.
    pub async fn get_post(&self, slug: &str) -> Result<BlogPost, ApiError> {
        self.simulate_latency().await;
        self.store
            .get_post_by_slug(slug)
            .map_err(|err| Self::not_found_as(err, DomainError::PostNotFound(slug.to_string())))
    }

    /// Publishes a post authored by the caller.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for roles other than content marketing and
    /// super admin, and `InvalidInput` if the title yields no slug or the
    /// slug is taken.
    pub async fn create_post(
        &self,
        actor: &AuthenticatedActor,
        request: CreatePostRequest,
        cause: Cause,
    ) -> Result<BlogPost, ApiError> {
        AuthorizationService::authorize_create_post(actor)?;
        let slug: String = slugify(&request.title).map_err(translate_domain_error)?;
        self.simulate_latency().await;

        let author: Account = self.load_account(&actor.id)?.value;
        let post: BlogPost = BlogPost {
            id: self.store.next_post_id(),
            slug,
            title: request.title.trim().to_string(),
            author: author.identity().name.clone(),
            excerpt: request.excerpt.trim().to_string(),
            content: request.content,
            published_at: OffsetDateTime::now_utc(),
        };
        self.store
            .insert_post(post.clone())
            .map_err(translate_persistence_error)?;

        self.record_audit(AuditEvent::new(
            actor.to_audit_actor(),
            cause,
            Action::new(
                String::from("CreatePost"),
                Some(format!("Published '{}'", post.title)),
            ),
            Subject::Post(post.id.clone()),
            StateSnapshot::absent(),
            StateSnapshot::new(format!("post={},slug={}", post.id, post.slug)),
            post.published_at,
        ))?;

        info!(post_id = %post.id, slug = %post.slug, "Post published");
        Ok(post)
    }
}
