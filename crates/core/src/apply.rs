// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{OrderCommand, Registration, VendorCommand};
use crate::error::CoreError;
use crate::notify::{NotificationDraft, assignment_approved, new_order_fan_out};
use crate::state::{
    OrderTransition, RegistrationResult, VendorTransition, account_snapshot, order_snapshot,
    vendor_snapshot,
};
use pilot_dispatch_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot, Subject};
use pilot_dispatch_domain::{
    Account, AccountId, DomainError, Identity, OrderDraft, OrderId, OrderStatus, PilotOrder,
    Vendor, is_eligible_for_assignment, validate_email, validate_email_unique, validate_name,
    validate_order_draft,
};
use time::OffsetDateTime;

/// Applies a registration, producing the new account and its audit event.
///
/// # Arguments
///
/// * `account_id` - The id allocated for the new account
/// * `registration` - The registration request
/// * `existing_emails` - Emails of every existing account
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The instant of the registration
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty
/// - The email is malformed or already in use
pub fn apply_registration<'a, I>(
    account_id: AccountId,
    registration: Registration,
    existing_emails: I,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RegistrationResult, CoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    validate_name(&registration.name)?;
    validate_email(&registration.email)?;
    validate_email_unique(&registration.email, existing_emails)?;

    let identity: Identity = Identity::new(
        account_id.clone(),
        &registration.name,
        &registration.email,
        non_blank(registration.company_name),
        non_blank(registration.dot_number),
    );
    let account: Account = Account::for_role(registration.role, identity);

    let action: Action = Action::new(
        String::from("RegisterAccount"),
        Some(format!(
            "Registered {} account '{}'",
            registration.role, account_id
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        Subject::Account(account_id),
        StateSnapshot::absent(),
        account_snapshot(&account),
        now,
    );

    Ok(RegistrationResult {
        account,
        audit_event,
    })
}

/// Applies an order submission.
///
/// The submitting account's identity is copied onto the order as a
/// point-in-time snapshot. Every staff account in `accounts` receives one
/// notification.
///
/// # Errors
///
/// Returns an error if the draft fails validation.
#[allow(clippy::too_many_arguments)]
pub fn apply_submission(
    order_id: OrderId,
    client: &Identity,
    draft: &OrderDraft,
    accounts: &[Account],
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OrderTransition, CoreError> {
    let draft: OrderDraft = validate_order_draft(draft)?;
    let new_order: PilotOrder = PilotOrder::from_draft(order_id, client.clone(), draft, now);

    let notifications: Vec<NotificationDraft> = new_order_fan_out(&new_order, accounts);

    let action: Action = Action::new(
        String::from("SubmitOrder"),
        Some(format!(
            "Order {} submitted for {}",
            new_order.id,
            client.display_name()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        action,
        Subject::Order(new_order.id.clone()),
        StateSnapshot::absent(),
        order_snapshot(&new_order),
        now,
    );

    Ok(OrderTransition {
        new_order,
        audit_event,
        notifications,
    })
}

/// Applies a command to an order, producing the updated order and audit event.
///
/// `vendor` is the vendor the command concerns: the proposed vendor for
/// `Assign`, the assigned vendor for `Approve`. It is ignored for `Decline`.
///
/// # Errors
///
/// Returns an error if:
/// - `Assign` targets an order that is not New or Pending Assignment
/// - `Assign` or `Approve` names a vendor that is not Available
/// - `Approve` or `Decline` targets an order that is not Pending Review
/// - `Approve` finds no assigned vendor, or a different one than supplied
pub fn apply_order_command(
    order: &PilotOrder,
    vendor: Option<&Vendor>,
    command: OrderCommand,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OrderTransition, CoreError> {
    let action_name: &'static str = command.action_name();
    let (new_order, notifications, details) = match command {
        OrderCommand::Assign {
            vendor_id,
            dispatcher_id,
        } => {
            let new_order: PilotOrder = assign(order, vendor, &vendor_id, dispatcher_id)?;
            let details: String = format!(
                "Proposed vendor {vendor_id} for order {} (was {})",
                order.id, order.status
            );
            (new_order, Vec::new(), details)
        }
        OrderCommand::Approve => {
            let new_order: PilotOrder = approve(order, vendor)?;
            let vendor_id: &AccountId = vendor_on(&new_order)?;
            let notification: NotificationDraft = assignment_approved(&new_order, vendor_id);
            let details: String = format!("Approved vendor {vendor_id} for order {}", order.id);
            (new_order, vec![notification], details)
        }
        OrderCommand::Decline => {
            let new_order: PilotOrder = decline(order)?;
            let details: String = format!(
                "Declined vendor {} for order {}",
                order
                    .assigned_vendor_id
                    .as_ref()
                    .map_or("none", AccountId::value),
                order.id
            );
            (new_order, Vec::new(), details)
        }
    };

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        Subject::Order(order.id.clone()),
        order_snapshot(order),
        order_snapshot(&new_order),
        now,
    );

    Ok(OrderTransition {
        new_order,
        audit_event,
        notifications,
    })
}

/// Applies a command to a vendor profile.
///
/// # Errors
///
/// Returns an error if a profile update fails validation.
pub fn apply_vendor_command(
    vendor: &Vendor,
    command: VendorCommand,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<VendorTransition, CoreError> {
    let action_name: &'static str = command.action_name();
    let (new_vendor, details) = match command {
        VendorCommand::UpdateAvailability { availability } => {
            let mut new_vendor: Vendor = vendor.clone();
            new_vendor.availability = availability;
            let details: String =
                format!("Availability {} -> {availability}", vendor.availability);
            (new_vendor, details)
        }
        VendorCommand::UpdateProfile { update } => {
            let new_vendor: Vendor = update.apply_to(vendor)?;
            (new_vendor, String::from("Profile updated"))
        }
        VendorCommand::ShareLocation { location } => {
            let details: String = format!("Location shared: {}", location.address);
            let mut new_vendor: Vendor = vendor.clone();
            new_vendor.location = Some(location);
            (new_vendor, details)
        }
        VendorCommand::ClearLocation => {
            let mut new_vendor: Vendor = vendor.clone();
            new_vendor.location = None;
            (new_vendor, String::from("Location cleared"))
        }
    };

    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(action_name), Some(details)),
        Subject::Account(vendor.id().clone()),
        vendor_snapshot(vendor),
        vendor_snapshot(&new_vendor),
        now,
    );

    Ok(VendorTransition {
        new_vendor,
        audit_event,
    })
}

fn assign(
    order: &PilotOrder,
    vendor: Option<&Vendor>,
    vendor_id: &AccountId,
    dispatcher_id: AccountId,
) -> Result<PilotOrder, DomainError> {
    if !order.status.is_assignable() {
        return Err(DomainError::OrderNotAssignable {
            order_id: order.id.clone(),
            status: order.status,
        });
    }

    let vendor: &Vendor = vendor
        .filter(|v| v.id() == vendor_id)
        .ok_or_else(|| DomainError::VendorNotFound(vendor_id.clone()))?;
    ensure_eligible(vendor)?;

    order.status.validate_transition(OrderStatus::PendingReview)?;

    let mut new_order: PilotOrder = order.clone();
    new_order.status = OrderStatus::PendingReview;
    new_order.assigned_vendor_id = Some(vendor_id.clone());
    new_order.assigned_dispatcher_id = Some(dispatcher_id);
    Ok(new_order)
}

fn approve(order: &PilotOrder, vendor: Option<&Vendor>) -> Result<PilotOrder, DomainError> {
    ensure_in_review(order)?;

    let assigned: &AccountId = vendor_on(order)?;
    let vendor: &Vendor = vendor.ok_or_else(|| DomainError::VendorNotFound(assigned.clone()))?;
    if vendor.id() != assigned {
        return Err(DomainError::AssignedVendorMismatch {
            order_id: order.id.clone(),
            expected: assigned.clone(),
            actual: vendor.id().clone(),
        });
    }
    // Availability may have changed since the proposal.
    ensure_eligible(vendor)?;

    order.status.validate_transition(OrderStatus::Assigned)?;

    let mut new_order: PilotOrder = order.clone();
    new_order.status = OrderStatus::Assigned;
    Ok(new_order)
}

fn decline(order: &PilotOrder) -> Result<PilotOrder, DomainError> {
    ensure_in_review(order)?;
    order
        .status
        .validate_transition(OrderStatus::PendingAssignment)?;

    // The proposing dispatcher keeps the order in their queue.
    let mut new_order: PilotOrder = order.clone();
    new_order.status = OrderStatus::PendingAssignment;
    new_order.assigned_vendor_id = None;
    Ok(new_order)
}

fn ensure_in_review(order: &PilotOrder) -> Result<(), DomainError> {
    if order.status == OrderStatus::PendingReview {
        Ok(())
    } else {
        Err(DomainError::OrderNotInReview {
            order_id: order.id.clone(),
            status: order.status,
        })
    }
}

fn ensure_eligible(vendor: &Vendor) -> Result<(), DomainError> {
    if is_eligible_for_assignment(vendor) {
        Ok(())
    } else {
        Err(DomainError::VendorNotEligible {
            vendor_id: vendor.id().clone(),
            availability: vendor.availability,
        })
    }
}

fn vendor_on(order: &PilotOrder) -> Result<&AccountId, DomainError> {
    order
        .assigned_vendor_id
        .as_ref()
        .ok_or_else(|| DomainError::MissingAssignedVendor {
            order_id: order.id.clone(),
        })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
