// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::notify::NotificationDraft;
use pilot_dispatch_audit::{AuditEvent, StateSnapshot};
use pilot_dispatch_domain::{Account, AccountId, EscortService, PilotOrder, Vendor};

/// Renders an order for the audit trail.
#[must_use]
pub fn order_snapshot(order: &PilotOrder) -> StateSnapshot {
    StateSnapshot::new(format!(
        "order={},status={},vendor={},dispatcher={}",
        order.id,
        order.status,
        order
            .assigned_vendor_id
            .as_ref()
            .map_or("none", AccountId::value),
        order
            .assigned_dispatcher_id
            .as_ref()
            .map_or("none", AccountId::value),
    ))
}

/// Renders a vendor profile for the audit trail.
#[must_use]
pub fn vendor_snapshot(vendor: &Vendor) -> StateSnapshot {
    let services: Vec<&str> = vendor.services.iter().map(EscortService::as_str).collect();
    StateSnapshot::new(format!(
        "vendor={},availability={},services=[{}],credentials={},location={}",
        vendor.id(),
        vendor.availability,
        services.join(","),
        vendor.credentials.len(),
        if vendor.location.is_some() {
            "shared"
        } else {
            "none"
        },
    ))
}

/// Renders an account for the audit trail.
#[must_use]
pub fn account_snapshot(account: &Account) -> StateSnapshot {
    StateSnapshot::new(format!(
        "account={},role={},email={}",
        account.id(),
        account.role(),
        account.identity().email
    ))
}

/// The result of a successful order transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTransition {
    /// The order after the transition.
    pub new_order: PilotOrder,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// Notifications to append once the transition is committed.
    pub notifications: Vec<NotificationDraft>,
}

/// The result of a successful vendor profile change.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorTransition {
    /// The vendor after the change.
    pub new_vendor: Vendor,
    /// The audit event recording this change.
    pub audit_event: AuditEvent,
}

/// The result of a successful registration.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationResult {
    /// The new account.
    pub account: Account,
    /// The audit event recording the registration.
    pub audit_event: AuditEvent,
}
