// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! Pure order-lifecycle transitions.
//!
//! Every function here takes the current state by reference and returns
//! the next state plus an audit event. Nothing is stored; callers commit
//! the result.

mod apply;
mod command;
mod error;
mod notify;
mod state;

#[cfg(test)]
mod tests;

pub use apply::{apply_order_command, apply_registration, apply_submission, apply_vendor_command};
pub use command::{OrderCommand, Registration, VendorCommand};
pub use error::CoreError;
pub use notify::{NotificationDraft, assignment_approved, new_order_fan_out};
pub use state::{
    OrderTransition, RegistrationResult, VendorTransition, account_snapshot, order_snapshot,
    vendor_snapshot,
};

use pilot_dispatch_domain::{OrderStatus, PilotOrder};

/// Returns the orders visible on the available-loads board.
///
/// Exactly the orders that are New or Pending Assignment, in input order.
#[must_use]
pub fn available_loads(orders: &[PilotOrder]) -> Vec<PilotOrder> {
    orders
        .iter()
        .filter(|order| order.is_available_load())
        .cloned()
        .collect()
}

/// Returns the orders whose status is one of `statuses`, in input order.
#[must_use]
pub fn loads_by_status(orders: &[PilotOrder], statuses: &[OrderStatus]) -> Vec<PilotOrder> {
    orders
        .iter()
        .filter(|order| statuses.contains(&order.status))
        .cloned()
        .collect()
}
