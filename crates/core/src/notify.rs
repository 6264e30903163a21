// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notifications produced as side effects of order transitions.
//!
//! Transitions only describe who should be told what. Ids and timestamps
//! are assigned when the store appends the drafts to the log.

use pilot_dispatch_domain::{Account, AccountId, Notification, NotificationId, PilotOrder};
use time::OffsetDateTime;

/// A notification that has not been recorded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    /// Recipient account.
    pub user_id: AccountId,
    /// Human-readable message.
    pub message: String,
    /// Optional in-app link.
    pub link: Option<String>,
}

impl NotificationDraft {
    /// Creates a draft.
    #[must_use]
    pub const fn new(user_id: AccountId, message: String, link: Option<String>) -> Self {
        Self {
            user_id,
            message,
            link,
        }
    }

    /// Turns the draft into an unread notification.
    #[must_use]
    pub fn into_notification(self, id: NotificationId, timestamp: OffsetDateTime) -> Notification {
        Notification::new(id, self.user_id, self.message, self.link, timestamp)
    }
}

/// Tells every staff account about a newly submitted order.
///
/// Client and vendor accounts are skipped. Each staff account receives
/// exactly one draft naming the order and the submitting company.
#[must_use]
pub fn new_order_fan_out(order: &PilotOrder, accounts: &[Account]) -> Vec<NotificationDraft> {
    let message: String = format!(
        "New order {} submitted by {}.",
        order.id,
        order.client.display_name()
    );
    let link: String = format!("/dispatch/orders/{}", order.id);

    accounts
        .iter()
        .filter(|account| account.is_staff())
        .map(|account| {
            NotificationDraft::new(account.id().clone(), message.clone(), Some(link.clone()))
        })
        .collect()
}

/// Tells a vendor that its assignment to an order was approved.
#[must_use]
pub fn assignment_approved(order: &PilotOrder, vendor_id: &AccountId) -> NotificationDraft {
    NotificationDraft::new(
        vendor_id.clone(),
        format!(
            "You have been approved and assigned to order {} ({} to {}).",
            order.id, order.pickup_address, order.delivery_address
        ),
        Some(String::from("/vendor/loads")),
    )
}
