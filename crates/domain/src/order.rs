// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pilot-car orders and the order lifecycle.
//!
//! The lifecycle is:
//!
//! ```text
//! New ─┐
//!      ├─> PendingReview ─> Assigned ─> InProgress ─> Completed
//! PendingAssignment <─┘ (decline)
//! ```
//!
//! Any non-terminal state may also move to `Cancelled`. Only the
//! assignment and review edges are driven by this system; the pilot
//! begin/finish edges and cancellation are modelled but have no operation.

use crate::account::Identity;
use crate::error::DomainError;
use crate::escort::EscortService;
use crate::types::{AccountId, OrderId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime, Time};

/// Rate recorded on a new order until it is negotiated.
pub const PENDING_RATE: &str = "Pending";

/// Order lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Submitted by a client, not yet handled.
    New,
    /// Waiting for a dispatcher to propose a vendor.
    #[serde(rename = "Pending Assignment")]
    PendingAssignment,
    /// A vendor has been proposed and awaits lead-level review.
    #[serde(rename = "Pending Review")]
    PendingReview,
    /// The proposed vendor was approved.
    Assigned,
    /// The escort is under way.
    #[serde(rename = "In Progress")]
    InProgress,
    /// The escort finished.
    Completed,
    /// The order was withdrawn.
    Cancelled,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::PendingAssignment,
        Self::PendingReview,
        Self::Assigned,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::PendingAssignment => "Pending Assignment",
            Self::PendingReview => "Pending Review",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if a dispatcher may propose a vendor in this state.
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        matches!(self, Self::New | Self::PendingAssignment)
    }

    /// Returns true if an order in this state must carry an assigned vendor.
    #[must_use]
    pub const fn requires_vendor(&self) -> bool {
        matches!(
            self,
            Self::PendingReview | Self::Assigned | Self::InProgress | Self::Completed
        )
    }

    /// Checks if a transition from this state to another is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, target),
            (Self::New | Self::PendingAssignment, Self::PendingReview)
                | (Self::PendingReview, Self::Assigned | Self::PendingAssignment)
                | (Self::Assigned, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (_, Self::Cancelled)
        )
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is not allowed.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: *self,
                to: target,
                reason: String::from("cannot transition from terminal state"),
            });
        }

        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: *self,
                to: target,
                reason: String::from("transition not permitted by order lifecycle rules"),
            })
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "new" => Ok(Self::New),
            "pendingassignment" => Ok(Self::PendingAssignment),
            "pendingreview" => Ok(Self::PendingReview),
            "assigned" => Ok(Self::Assigned),
            "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidOrderStatus(s.to_string())),
        }
    }
}

/// Everything a client supplies when ordering escorts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    /// Where the load is picked up.
    pub pickup_address: String,
    /// Where the load is delivered.
    pub delivery_address: String,
    /// Pickup date.
    #[serde(with = "crate::serde_formats::iso_date")]
    pub pickup_date: Date,
    /// Pickup time of day.
    #[serde(with = "crate::serde_formats::clock_time")]
    pub pickup_time: Time,
    /// Escort services required.
    pub services: Vec<EscortService>,
    /// Truck driver's name.
    pub driver_name: String,
    /// Truck driver's phone number.
    pub driver_phone: String,
}

/// A pilot-car order.
///
/// `client` is a snapshot of the submitting account taken at submission
/// time. Later profile changes are not reflected on existing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotOrder {
    /// Unique order id.
    pub id: OrderId,
    /// Client identity as of submission.
    pub client: Identity,
    /// Where the load is picked up.
    pub pickup_address: String,
    /// Where the load is delivered.
    pub delivery_address: String,
    /// Pickup date.
    #[serde(with = "crate::serde_formats::iso_date")]
    pub pickup_date: Date,
    /// Pickup time of day.
    #[serde(with = "crate::serde_formats::clock_time")]
    pub pickup_time: Time,
    /// Escort services required (never empty).
    pub services: Vec<EscortService>,
    /// Truck driver's name.
    pub driver_name: String,
    /// Truck driver's phone number.
    pub driver_phone: String,
    /// Negotiated rate, `Pending` until agreed.
    pub rate: String,
    /// Lifecycle state.
    pub status: OrderStatus,
    /// Vendor proposed or assigned to the order.
    #[serde(default)]
    pub assigned_vendor_id: Option<AccountId>,
    /// Dispatcher who proposed the current vendor.
    #[serde(default)]
    pub assigned_dispatcher_id: Option<AccountId>,
    /// Submission instant.
    #[serde(with = "crate::serde_formats::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl PilotOrder {
    /// Creates a New order from a validated draft.
    #[must_use]
    pub fn from_draft(
        id: OrderId,
        client: Identity,
        draft: OrderDraft,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            client,
            pickup_address: draft.pickup_address,
            delivery_address: draft.delivery_address,
            pickup_date: draft.pickup_date,
            pickup_time: draft.pickup_time,
            services: draft.services,
            driver_name: draft.driver_name,
            driver_phone: draft.driver_phone,
            rate: String::from(PENDING_RATE),
            status: OrderStatus::New,
            assigned_vendor_id: None,
            assigned_dispatcher_id: None,
            created_at,
        }
    }

    /// Returns true if the assigned-vendor field agrees with the status.
    ///
    /// A vendor is present exactly when the status is Pending Review,
    /// Assigned, In Progress, or Completed.
    #[must_use]
    pub const fn vendor_assignment_consistent(&self) -> bool {
        self.assigned_vendor_id.is_some() == self.status.requires_vendor()
    }

    /// Returns true if the order is visible on the available-loads board.
    #[must_use]
    pub const fn is_available_load(&self) -> bool {
        self.status.is_assignable()
    }

    /// Returns true if `client_id` submitted this order.
    #[must_use]
    pub fn belongs_to(&self, client_id: &AccountId) -> bool {
        &self.client.id == client_id
    }
}
