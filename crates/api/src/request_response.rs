// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API boundary.
//!
//! These are distinct from domain types and represent the wire contract.

use pilot_dispatch_domain::{
    Account, AccountId, Availability, Credential, CredentialStatus, Notification, OrderDraft,
    OrderId, OrderStatus, PilotOrder, Vendor,
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedActor;

/// API request to create an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Contact name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password confirmation.
    pub password_confirmation: String,
    /// Role string, e.g. `CLIENT` or `VENDOR`.
    pub role: String,
    /// Company name.
    #[serde(default)]
    pub company_name: Option<String>,
    /// DOT number (clients).
    #[serde(default)]
    pub dot_number: Option<String>,
}

/// API response for a successful registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// The created account.
    pub account: Account,
    /// A success message.
    pub message: String,
}

/// API request to check credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address.
    pub email: String,
    /// Password.
    pub password: String,
}

/// API response for successful login.
///
/// The caller identifies itself on later requests by `account`'s id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The matching account.
    pub account: Account,
    /// What the account may do.
    pub capabilities: Capabilities,
}

/// API request to submit an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    /// The order details.
    #[serde(flatten)]
    pub draft: OrderDraft,
    /// The client to order for. Staff must supply it; clients may only
    /// name themselves.
    #[serde(default)]
    pub client_id: Option<AccountId>,
}

/// API request to propose a vendor for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRequest {
    /// The proposed vendor.
    pub vendor_id: AccountId,
}

/// API response for any order mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    /// The order after the change.
    pub order: PilotOrder,
    /// A success message.
    pub message: String,
}

/// API request to change a vendor's availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    /// The new availability.
    pub availability: Availability,
}

/// API request to share a vendor's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLocationRequest {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Reverse-geocoded address.
    #[serde(default)]
    pub address: String,
}

/// Vendors considered for an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentCandidates {
    /// Vendors that may be assigned now.
    pub eligible: Vec<Vendor>,
    /// Every vendor, available ones first.
    pub all: Vec<Vendor>,
}

/// A vendor credential with its status on the day asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialView {
    /// The credential on file.
    pub credential: Credential,
    /// Active or Expired.
    pub status: CredentialStatus,
}

/// API request to publish a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePostRequest {
    /// Title; the slug is derived from it.
    pub title: String,
    /// Short summary.
    #[serde(default)]
    pub excerpt: String,
    /// Body text.
    pub content: String,
}

/// Capability state for a specific action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// The action is allowed.
    Allowed,
    /// The action is denied.
    Denied,
}

impl Capability {
    /// Creates a capability from a boolean.
    #[must_use]
    pub const fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Denied }
    }

    /// Returns true if the action is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// What a role may do, for gating UI controls.
///
/// Advisory only; every handler still checks authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_field_names)]
pub struct Capabilities {
    /// Submit orders.
    pub can_submit_order: Capability,
    /// See every order.
    pub can_view_all_orders: Capability,
    /// See the available-loads board.
    pub can_view_available_loads: Capability,
    /// Propose vendors for orders.
    pub can_assign: Capability,
    /// Approve or decline proposed assignments.
    pub can_review: Capability,
    /// Change its own availability, profile and location.
    pub can_manage_vendor_profile: Capability,
    /// See every account.
    pub can_list_accounts: Capability,
    /// See every permit.
    pub can_view_all_permits: Capability,
    /// Publish blog posts.
    pub can_create_post: Capability,
    /// Create staff accounts.
    pub can_create_staff: Capability,
}

/// A change pushed to live subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveEvent {
    /// A notification was recorded.
    Notification {
        /// The new notification.
        notification: Notification,
    },
    /// An order changed status, or was created.
    OrderStatus {
        /// The order.
        order_id: OrderId,
        /// Its status after the change.
        status: OrderStatus,
        /// The client that submitted the order.
        client_id: AccountId,
        /// The vendor assigned after the change, if any.
        #[serde(default)]
        vendor_id: Option<AccountId>,
    },
}

impl LiveEvent {
    /// Builds the status event for an order as it now stands.
    #[must_use]
    pub fn order_status(order: &PilotOrder) -> Self {
        Self::OrderStatus {
            order_id: order.id.clone(),
            status: order.status,
            client_id: order.client.id.clone(),
            vendor_id: order.assigned_vendor_id.clone(),
        }
    }

    /// Returns true if the event may be sent to `actor`.
    ///
    /// Notifications go only to their recipient. Order events go to staff,
    /// the ordering client and the assigned vendor.
    #[must_use]
    pub fn is_visible_to(&self, actor: &AuthenticatedActor) -> bool {
        match self {
            Self::Notification { notification } => actor.is(&notification.user_id),
            Self::OrderStatus {
                client_id,
                vendor_id,
                ..
            } => {
                actor.role.is_staff()
                    || actor.is(client_id)
                    || vendor_id.as_ref().is_some_and(|id| actor.is(id))
            }
        }
    }
}
