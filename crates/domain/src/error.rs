// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::order::OrderStatus;
use crate::role::Role;
use crate::types::{AccountId, NotificationId, OrderId};
use crate::vendor::Availability;

/// Coarse classification of a domain failure.
///
/// Every error surfaced by the workflow falls into exactly one of these
/// classes. Callers use the class to decide on user-facing messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An id did not resolve to an entity.
    NotFound,
    /// A state-machine guard was violated.
    Conflict,
    /// Input failed a field or uniqueness rule.
    Validation,
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Email address is empty or malformed.
    InvalidEmail(String),
    /// Another account already uses this email address.
    DuplicateEmail(String),
    /// Account name is empty or invalid.
    InvalidName(String),
    /// A required text field was empty.
    EmptyField(&'static str),
    /// A vendor profile or order requested no escort services.
    EmptyServices,
    /// Rating outside the 0 to 5 range.
    InvalidRating(String),
    /// Latitude or longitude out of range.
    InvalidCoordinates {
        /// Description of the validation error.
        reason: String,
    },
    /// Failed to parse an ISO date.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Failed to parse a clock time.
    TimeParseError {
        /// The invalid time string.
        time_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Unknown role string.
    InvalidRole(String),
    /// Role is not one of the staff roles.
    InvalidStaffRole(Role),
    /// Unknown order status string.
    InvalidOrderStatus(String),
    /// Unknown availability string.
    InvalidAvailability(String),
    /// Unknown escort service string.
    InvalidEscortService(String),
    /// Unknown permit status string.
    InvalidPermitStatus(String),
    /// The order lifecycle does not permit this transition.
    InvalidStatusTransition {
        /// The current status.
        from: OrderStatus,
        /// The requested status.
        to: OrderStatus,
        /// Why the transition was refused.
        reason: String,
    },
    /// Assignment requires the order to be New or Pending Assignment.
    OrderNotAssignable {
        /// The order.
        order_id: OrderId,
        /// Its current status.
        status: OrderStatus,
    },
    /// Review requires the order to be Pending Review.
    OrderNotInReview {
        /// The order.
        order_id: OrderId,
        /// Its current status.
        status: OrderStatus,
    },
    /// The order has no assigned vendor to approve.
    MissingAssignedVendor {
        /// The order.
        order_id: OrderId,
    },
    /// The vendor supplied for approval is not the one on the order.
    AssignedVendorMismatch {
        /// The order.
        order_id: OrderId,
        /// The vendor recorded on the order.
        expected: AccountId,
        /// The vendor supplied.
        actual: AccountId,
    },
    /// The vendor is not available for assignment.
    VendorNotEligible {
        /// The vendor.
        vendor_id: AccountId,
        /// The vendor's current availability.
        availability: Availability,
    },
    /// The account exists but is not a vendor.
    NotAVendor(AccountId),
    /// Order does not exist.
    OrderNotFound(OrderId),
    /// Account does not exist.
    AccountNotFound(AccountId),
    /// Vendor does not exist.
    VendorNotFound(AccountId),
    /// Notification does not exist.
    NotificationNotFound(NotificationId),
    /// Blog post does not exist.
    PostNotFound(String),
    /// Slug is empty after normalization.
    InvalidSlug(String),
    /// Another post already uses this slug.
    DuplicateSlug(String),
}

impl DomainError {
    /// Returns the coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::OrderNotFound(_)
            | Self::AccountNotFound(_)
            | Self::VendorNotFound(_)
            | Self::NotificationNotFound(_)
            | Self::PostNotFound(_) => ErrorKind::NotFound,
            Self::InvalidStatusTransition { .. }
            | Self::OrderNotAssignable { .. }
            | Self::OrderNotInReview { .. }
            | Self::MissingAssignedVendor { .. }
            | Self::AssignedVendorMismatch { .. }
            | Self::VendorNotEligible { .. } => ErrorKind::Conflict,
            Self::InvalidEmail(_)
            | Self::DuplicateEmail(_)
            | Self::InvalidName(_)
            | Self::EmptyField(_)
            | Self::EmptyServices
            | Self::InvalidRating(_)
            | Self::InvalidCoordinates { .. }
            | Self::DateParseError { .. }
            | Self::TimeParseError { .. }
            | Self::InvalidRole(_)
            | Self::InvalidStaffRole(_)
            | Self::InvalidOrderStatus(_)
            | Self::InvalidAvailability(_)
            | Self::InvalidEscortService(_)
            | Self::InvalidPermitStatus(_)
            | Self::NotAVendor(_)
            | Self::InvalidSlug(_)
            | Self::DuplicateSlug(_) => ErrorKind::Validation,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail(msg) => write!(f, "Invalid email: {msg}"),
            Self::DuplicateEmail(email) => {
                write!(f, "An account with email '{email}' already exists")
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::EmptyField(field) => write!(f, "Field '{field}' must not be empty"),
            Self::EmptyServices => write!(f, "At least one escort service is required"),
            Self::InvalidRating(msg) => write!(f, "Invalid rating: {msg}"),
            Self::InvalidCoordinates { reason } => write!(f, "Invalid coordinates: {reason}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::TimeParseError { time_string, error } => {
                write!(f, "Failed to parse time '{time_string}': {error}")
            }
            Self::InvalidRole(role) => write!(f, "Invalid role: '{role}'"),
            Self::InvalidStaffRole(role) => write!(f, "Role {role} is not a staff role"),
            Self::InvalidOrderStatus(status) => write!(f, "Invalid order status: '{status}'"),
            Self::InvalidAvailability(value) => write!(f, "Invalid availability: '{value}'"),
            Self::InvalidEscortService(value) => {
                write!(f, "Invalid escort service: '{value}'")
            }
            Self::InvalidPermitStatus(value) => write!(f, "Invalid permit status: '{value}'"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(
                    f,
                    "Cannot transition order from '{from}' to '{to}': {reason}"
                )
            }
            Self::OrderNotAssignable { order_id, status } => {
                write!(
                    f,
                    "Order {order_id} cannot be assigned while '{status}'; it must be New or Pending Assignment"
                )
            }
            Self::OrderNotInReview { order_id, status } => {
                write!(
                    f,
                    "Order {order_id} is '{status}'; only orders Pending Review can be approved or declined"
                )
            }
            Self::MissingAssignedVendor { order_id } => {
                write!(f, "Order {order_id} has no assigned vendor")
            }
            Self::AssignedVendorMismatch {
                order_id,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Order {order_id} is assigned to vendor {expected}, not {actual}"
                )
            }
            Self::VendorNotEligible {
                vendor_id,
                availability,
            } => {
                write!(
                    f,
                    "Vendor {vendor_id} is '{availability}' and cannot receive an assignment"
                )
            }
            Self::NotAVendor(id) => write!(f, "Account {id} is not a vendor"),
            Self::OrderNotFound(id) => write!(f, "Order {id} not found"),
            Self::AccountNotFound(id) => write!(f, "Account {id} not found"),
            Self::VendorNotFound(id) => write!(f, "Vendor {id} not found"),
            Self::NotificationNotFound(id) => write!(f, "Notification {id} not found"),
            Self::PostNotFound(slug) => write!(f, "Post '{slug}' not found"),
            Self::InvalidSlug(title) => {
                write!(f, "Cannot derive a slug from title '{title}'")
            }
            Self::DuplicateSlug(slug) => write!(f, "A post with slug '{slug}' already exists"),
        }
    }
}

impl std::error::Error for DomainError {}
