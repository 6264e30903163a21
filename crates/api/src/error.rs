// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use pilot_dispatch::CoreError;
use pilot_dispatch_domain::{DomainError, ErrorKind};
use pilot_dispatch_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role or relationship required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role or relationship required for this action.
        required_role: String,
    },
    /// A workflow rule was violated (wrong order state, ineligible vendor).
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl ApiError {
    /// Returns the domain error class, for errors that have one.
    ///
    /// Authentication, authorization and internal failures return `None`.
    #[must_use]
    pub const fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::ResourceNotFound { .. } => Some(ErrorKind::NotFound),
            Self::DomainRuleViolation { .. } => Some(ErrorKind::Conflict),
            Self::InvalidInput { .. } | Self::PasswordPolicyViolation { .. } => {
                Some(ErrorKind::Validation)
            }
            Self::AuthenticationFailed { .. } | Self::Unauthorized { .. } | Self::Internal { .. } => {
                None
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
            Self::DomainRuleViolation { message, .. } => f.write_str(message),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound { message, .. } => f.write_str(message),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Names the resource, rule, or field a domain error is about.
const fn domain_error_subject(err: &DomainError) -> &'static str {
    match err {
        DomainError::OrderNotFound(_) => "Order",
        DomainError::AccountNotFound(_) => "Account",
        DomainError::VendorNotFound(_) => "Vendor",
        DomainError::NotificationNotFound(_) => "Notification",
        DomainError::PostNotFound(_) => "Post",
        DomainError::InvalidStatusTransition { .. } => "order_transition",
        DomainError::OrderNotAssignable { .. } => "order_assignable",
        DomainError::OrderNotInReview { .. } => "order_in_review",
        DomainError::MissingAssignedVendor { .. } => "assigned_vendor_present",
        DomainError::AssignedVendorMismatch { .. } => "assigned_vendor_matches",
        DomainError::VendorNotEligible { .. } => "vendor_available",
        DomainError::InvalidEmail(_) | DomainError::DuplicateEmail(_) => "email",
        DomainError::InvalidName(_) => "name",
        DomainError::EmptyField(field) => *field,
        DomainError::EmptyServices | DomainError::InvalidEscortService(_) => "services",
        DomainError::InvalidRating(_) => "rating",
        DomainError::InvalidCoordinates { .. } => "location",
        DomainError::DateParseError { .. } => "date",
        DomainError::TimeParseError { .. } => "time",
        DomainError::InvalidRole(_) | DomainError::InvalidStaffRole(_) => "role",
        DomainError::InvalidOrderStatus(_) => "status",
        DomainError::InvalidAvailability(_) => "availability",
        DomainError::InvalidPermitStatus(_) => "permit_status",
        DomainError::NotAVendor(_) => "vendor_id",
        DomainError::InvalidSlug(_) | DomainError::DuplicateSlug(_) => "title",
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let subject: String = String::from(domain_error_subject(&err));
    let message: String = err.to_string();
    match err.kind() {
        ErrorKind::NotFound => ApiError::ResourceNotFound {
            resource_type: subject,
            message,
        },
        ErrorKind::Conflict => ApiError::DomainRuleViolation {
            rule: subject,
            message,
        },
        ErrorKind::Validation => ApiError::InvalidInput {
            field: subject,
            message,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Storage faults surface as `Internal`; the rest keep their meaning.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    let message: String = err.to_string();
    match err {
        PersistenceError::NotFound { entity, .. } => ApiError::ResourceNotFound {
            resource_type: capitalize(entity),
            message,
        },
        PersistenceError::DuplicateEmail(_) => ApiError::InvalidInput {
            field: String::from("email"),
            message,
        },
        PersistenceError::DuplicateSlug(_) => ApiError::InvalidInput {
            field: String::from("title"),
            message,
        },
        PersistenceError::VersionConflict { .. } => ApiError::DomainRuleViolation {
            rule: String::from("concurrent_modification"),
            message,
        },
        PersistenceError::DuplicateId { .. }
        | PersistenceError::LockPoisoned(_)
        | PersistenceError::PasswordHash(_)
        | PersistenceError::InvalidSeed(_)
        | PersistenceError::Io(_)
        | PersistenceError::SerializationError(_) => ApiError::Internal { message },
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
