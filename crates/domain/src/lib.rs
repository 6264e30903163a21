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

mod account;
mod blog;
mod credential;
mod eligibility;
mod error;
mod escort;
mod notification;
mod order;
mod permit;
mod role;
mod types;
mod validation;
mod vendor;

pub mod serde_formats;

#[cfg(test)]
mod tests;

pub use account::{Account, Identity};
pub use blog::{BlogPost, slugify};
pub use credential::{Credential, CredentialStatus, credential_status};
pub use eligibility::{eligible_candidates, is_eligible_for_assignment, sort_for_assignment};
pub use error::{DomainError, ErrorKind};
pub use escort::EscortService;
pub use notification::Notification;
pub use order::{OrderDraft, OrderStatus, PENDING_RATE, PilotOrder};
pub use permit::{Permit, PermitStatus};
pub use role::{Role, RoleClass};
pub use types::{AccountId, NotificationId, OrderId, PermitId, PostId, parse_iso_date};
pub use validation::{
    validate_coordinates, validate_email, validate_email_unique, validate_name,
    validate_order_draft, validate_rating, validate_services,
};
pub use vendor::{Availability, Vendor, VendorLocation, VendorProfileUpdate};
