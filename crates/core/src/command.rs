// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pilot_dispatch_domain::{AccountId, Availability, Role, VendorLocation, VendorProfileUpdate};

/// A command against a single order.
///
/// Commands are the only way to request order state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderCommand {
    /// Propose a vendor for the order.
    Assign {
        /// The proposed vendor.
        vendor_id: AccountId,
        /// The staff member making the proposal.
        dispatcher_id: AccountId,
    },
    /// Accept the proposed vendor.
    Approve,
    /// Reject the proposed vendor and return the order to the pool.
    Decline,
}

impl OrderCommand {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "AssignVendor",
            Self::Approve => "ApproveAssignment",
            Self::Decline => "DeclineAssignment",
        }
    }
}

/// A command against a single vendor profile.
#[derive(Debug, Clone, PartialEq)]
pub enum VendorCommand {
    /// Change the vendor's availability.
    UpdateAvailability {
        /// The new availability.
        availability: Availability,
    },
    /// Apply a partial profile update.
    UpdateProfile {
        /// The fields to change.
        update: VendorProfileUpdate,
    },
    /// Record the vendor's current location.
    ShareLocation {
        /// The validated location.
        location: VendorLocation,
    },
    /// Forget the vendor's location.
    ClearLocation,
}

impl VendorCommand {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::UpdateAvailability { .. } => "UpdateAvailability",
            Self::UpdateProfile { .. } => "UpdateProfile",
            Self::ShareLocation { .. } => "ShareLocation",
            Self::ClearLocation => "ClearLocation",
        }
    }
}

/// A request to create an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Contact name.
    pub name: String,
    /// Email address; must be unique.
    pub email: String,
    /// Role, fixed for the life of the account.
    pub role: Role,
    /// Company name, if any.
    pub company_name: Option<String>,
    /// DOT number for trucking clients.
    pub dot_number: Option<String>,
}
