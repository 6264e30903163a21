// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vendor eligibility for assignment.
//!
//! Eligibility is decided by availability alone. Credential expiry is
//! reported alongside but does not gate assignment.

use crate::vendor::{Availability, Vendor};

/// Returns true if the vendor can receive an assignment.
#[must_use]
pub fn is_eligible_for_assignment(vendor: &Vendor) -> bool {
    vendor.availability == Availability::Available
}

/// Orders vendors for an assignment prompt: eligible vendors first.
///
/// The sort is stable, so vendors with the same eligibility keep their
/// insertion order. Ineligible vendors stay in the list for visibility.
pub fn sort_for_assignment(vendors: &mut [Vendor]) {
    vendors.sort_by_key(|vendor| !is_eligible_for_assignment(vendor));
}

/// Returns only the vendors that may receive an assignment, in input order.
#[must_use]
pub fn eligible_candidates(vendors: &[Vendor]) -> Vec<Vendor> {
    vendors
        .iter()
        .filter(|vendor| is_eligible_for_assignment(vendor))
        .cloned()
        .collect()
}
