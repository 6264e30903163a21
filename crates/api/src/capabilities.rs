// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what a role is permitted to do without leaking
//! domain internals. They are advisory only and do not replace the
//! checks in [`crate::AuthorizationService`].

use crate::request_response::{Capabilities, Capability};
use pilot_dispatch_domain::{Role, RoleClass};

/// Computes the capabilities of a role.
#[must_use]
pub const fn compute_capabilities(role: Role) -> Capabilities {
    let class: RoleClass = role.class();
    let staff: bool = matches!(class, RoleClass::Staff);
    let super_admin: bool = matches!(role, Role::SuperAdmin);

    Capabilities {
        can_submit_order: Capability::from_bool(!matches!(class, RoleClass::Vendor)),
        can_view_all_orders: Capability::from_bool(staff),
        can_view_available_loads: Capability::from_bool(
            staff || matches!(class, RoleClass::Vendor),
        ),
        can_assign: Capability::from_bool(staff),
        can_review: Capability::from_bool(staff),
        can_manage_vendor_profile: Capability::from_bool(
            matches!(class, RoleClass::Vendor) || super_admin,
        ),
        can_list_accounts: Capability::from_bool(staff),
        can_view_all_permits: Capability::from_bool(staff),
        can_create_post: Capability::from_bool(matches!(
            role,
            Role::ContentMarketing | Role::SuperAdmin
        )),
        can_create_staff: Capability::from_bool(super_admin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_capabilities() {
        let caps: Capabilities = compute_capabilities(Role::Client);
        assert!(caps.can_submit_order.is_allowed());
        assert!(!caps.can_assign.is_allowed());
        assert!(!caps.can_manage_vendor_profile.is_allowed());
        assert!(!caps.can_view_all_permits.is_allowed());
        assert!(!caps.can_view_available_loads.is_allowed());
    }

    #[test]
    fn test_vendor_capabilities() {
        let caps: Capabilities = compute_capabilities(Role::Vendor);
        assert!(!caps.can_submit_order.is_allowed());
        assert!(caps.can_manage_vendor_profile.is_allowed());
        assert!(caps.can_view_available_loads.is_allowed());
        assert!(!caps.can_review.is_allowed());
    }

    #[test]
    fn test_every_staff_role_can_assign_and_review() {
        for role in Role::STAFF {
            let caps: Capabilities = compute_capabilities(role);
            assert!(caps.can_assign.is_allowed(), "{role} should assign");
            assert!(caps.can_review.is_allowed(), "{role} should review");
            assert!(caps.can_list_accounts.is_allowed());
        }
    }

    #[test]
    fn test_post_creation_is_limited_to_marketing_and_super_admin() {
        let allowed: Vec<Role> = Role::STAFF
            .into_iter()
            .filter(|role| compute_capabilities(*role).can_create_post.is_allowed())
            .collect();
        assert_eq!(allowed, vec![Role::ContentMarketing, Role::SuperAdmin]);
    }

    #[test]
    fn test_only_super_admin_creates_staff() {
        assert!(compute_capabilities(Role::SuperAdmin).can_create_staff.is_allowed());
        assert!(!compute_capabilities(Role::LeadDispatcher).can_create_staff.is_allowed());
    }
}
