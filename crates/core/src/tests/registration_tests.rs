// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_actor, create_test_cause, test_now};
use crate::{CoreError, Registration, RegistrationResult, apply_registration};
use pilot_dispatch_domain::{AccountId, Availability, DomainError, ErrorKind, Role};

fn registration(email: &str, role: Role) -> Registration {
    Registration {
        name: String::from("Pat Pilot"),
        email: String::from(email),
        role,
        company_name: Some(String::from("  Pat's Pilots  ")),
        dot_number: Some(String::new()),
    }
}

fn register(request: Registration, existing: &[&str]) -> Result<RegistrationResult, CoreError> {
    apply_registration(
        AccountId::new("user9"),
        request,
        existing.iter().copied(),
        create_test_actor(),
        create_test_cause(),
        test_now(),
    )
}

#[test]
fn test_vendor_registration_starts_with_defaults() {
    let result: RegistrationResult =
        register(registration("pat@pilots.com", Role::Vendor), &[]).unwrap();

    let vendor = result.account.as_vendor().unwrap();
    assert!(vendor.services.is_empty());
    assert!(vendor.address.is_empty());
    assert_eq!(vendor.availability, Availability::Available);
    assert!((vendor.rating - 5.0).abs() < f64::EPSILON);
    assert_eq!(vendor.identity.company_name.as_deref(), Some("Pat's Pilots"));
    assert_eq!(vendor.identity.dot_number, None);
}

#[test]
fn test_duplicate_email_is_validation_error() {
    let result = register(
        registration("CLIENT@test.com", Role::Client),
        &["client@test.com"],
    );

    let err: CoreError = result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::DuplicateEmail(_))
    ));
}

#[test]
fn test_malformed_email_is_rejected() {
    let result = register(registration("not-an-email", Role::Client), &[]);
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidEmail(_)))
    ));
}

#[test]
fn test_registration_audit_event_names_account() {
    let result: RegistrationResult =
        register(registration("pat@pilots.com", Role::Dispatcher), &[]).unwrap();

    assert_eq!(result.account.role(), Role::Dispatcher);
    assert_eq!(result.audit_event.action.name, "RegisterAccount");
    assert!(result.audit_event.after.data.contains("account=user9"));
    assert!(result.audit_event.after.data.contains("role=DISPATCHER"));
}
