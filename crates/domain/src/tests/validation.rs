// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::create_test_draft;
use crate::{
    DomainError, EscortService, OrderDraft, slugify, validate_coordinates, validate_email,
    validate_email_unique, validate_name, validate_order_draft, validate_rating,
    validate_services,
};

#[test]
fn test_validate_email_accepts_plain_address() {
    assert!(validate_email("dispatch@pilotcar.example").is_ok());
}

#[test]
fn test_validate_email_rejects_malformed_addresses() {
    for bad in ["", "   ", "nobody", "@example.com", "a@b", "a@@b.com", "a b@c.com"] {
        assert!(
            matches!(validate_email(bad), Err(DomainError::InvalidEmail(_))),
            "expected rejection of {bad:?}"
        );
    }
}

#[test]
fn test_validate_email_unique_is_case_insensitive() {
    let existing: Vec<&str> = vec!["client@heavyhaulers.com", "vendor@safeescorts.com"];

    let result = validate_email_unique(" Client@HeavyHaulers.com ", existing.iter().copied());
    assert_eq!(
        result,
        Err(DomainError::DuplicateEmail(String::from(
            "client@heavyhaulers.com"
        )))
    );

    assert!(validate_email_unique("new@example.com", existing.iter().copied()).is_ok());
}

#[test]
fn test_validate_name_rejects_whitespace() {
    assert!(validate_name("Jane").is_ok());
    assert!(matches!(
        validate_name("  "),
        Err(DomainError::InvalidName(_))
    ));
}

#[test]
fn test_validate_services_dedupes_in_order() {
    let services: Vec<EscortService> = vec![
        EscortService::Chase,
        EscortService::Lead,
        EscortService::Chase,
    ];
    assert_eq!(
        validate_services(&services),
        Ok(vec![EscortService::Chase, EscortService::Lead])
    );
}

#[test]
fn test_validate_services_rejects_empty_set() {
    assert_eq!(validate_services(&[]), Err(DomainError::EmptyServices));
}

#[test]
fn test_validate_rating_bounds() {
    assert!(validate_rating(0.0).is_ok());
    assert!(validate_rating(5.0).is_ok());
    assert!(validate_rating(5.1).is_err());
    assert!(validate_rating(-0.1).is_err());
    assert!(validate_rating(f64::NAN).is_err());
}

#[test]
fn test_validate_coordinates_bounds() {
    assert!(validate_coordinates(30.2672, -97.7431).is_ok());
    assert!(validate_coordinates(90.0, 180.0).is_ok());
    assert!(validate_coordinates(90.5, 0.0).is_err());
    assert!(validate_coordinates(0.0, -180.5).is_err());
}

#[test]
fn test_validate_order_draft_trims_and_dedupes() {
    let mut draft: OrderDraft = create_test_draft();
    draft.pickup_address = String::from("  1 Industrial Way  ");
    draft.services = vec![EscortService::Lead, EscortService::Lead];

    let normalized: OrderDraft = validate_order_draft(&draft).unwrap();

    assert_eq!(normalized.pickup_address, "1 Industrial Way");
    assert_eq!(normalized.services, vec![EscortService::Lead]);
}

#[test]
fn test_validate_order_draft_rejects_missing_fields() {
    let mut draft: OrderDraft = create_test_draft();
    draft.driver_phone = String::new();
    assert_eq!(
        validate_order_draft(&draft),
        Err(DomainError::EmptyField("driver phone"))
    );

    let mut draft: OrderDraft = create_test_draft();
    draft.services.clear();
    assert_eq!(validate_order_draft(&draft), Err(DomainError::EmptyServices));
}

#[test]
fn test_slugify_collapses_punctuation() {
    assert_eq!(
        slugify("  Oversize Loads: What Pilots Need to Know! ").unwrap(),
        "oversize-loads-what-pilots-need-to-know"
    );
}

#[test]
fn test_slugify_rejects_symbol_only_title() {
    assert!(matches!(slugify("!!!"), Err(DomainError::InvalidSlug(_))));
}
