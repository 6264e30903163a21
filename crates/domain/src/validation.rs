// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::escort::EscortService;
use crate::order::OrderDraft;

/// Validates an email address.
///
/// The check is deliberately shallow: a single `@` with a non-empty local
/// part and a domain containing a dot.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the address is empty or malformed.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed: &str = email.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidEmail(String::from(
            "Email cannot be empty",
        )));
    }

    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is missing '@'"
        )));
    };

    if local.is_empty() || domain.contains('@') || trimmed.contains(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' is not a valid address"
        )));
    }

    // Rule: domain needs a dot with text on both sides
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(DomainError::InvalidEmail(format!(
            "'{trimmed}' has an invalid domain"
        ))),
    }
}

/// Validates that an email is not already used by another account.
///
/// Comparison is case-insensitive after trimming.
///
/// # Arguments
///
/// * `email` - The candidate email
/// * `existing` - Emails of all existing accounts
///
/// # Errors
///
/// Returns `DomainError::DuplicateEmail` if the email is taken.
pub fn validate_email_unique<'a, I>(email: &str, existing: I) -> Result<(), DomainError>
where
    I: IntoIterator<Item = &'a str>,
{
    let candidate: String = email.trim().to_lowercase();
    if existing
        .into_iter()
        .any(|other| other.trim().to_lowercase() == candidate)
    {
        return Err(DomainError::DuplicateEmail(candidate));
    }
    Ok(())
}

/// Validates an account or driver name.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty or whitespace.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a set of escort services and returns it de-duplicated.
///
/// First occurrence wins; the relative order of the input is kept.
///
/// # Errors
///
/// Returns `DomainError::EmptyServices` if no service is given.
pub fn validate_services(services: &[EscortService]) -> Result<Vec<EscortService>, DomainError> {
    if services.is_empty() {
        return Err(DomainError::EmptyServices);
    }

    let mut unique: Vec<EscortService> = Vec::with_capacity(services.len());
    for service in services {
        if !unique.contains(service) {
            unique.push(*service);
        }
    }
    Ok(unique)
}

/// Validates a vendor rating.
///
/// # Errors
///
/// Returns `DomainError::InvalidRating` unless the rating is a finite
/// number between 0 and 5 inclusive.
pub fn validate_rating(rating: f64) -> Result<(), DomainError> {
    if !rating.is_finite() || !(0.0..=5.0).contains(&rating) {
        return Err(DomainError::InvalidRating(format!(
            "Rating must be between 0 and 5, got {rating}"
        )));
    }
    Ok(())
}

/// Validates a latitude/longitude pair.
///
/// # Errors
///
/// Returns `DomainError::InvalidCoordinates` if latitude is outside
/// [-90, 90] or longitude is outside [-180, 180].
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), DomainError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(DomainError::InvalidCoordinates {
            reason: format!("latitude {lat} is outside [-90, 90]"),
        });
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(DomainError::InvalidCoordinates {
            reason: format!("longitude {lng} is outside [-180, 180]"),
        });
    }
    Ok(())
}

/// Validates an order draft and returns it normalized.
///
/// Text fields are trimmed and services de-duplicated.
///
/// # Errors
///
/// Returns an error if:
/// - Either address is empty
/// - The driver's name or phone is empty
/// - No escort service is requested
pub fn validate_order_draft(draft: &OrderDraft) -> Result<OrderDraft, DomainError> {
    let pickup_address: &str = draft.pickup_address.trim();
    if pickup_address.is_empty() {
        return Err(DomainError::EmptyField("pickup address"));
    }

    let delivery_address: &str = draft.delivery_address.trim();
    if delivery_address.is_empty() {
        return Err(DomainError::EmptyField("delivery address"));
    }

    let driver_name: &str = draft.driver_name.trim();
    if driver_name.is_empty() {
        return Err(DomainError::EmptyField("driver name"));
    }

    let driver_phone: &str = draft.driver_phone.trim();
    if driver_phone.is_empty() {
        return Err(DomainError::EmptyField("driver phone"));
    }

    let services: Vec<EscortService> = validate_services(&draft.services)?;

    Ok(OrderDraft {
        pickup_address: pickup_address.to_string(),
        delivery_address: delivery_address.to_string(),
        pickup_date: draft.pickup_date,
        pickup_time: draft.pickup_time,
        services,
        driver_name: driver_name.to_string(),
        driver_phone: driver_phone.to_string(),
    })
}
