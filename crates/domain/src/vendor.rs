// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::account::Identity;
use crate::credential::{Credential, CredentialStatus, credential_status};
use crate::error::DomainError;
use crate::escort::EscortService;
use crate::types::AccountId;
use crate::validation::{validate_coordinates, validate_name, validate_services};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// Rating given to every newly registered vendor.
pub const DEFAULT_RATING: f64 = 5.0;

/// A vendor's self-reported availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Availability {
    /// Ready to take an assignment.
    #[default]
    Available,
    /// Currently escorting a load.
    OnLoad,
    /// Not taking work.
    Unavailable,
}

impl Availability {
    /// Returns the string representation of the availability.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::OnLoad => "OnLoad",
            Self::Unavailable => "Unavailable",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace([' ', '_', '-'], "").to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "onload" => Ok(Self::OnLoad),
            "unavailable" => Ok(Self::Unavailable),
            _ => Err(DomainError::InvalidAvailability(s.to_string())),
        }
    }
}

/// A location shared by a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorLocation {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Reverse-geocoded address supplied by the caller.
    pub address: String,
    /// When the location was captured.
    #[serde(with = "crate::serde_formats::rfc3339")]
    pub captured_at: OffsetDateTime,
}

impl VendorLocation {
    /// Creates a validated location.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinates` if either coordinate is out of range.
    pub fn new(
        lat: f64,
        lng: f64,
        address: &str,
        captured_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        validate_coordinates(lat, lng)?;
        Ok(Self {
            lat,
            lng,
            address: address.trim().to_string(),
            captured_at,
        })
    }
}

const fn default_rating() -> f64 {
    DEFAULT_RATING
}

/// A pilot-car escort provider.
///
/// The vendor carries its own account identity; there is no second
/// record to keep in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    /// The account identity.
    #[serde(flatten)]
    pub identity: Identity,
    /// Business address.
    #[serde(default)]
    pub address: String,
    /// Escort capabilities offered, without duplicates.
    #[serde(default)]
    pub services: Vec<EscortService>,
    /// Rating between 0 and 5.
    #[serde(default = "default_rating")]
    pub rating: f64,
    /// Current availability.
    #[serde(default)]
    pub availability: Availability,
    /// Credentials on file, in the order supplied.
    #[serde(default)]
    pub credentials: Vec<Credential>,
    /// Last shared location, if any.
    #[serde(default)]
    pub location: Option<VendorLocation>,
}

impl Vendor {
    /// Creates a freshly registered vendor.
    ///
    /// New vendors have no services, an empty address, the default rating,
    /// and are available.
    #[must_use]
    pub const fn new(identity: Identity) -> Self {
        Self {
            identity,
            address: String::new(),
            services: Vec::new(),
            rating: DEFAULT_RATING,
            availability: Availability::Available,
            credentials: Vec::new(),
            location: None,
        }
    }

    /// Returns the vendor's account id.
    #[must_use]
    pub const fn id(&self) -> &AccountId {
        &self.identity.id
    }

    /// Returns the name shown to dispatchers: company name if present.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.identity.display_name()
    }

    /// Returns the status of each credential as of `as_of`.
    #[must_use]
    pub fn credential_statuses(&self, as_of: Date) -> Vec<(&Credential, CredentialStatus)> {
        self.credentials
            .iter()
            .map(|c| (c, credential_status(c, as_of)))
            .collect()
    }
}

/// A partial vendor profile update.
///
/// Absent fields are left unchanged. Credentials, when present, replace
/// the existing list wholesale. Identity keys (id, email) cannot change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorProfileUpdate {
    /// New contact name.
    #[serde(default)]
    pub name: Option<String>,
    /// New company name.
    #[serde(default)]
    pub company_name: Option<String>,
    /// New business address.
    #[serde(default)]
    pub address: Option<String>,
    /// New service set (must be non-empty).
    #[serde(default)]
    pub services: Option<Vec<EscortService>>,
    /// Replacement credential list.
    #[serde(default)]
    pub credentials: Option<Vec<Credential>>,
}

impl VendorProfileUpdate {
    /// Returns true if the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.company_name.is_none()
            && self.address.is_none()
            && self.services.is_none()
            && self.credentials.is_none()
    }

    /// Applies the update to a vendor, producing the updated vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The new name is empty
    /// - The new service set is empty
    /// - A replacement credential has an empty name
    pub fn apply_to(&self, vendor: &Vendor) -> Result<Vendor, DomainError> {
        let mut updated: Vendor = vendor.clone();

        if let Some(name) = &self.name {
            validate_name(name)?;
            updated.identity.name = name.trim().to_string();
        }
        if let Some(company_name) = &self.company_name {
            let trimmed: &str = company_name.trim();
            updated.identity.company_name = if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            };
        }
        if let Some(address) = &self.address {
            updated.address = address.trim().to_string();
        }
        if let Some(services) = &self.services {
            updated.services = validate_services(services)?;
        }
        if let Some(credentials) = &self.credentials {
            if credentials.iter().any(|c| c.name.trim().is_empty()) {
                return Err(DomainError::EmptyField("credential name"));
            }
            updated.credentials.clone_from(credentials);
        }

        Ok(updated)
    }
}
