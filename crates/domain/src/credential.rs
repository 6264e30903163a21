// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vendor credentials and their expiry status.
//!
//! A credential without an expiry date is treated as invalid rather than
//! as "never expires": the vendor has not supplied proof of coverage.

use serde::{Deserialize, Serialize};
use time::Date;

/// A vendor certification or insurance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Identifier, unique within the vendor's credential list.
    pub id: String,
    /// Free-text credential type (e.g. "General Liability Insurance").
    pub name: String,
    /// Expiry date, if one is on file.
    #[serde(default, with = "crate::serde_formats::iso_date::option")]
    pub expiry_date: Option<Date>,
    /// Coverage amount in whole currency units.
    #[serde(default)]
    pub amount: Option<u64>,
}

impl Credential {
    /// Creates a new credential.
    #[must_use]
    pub fn new(id: &str, name: &str, expiry_date: Option<Date>, amount: Option<u64>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            expiry_date,
            amount,
        }
    }

    /// Returns true if the credential is expired as of the given date.
    #[must_use]
    pub fn is_expired(&self, as_of: Date) -> bool {
        credential_status(self, as_of) == CredentialStatus::Expired
    }
}

/// Whether a credential is currently valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialStatus {
    /// Expiry is on or after the evaluation date.
    Active,
    /// Expiry is missing or before the evaluation date.
    Expired,
}

/// Evaluates a credential at day granularity.
///
/// Expired if `expiry_date` is missing or strictly before `as_of`. A
/// credential expiring on `as_of` itself is still active that day.
#[must_use]
pub fn credential_status(credential: &Credential, as_of: Date) -> CredentialStatus {
    match credential.expiry_date {
        Some(expiry) if expiry >= as_of => CredentialStatus::Active,
        _ => CredentialStatus::Expired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_expiry_before_as_of_is_expired() {
        let credential = Credential::new("c1", "Liability", Some(date!(2024 - 01 - 15)), None);
        assert_eq!(
            credential_status(&credential, date!(2024 - 08 - 20)),
            CredentialStatus::Expired
        );
    }

    #[test]
    fn test_expiry_after_as_of_is_active() {
        let credential = Credential::new("c1", "Liability", Some(date!(2024 - 01 - 15)), None);
        assert_eq!(
            credential_status(&credential, date!(2023 - 01 - 01)),
            CredentialStatus::Active
        );
    }

    #[test]
    fn test_expiry_on_as_of_is_active() {
        let credential = Credential::new("c1", "Liability", Some(date!(2024 - 01 - 15)), None);
        assert!(!credential.is_expired(date!(2024 - 01 - 15)));
    }

    #[test]
    fn test_missing_expiry_is_always_expired() {
        let credential = Credential::new("c2", "Certification", None, Some(1_000_000));
        assert!(credential.is_expired(date!(1970 - 01 - 01)));
        assert!(credential.is_expired(date!(2100 - 12 - 31)));
    }
}
