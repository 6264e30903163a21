// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Oversize-load permits.
//!
//! Permits are issued by state agencies outside this system; they are
//! stored and reported but have no transitions here.

use crate::error::DomainError;
use crate::types::{AccountId, PermitId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Status of a permit request as reported by the agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermitStatus {
    /// Submitted, not yet picked up.
    Requested,
    /// Being processed by the agency.
    Processing,
    /// Issued.
    Issued,
    /// Refused.
    Rejected,
}

impl PermitStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "Requested",
            Self::Processing => "Processing",
            Self::Issued => "Issued",
            Self::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for PermitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermitStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "requested" => Ok(Self::Requested),
            "processing" => Ok(Self::Processing),
            "issued" => Ok(Self::Issued),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidPermitStatus(s.to_string())),
        }
    }
}

/// A tracked permit request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permit {
    /// Permit id.
    pub id: PermitId,
    /// Requesting client.
    pub client_id: AccountId,
    /// Client display name at request time.
    pub client_name: String,
    /// Issuing state (two-letter code).
    pub state: String,
    /// Date the request was submitted.
    #[serde(with = "crate::serde_formats::iso_date")]
    pub submitted_date: Date,
    /// Agency status.
    pub status: PermitStatus,
}
