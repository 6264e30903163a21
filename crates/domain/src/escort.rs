// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The functional role a pilot car plays around an oversize load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EscortService {
    /// Travels ahead of the load.
    Lead,
    /// Follows the load.
    Chase,
    /// Lead car fitted with a height pole.
    HighPole,
    /// Rear steer for long trailers.
    Steer,
    /// Route survey before the move.
    Survey,
    /// Anything not covered above.
    Other,
}

impl EscortService {
    /// Returns the display label of the service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Chase => "Chase",
            Self::HighPole => "High Pole",
            Self::Steer => "Steer",
            Self::Survey => "Route Survey",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for EscortService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EscortService {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "lead" => Ok(Self::Lead),
            "chase" => Ok(Self::Chase),
            "highpole" | "heightpole" => Ok(Self::HighPole),
            "steer" => Ok(Self::Steer),
            "survey" | "routesurvey" => Ok(Self::Survey),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidEscortService(s.to_string())),
        }
    }
}
