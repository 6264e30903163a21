// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Account roles and their behavioral classes.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Behavioral class of a role.
///
/// Staff sub-roles differ in which dashboards they use, not in how the
/// order workflow treats them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleClass {
    /// Submits orders and views its own orders.
    Client,
    /// Receives assignments and manages its own availability and credentials.
    Vendor,
    /// Internal operational authority.
    Staff,
}

/// The closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// A trucking company ordering escorts.
    Client,
    /// A pilot-car escort provider.
    Vendor,
    /// Reviews and approves proposed assignments.
    LeadDispatcher,
    /// Proposes vendor assignments.
    Dispatcher,
    /// Tracks permits.
    PermitAgent,
    /// Oversees loads and permits.
    Supervisor,
    /// Publishes blog content.
    ContentMarketing,
    /// Full administrative authority.
    SuperAdmin,
}

impl Role {
    /// All staff roles, in display order.
    pub const STAFF: [Self; 6] = [
        Self::LeadDispatcher,
        Self::Dispatcher,
        Self::PermitAgent,
        Self::Supervisor,
        Self::ContentMarketing,
        Self::SuperAdmin,
    ];

    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "CLIENT",
            Self::Vendor => "VENDOR",
            Self::LeadDispatcher => "LEAD_DISPATCHER",
            Self::Dispatcher => "DISPATCHER",
            Self::PermitAgent => "PERMIT_AGENT",
            Self::Supervisor => "SUPERVISOR",
            Self::ContentMarketing => "CONTENT_MARKETING",
            Self::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Returns the behavioral class of this role.
    #[must_use]
    pub const fn class(&self) -> RoleClass {
        match self {
            Self::Client => RoleClass::Client,
            Self::Vendor => RoleClass::Vendor,
            Self::LeadDispatcher
            | Self::Dispatcher
            | Self::PermitAgent
            | Self::Supervisor
            | Self::ContentMarketing
            | Self::SuperAdmin => RoleClass::Staff,
        }
    }

    /// Returns true for any non-client, non-vendor role.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self.class(), RoleClass::Staff)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CLIENT" => Ok(Self::Client),
            "VENDOR" => Ok(Self::Vendor),
            "LEAD_DISPATCHER" => Ok(Self::LeadDispatcher),
            "DISPATCHER" => Ok(Self::Dispatcher),
            "PERMIT_AGENT" => Ok(Self::PermitAgent),
            "SUPERVISOR" => Ok(Self::Supervisor),
            "CONTENT_MARKETING" => Ok(Self::ContentMarketing),
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}
