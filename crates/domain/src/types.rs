// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Calendar date format used across the marketplace (`YYYY-MM-DD`).
pub(crate) const ISO_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Declares an opaque string identifier.
///
/// Identifiers are compared verbatim; no normalization is applied.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            value: String,
        }

        impl $name {
            /// Creates a new identifier from its string form.
            #[must_use]
            pub fn new(value: &str) -> Self {
                Self {
                    value: value.to_string(),
                }
            }

            /// Returns the identifier value.
            #[must_use]
            pub fn value(&self) -> &str {
                &self.value
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

opaque_id!(
    /// Identifies an account (client, vendor, or staff member).
    ///
    /// A vendor's id is its account id; there is no separate vendor key.
    AccountId
);

opaque_id!(
    /// Identifies a pilot-car order (e.g. `order105`).
    OrderId
);

opaque_id!(
    /// Identifies a notification in the per-user log.
    NotificationId
);

opaque_id!(
    /// Identifies a tracked permit.
    PermitId
);

opaque_id!(
    /// Identifies a blog post.
    PostId
);

/// Parses an ISO `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), ISO_DATE).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}
