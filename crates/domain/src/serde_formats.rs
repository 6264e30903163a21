// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Serde adapters for the `time` types stored on domain records.
//!
//! Dates travel as `YYYY-MM-DD`, clock times as `HH:MM`, and instants as
//! RFC 3339 strings.

/// `YYYY-MM-DD` calendar dates.
pub mod iso_date {
    use crate::types::ISO_DATE;
    use serde::{Deserialize, Deserializer, Serializer, de, ser};
    use time::Date;

    /// Serializes a date as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns an error if the date cannot be formatted.
    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text: String = date.format(ISO_DATE).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes a `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid date.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text: String = String::deserialize(deserializer)?;
        Date::parse(&text, ISO_DATE).map_err(de::Error::custom)
    }

    /// Optional `YYYY-MM-DD` dates.
    pub mod option {
        use crate::types::ISO_DATE;
        use serde::{Deserialize, Deserializer, Serializer, de, ser};
        use time::Date;

        /// Serializes an optional date.
        ///
        /// # Errors
        ///
        /// Returns an error if the date cannot be formatted.
        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => {
                    let text: String = date.format(ISO_DATE).map_err(ser::Error::custom)?;
                    serializer.serialize_some(&text)
                }
                None => serializer.serialize_none(),
            }
        }

        /// Deserializes an optional date.
        ///
        /// # Errors
        ///
        /// Returns an error if a present string is not a valid date.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            let text: Option<String> = Option::deserialize(deserializer)?;
            text.map(|t| Date::parse(&t, ISO_DATE).map_err(de::Error::custom))
                .transpose()
        }
    }
}

/// `HH:MM` clock times.
pub mod clock_time {
    use serde::{Deserialize, Deserializer, Serializer, de, ser};
    use time::Time;
    use time::format_description::BorrowedFormatItem;
    use time::macros::format_description;

    pub(crate) const CLOCK: &[BorrowedFormatItem<'static>] =
        format_description!("[hour]:[minute]");

    /// Serializes a time as `HH:MM`.
    ///
    /// # Errors
    ///
    /// Returns an error if the time cannot be formatted.
    pub fn serialize<S: Serializer>(value: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        let text: String = value.format(CLOCK).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes an `HH:MM` time.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid time.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let text: String = String::deserialize(deserializer)?;
        Time::parse(&text, CLOCK).map_err(de::Error::custom)
    }
}

/// RFC 3339 instants.
pub mod rfc3339 {
    use serde::{Deserialize, Deserializer, Serializer, de, ser};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    /// Serializes an instant as RFC 3339.
    ///
    /// # Errors
    ///
    /// Returns an error if the instant cannot be formatted.
    pub fn serialize<S: Serializer>(
        value: &OffsetDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let text: String = value.format(&Rfc3339).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes an RFC 3339 instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid RFC 3339 timestamp.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OffsetDateTime, D::Error> {
        let text: String = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&text, &Rfc3339).map_err(de::Error::custom)
    }
}
