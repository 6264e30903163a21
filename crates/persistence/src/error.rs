// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// The requested record was not found.
    NotFound {
        /// The kind of record (e.g. "order").
        entity: &'static str,
        /// The id that did not resolve.
        id: String,
    },
    /// A record with this id already exists.
    DuplicateId {
        /// The kind of record.
        entity: &'static str,
        /// The conflicting id.
        id: String,
    },
    /// Another account already uses this email.
    DuplicateEmail(String),
    /// Another post already uses this slug.
    DuplicateSlug(String),
    /// The record changed since it was read.
    VersionConflict {
        /// The kind of record.
        entity: &'static str,
        /// The record id.
        id: String,
        /// The version the caller read.
        expected: u64,
        /// The version currently stored.
        actual: u64,
    },
    /// A lock was poisoned by a panicking writer.
    LockPoisoned(&'static str),
    /// Password hashing or verification failed.
    PasswordHash(String),
    /// Seed data is inconsistent.
    InvalidSeed(String),
    /// Reading seed data failed.
    Io(String),
    /// Serialization/deserialization error.
    SerializationError(String),
}

impl PersistenceError {
    pub(crate) fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::DuplicateId { entity, id } => write!(f, "{entity} {id} already exists"),
            Self::DuplicateEmail(email) => {
                write!(f, "An account with email '{email}' already exists")
            }
            Self::DuplicateSlug(slug) => write!(f, "A post with slug '{slug}' already exists"),
            Self::VersionConflict {
                entity,
                id,
                expected,
                actual,
            } => write!(
                f,
                "{entity} {id} changed concurrently (read version {expected}, stored version {actual})"
            ),
            Self::LockPoisoned(table) => write!(f, "Lock poisoned: {table}"),
            Self::PasswordHash(msg) => write!(f, "Password hashing failed: {msg}"),
            Self::InvalidSeed(msg) => write!(f, "Invalid seed data: {msg}"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for PersistenceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::PasswordHash(err.to_string())
    }
}
