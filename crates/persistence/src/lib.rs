// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage for the pilot dispatch marketplace.
//!
//! The workflow talks to storage only through the [`Store`] trait. Every
//! mutable record carries a version; writers read a [`Versioned`] snapshot,
//! compute the next state, and commit with compare-and-swap. A stale
//! version is rejected with [`PersistenceError::VersionConflict`] and the
//! caller re-reads.
//!
//! [`InMemoryStore`] is the only engine. It can start empty, from the
//! built-in demo marketplace, or from a JSON seed file.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod memory;
mod notifications;
mod seed;
mod table;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use memory::InMemoryStore;
pub use seed::{DEMO_PASSWORD, SeedAccount, SeedData};

use pilot_dispatch::NotificationDraft;
use pilot_dispatch_audit::AuditEvent;
use pilot_dispatch_domain::{
    Account, AccountId, BlogPost, Notification, NotificationId, OrderId, Permit, PilotOrder,
    PostId,
};
use time::OffsetDateTime;

/// Default number of notifications retained per user.
pub const DEFAULT_NOTIFICATION_CAP: usize = 200;

/// A stored value together with its version.
///
/// Versions start at 1 and increase by one on every committed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    /// The version the value was read at.
    pub version: u64,
    /// The stored value.
    pub value: T,
}

/// Store tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Notifications retained per user before eviction.
    pub notification_cap: usize,
    /// bcrypt work factor for stored passwords.
    pub bcrypt_cost: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            notification_cap: DEFAULT_NOTIFICATION_CAP,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Atomic access to every collection the marketplace keeps.
///
/// Reads return owned snapshots. Each method is atomic on its own; callers
/// that need read-modify-write use the `compare_and_swap_*` methods.
///
/// # Errors
///
/// Every fallible method returns `PersistenceError::LockPoisoned` if a
/// writer panicked while holding the collection's lock.
pub trait Store: Send + Sync {
    /// Allocates the next `user{n}` id.
    fn next_account_id(&self) -> AccountId;

    /// Stores a new account with a bcrypt hash of `password`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` if another account already uses the email,
    /// `DuplicateId` if the id is taken, or `PasswordHash` if hashing fails.
    fn insert_account(&self, account: Account, password: &str) -> Result<(), PersistenceError>;

    /// Reads one account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    fn get_account(&self, id: &AccountId) -> Result<Versioned<Account>, PersistenceError>;

    /// Lists every account in creation order.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn list_accounts(&self) -> Result<Vec<Account>, PersistenceError>;

    /// Replaces an account if its version is still `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `VersionConflict`.
    fn compare_and_swap_account(
        &self,
        id: &AccountId,
        expected_version: u64,
        account: Account,
    ) -> Result<Versioned<Account>, PersistenceError>;

    /// Checks an email and password pair.
    ///
    /// Returns `Ok(None)` when the email is unknown or the password does
    /// not match.
    ///
    /// # Errors
    ///
    /// Returns `PasswordHash` if the stored hash is unreadable.
    fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, PersistenceError>;

    /// Allocates the next `order{n}` id.
    fn next_order_id(&self) -> OrderId;

    /// Stores a new order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateId` if the id is taken.
    fn insert_order(&self, order: PilotOrder) -> Result<(), PersistenceError>;

    /// Reads one order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown.
    fn get_order(&self, id: &OrderId) -> Result<Versioned<PilotOrder>, PersistenceError>;

    /// Lists every order in creation order.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn list_orders(&self) -> Result<Vec<PilotOrder>, PersistenceError>;

    /// Replaces an order if its version is still `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `VersionConflict`.
    fn compare_and_swap_order(
        &self,
        id: &OrderId,
        expected_version: u64,
        order: PilotOrder,
    ) -> Result<Versioned<PilotOrder>, PersistenceError>;

    /// Records notifications, assigning ids and the given timestamp.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn append_notifications(
        &self,
        drafts: Vec<NotificationDraft>,
        now: OffsetDateTime,
    ) -> Result<Vec<Notification>, PersistenceError>;

    /// A user's notifications, most recent first.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn notifications_for_user(
        &self,
        user_id: &AccountId,
    ) -> Result<Vec<Notification>, PersistenceError>;

    /// Marks one notification read. Marking twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown or was evicted.
    fn mark_notification_read(&self, id: &NotificationId)
    -> Result<Notification, PersistenceError>;

    /// Marks all of a user's notifications read and returns them.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn mark_all_notifications_read(
        &self,
        user_id: &AccountId,
    ) -> Result<Vec<Notification>, PersistenceError>;

    /// Lists tracked permits.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn list_permits(&self) -> Result<Vec<Permit>, PersistenceError>;

    /// Allocates the next `post{n}` id.
    fn next_post_id(&self) -> PostId;

    /// Stores a new blog post.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSlug` if the slug is taken.
    fn insert_post(&self, post: BlogPost) -> Result<(), PersistenceError>;

    /// Lists posts, newest first.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn list_posts(&self) -> Result<Vec<BlogPost>, PersistenceError>;

    /// Finds a post by slug.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no post has the slug.
    fn get_post_by_slug(&self, slug: &str) -> Result<BlogPost, PersistenceError>;

    /// Appends an audit event and returns it with its assigned event id.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn record_audit_event(&self, event: AuditEvent) -> Result<AuditEvent, PersistenceError>;

    /// Audit events whose subject is the given order, oldest first.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn audit_events_for_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<AuditEvent>, PersistenceError>;

    /// Every audit event, oldest first.
    ///
    /// # Errors
    ///
    /// See the trait-level note on lock poisoning.
    fn audit_events(&self) -> Result<Vec<AuditEvent>, PersistenceError>;
}
