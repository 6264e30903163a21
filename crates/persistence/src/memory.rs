// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The in-memory store engine.
//!
//! Each collection sits behind its own `RwLock`. Reads clone snapshots out
//! of the lock; writes hold the write lock only for the duration of one
//! insert or compare-and-swap.

use crate::error::PersistenceError;
use crate::notifications::NotificationLog;
use crate::seed::{DEMO_PASSWORD, SeedData};
use crate::table::VersionedTable;
use crate::{Store, StoreConfig, Versioned};
use pilot_dispatch::NotificationDraft;
use pilot_dispatch_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot, Subject};
use pilot_dispatch_domain::{
    Account, AccountId, BlogPost, Notification, NotificationId, OrderId, Permit, PilotOrder,
    PostId, validate_email_unique,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Hands out `{prefix}{n}` identifiers from an atomic counter.
#[derive(Debug)]
struct Sequence {
    prefix: &'static str,
    next: AtomicU64,
}

impl Sequence {
    const fn starting_at(prefix: &'static str, first: u64) -> Self {
        Self {
            prefix,
            next: AtomicU64::new(first),
        }
    }

    /// Starts after the largest `{prefix}{n}` among `existing`, and no
    /// lower than `floor`.
    fn after<'a>(
        prefix: &'static str,
        floor: u64,
        existing: impl Iterator<Item = &'a str>,
    ) -> Result<Self, PersistenceError> {
        let highest: Option<u64> = existing
            .filter_map(|id| id.strip_prefix(prefix))
            .filter_map(|n| n.parse::<u64>().ok())
            .max();
        let next: u64 = match highest {
            Some(n) => n.checked_add(1).ok_or_else(|| {
                PersistenceError::InvalidSeed(format!("{prefix}{n} leaves no room for new ids"))
            })?,
            None => 0,
        };
        Ok(Self::starting_at(prefix, floor.max(next)))
    }

    fn allocate(&self) -> String {
        let n: u64 = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}{n}", self.prefix)
    }
}

/// A [`Store`] held entirely in process memory.
#[derive(Debug)]
pub struct InMemoryStore {
    config: StoreConfig,
    accounts: RwLock<VersionedTable<AccountId, Account>>,
    password_hashes: RwLock<HashMap<AccountId, String>>,
    orders: RwLock<VersionedTable<OrderId, PilotOrder>>,
    notifications: RwLock<NotificationLog>,
    permits: RwLock<Vec<Permit>>,
    posts: RwLock<VersionedTable<PostId, BlogPost>>,
    audit_log: RwLock<Vec<AuditEvent>>,
    account_ids: Sequence,
    order_ids: Sequence,
    notification_ids: Sequence,
    post_ids: Sequence,
    event_ids: AtomicU64,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        let notification_cap: usize = config.notification_cap;
        Self {
            config,
            accounts: RwLock::new(VersionedTable::new("account")),
            password_hashes: RwLock::new(HashMap::new()),
            orders: RwLock::new(VersionedTable::new("order")),
            notifications: RwLock::new(NotificationLog::new(notification_cap)),
            permits: RwLock::new(Vec::new()),
            posts: RwLock::new(VersionedTable::new("post")),
            audit_log: RwLock::new(Vec::new()),
            account_ids: Sequence::starting_at("user", 1),
            order_ids: Sequence::starting_at("order", 101),
            notification_ids: Sequence::starting_at("notif", 1),
            post_ids: Sequence::starting_at("post", 1),
            event_ids: AtomicU64::new(1),
        }
    }

    /// Creates a store pre-loaded with seed data.
    ///
    /// Id sequences continue after the seeded ids: orders from
    /// `order{101 + count}`, accounts from `user{count + 1}`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The seed breaks a rule checked by [`SeedData::validate`]
    /// - Two seeded records share an id or slug
    /// - A seeded id number leaves no room for new ids
    /// - A password cannot be hashed
    pub fn from_seed(config: StoreConfig, mut seed: SeedData) -> Result<Self, PersistenceError> {
        seed.validate()?;

        let mut store: Self = Self::new(config);
        store.account_ids = Sequence::after(
            "user",
            seed.accounts.len() as u64 + 1,
            seed.accounts.iter().map(|a| a.account.id().value()),
        )?;
        store.order_ids = Sequence::after(
            "order",
            seed.orders.len() as u64 + 101,
            seed.orders.iter().map(|o| o.id.value()),
        )?;
        store.post_ids = Sequence::after(
            "post",
            seed.posts.len() as u64 + 1,
            seed.posts.iter().map(|p| p.id.value()),
        )?;

        let counts: String = format!(
            "accounts={},orders={},permits={},posts={}",
            seed.accounts.len(),
            seed.orders.len(),
            seed.permits.len(),
            seed.posts.len()
        );

        for entry in seed.accounts {
            let password: String = entry
                .password
                .unwrap_or_else(|| String::from(DEMO_PASSWORD));
            store.insert_account(entry.account, &password)?;
        }
        for order in seed.orders {
            store.insert_order(order)?;
        }
        for post in seed.posts {
            store.insert_post(post)?;
        }
        *write(&store.permits, "permits")? = seed.permits;

        store.record_audit_event(AuditEvent::new(
            Actor::system(),
            Cause::new(String::from("startup"), String::from("Store seeded")),
            Action::new(String::from("Seed"), None),
            Subject::Global,
            StateSnapshot::absent(),
            StateSnapshot::new(counts.clone()),
            OffsetDateTime::now_utc(),
        ))?;
        info!(%counts, "Seeded in-memory store");

        Ok(store)
    }

    /// Returns the configuration the store was built with.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }
}

fn read<'a, T>(
    lock: &'a RwLock<T>,
    name: &'static str,
) -> Result<RwLockReadGuard<'a, T>, PersistenceError> {
    lock.read().map_err(|_| PersistenceError::LockPoisoned(name))
}

fn write<'a, T>(
    lock: &'a RwLock<T>,
    name: &'static str,
) -> Result<RwLockWriteGuard<'a, T>, PersistenceError> {
    lock.write().map_err(|_| PersistenceError::LockPoisoned(name))
}

impl Store for InMemoryStore {
    fn next_account_id(&self) -> AccountId {
        AccountId::new(&self.account_ids.allocate())
    }

    fn insert_account(&self, account: Account, password: &str) -> Result<(), PersistenceError> {
        // Hash outside the lock; bcrypt is deliberately slow.
        let hash: String = bcrypt::hash(password, self.config.bcrypt_cost)?;

        let mut accounts = write(&self.accounts, "accounts")?;
        let email: &str = &account.identity().email;
        validate_email_unique(email, accounts.values().map(|a| a.identity().email.as_str()))
            .map_err(|_| PersistenceError::DuplicateEmail(email.to_string()))?;
        let id: AccountId = account.id().clone();
        accounts.insert(id.clone(), account)?;
        drop(accounts);

        write(&self.password_hashes, "password_hashes")?.insert(id.clone(), hash);
        debug!(account_id = %id, "Inserted account");
        Ok(())
    }

    fn get_account(&self, id: &AccountId) -> Result<Versioned<Account>, PersistenceError> {
        read(&self.accounts, "accounts")?.get(id)
    }

    fn list_accounts(&self) -> Result<Vec<Account>, PersistenceError> {
        Ok(read(&self.accounts, "accounts")?.values().cloned().collect())
    }

    fn compare_and_swap_account(
        &self,
        id: &AccountId,
        expected_version: u64,
        account: Account,
    ) -> Result<Versioned<Account>, PersistenceError> {
        write(&self.accounts, "accounts")?.compare_and_swap(id, expected_version, account)
    }

    fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, PersistenceError> {
        let email: String = email.trim().to_lowercase();
        let Some(account) = read(&self.accounts, "accounts")?
            .values()
            .find(|a| a.identity().email == email)
            .cloned()
        else {
            return Ok(None);
        };

        let Some(hash) = read(&self.password_hashes, "password_hashes")?
            .get(account.id())
            .cloned()
        else {
            return Ok(None);
        };

        if bcrypt::verify(password, &hash)? {
            Ok(Some(account))
        } else {
            Ok(None)
        }
    }

    fn next_order_id(&self) -> OrderId {
        OrderId::new(&self.order_ids.allocate())
    }

    fn insert_order(&self, order: PilotOrder) -> Result<(), PersistenceError> {
        let id: OrderId = order.id.clone();
        write(&self.orders, "orders")?.insert(id.clone(), order)?;
        debug!(order_id = %id, "Inserted order");
        Ok(())
    }

    fn get_order(&self, id: &OrderId) -> Result<Versioned<PilotOrder>, PersistenceError> {
        read(&self.orders, "orders")?.get(id)
    }

    fn list_orders(&self) -> Result<Vec<PilotOrder>, PersistenceError> {
        Ok(read(&self.orders, "orders")?.values().cloned().collect())
    }

    fn compare_and_swap_order(
        &self,
        id: &OrderId,
        expected_version: u64,
        order: PilotOrder,
    ) -> Result<Versioned<PilotOrder>, PersistenceError> {
        write(&self.orders, "orders")?.compare_and_swap(id, expected_version, order)
    }

    fn append_notifications(
        &self,
        drafts: Vec<NotificationDraft>,
        now: OffsetDateTime,
    ) -> Result<Vec<Notification>, PersistenceError> {
        let created: Vec<Notification> = drafts
            .into_iter()
            .map(|draft| {
                let id: NotificationId = NotificationId::new(&self.notification_ids.allocate());
                draft.into_notification(id, now)
            })
            .collect();

        let mut log = write(&self.notifications, "notifications")?;
        for notification in &created {
            log.push(notification.clone());
        }
        Ok(created)
    }

    fn notifications_for_user(
        &self,
        user_id: &AccountId,
    ) -> Result<Vec<Notification>, PersistenceError> {
        Ok(read(&self.notifications, "notifications")?.for_user(user_id))
    }

    fn mark_notification_read(
        &self,
        id: &NotificationId,
    ) -> Result<Notification, PersistenceError> {
        write(&self.notifications, "notifications")?.mark_read(id)
    }

    fn mark_all_notifications_read(
        &self,
        user_id: &AccountId,
    ) -> Result<Vec<Notification>, PersistenceError> {
        Ok(write(&self.notifications, "notifications")?.mark_all_read(user_id))
    }

    fn list_permits(&self) -> Result<Vec<Permit>, PersistenceError> {
        Ok(read(&self.permits, "permits")?.clone())
    }

    fn next_post_id(&self) -> PostId {
        PostId::new(&self.post_ids.allocate())
    }

    fn insert_post(&self, post: BlogPost) -> Result<(), PersistenceError> {
        let mut posts = write(&self.posts, "posts")?;
        if posts.values().any(|p| p.slug == post.slug) {
            return Err(PersistenceError::DuplicateSlug(post.slug));
        }
        posts.insert(post.id.clone(), post)?;
        Ok(())
    }

    fn list_posts(&self) -> Result<Vec<BlogPost>, PersistenceError> {
        let mut posts: Vec<BlogPost> = read(&self.posts, "posts")?.values().cloned().collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    fn get_post_by_slug(&self, slug: &str) -> Result<BlogPost, PersistenceError> {
        read(&self.posts, "posts")?
            .values()
            .find(|p| p.slug == slug)
            .cloned()
            .ok_or_else(|| PersistenceError::not_found("post", slug))
    }

    fn record_audit_event(&self, event: AuditEvent) -> Result<AuditEvent, PersistenceError> {
        let event_id: u64 = self.event_ids.fetch_add(1, Ordering::SeqCst);
        let recorded: AuditEvent = event.with_event_id(event_id);
        write(&self.audit_log, "audit_log")?.push(recorded.clone());
        debug!(
            event_id,
            action = %recorded.action.name,
            actor = %recorded.actor.id,
            "Recorded audit event"
        );
        Ok(recorded)
    }

    fn audit_events_for_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        Ok(read(&self.audit_log, "audit_log")?
            .iter()
            .filter(|event| event.concerns_order(order_id))
            .cloned()
            .collect())
    }

    fn audit_events(&self) -> Result<Vec<AuditEvent>, PersistenceError> {
        Ok(read(&self.audit_log, "audit_log")?.clone())
    }
}
