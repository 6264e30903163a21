// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-user notification log with a retention cap.
//!
//! Each user's log is kept most-recent-first. When a user exceeds the cap,
//! the oldest read notification is evicted; if every notification is
//! unread, the oldest unread one goes instead.

use crate::error::PersistenceError;
use pilot_dispatch_domain::{AccountId, Notification, NotificationId};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug)]
pub(crate) struct NotificationLog {
    cap: usize,
    by_user: HashMap<AccountId, Vec<Notification>>,
    owner: HashMap<NotificationId, AccountId>,
}

impl NotificationLog {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            cap: cap.max(1),
            by_user: HashMap::new(),
            owner: HashMap::new(),
        }
    }

    /// Prepends a notification to its recipient's log.
    pub(crate) fn push(&mut self, notification: Notification) {
        let user_id: AccountId = notification.user_id.clone();
        self.owner
            .insert(notification.id.clone(), user_id.clone());

        let log: &mut Vec<Notification> = self.by_user.entry(user_id).or_default();
        log.insert(0, notification);

        while log.len() > self.cap {
            let victim: usize = log
                .iter()
                .rposition(|n| n.is_read)
                .unwrap_or(log.len() - 1);
            let evicted: Notification = log.remove(victim);
            debug!(
                notification_id = %evicted.id,
                user_id = %evicted.user_id,
                was_read = evicted.is_read,
                "Evicted notification over retention cap"
            );
            self.owner.remove(&evicted.id);
        }
    }

    pub(crate) fn for_user(&self, user_id: &AccountId) -> Vec<Notification> {
        self.by_user.get(user_id).cloned().unwrap_or_default()
    }

    pub(crate) fn mark_read(
        &mut self,
        id: &NotificationId,
    ) -> Result<Notification, PersistenceError> {
        let not_found = || PersistenceError::not_found("notification", id);
        let user_id: &AccountId = self.owner.get(id).ok_or_else(not_found)?;
        let notification: &mut Notification = self
            .by_user
            .get_mut(user_id)
            .and_then(|log| log.iter_mut().find(|n| &n.id == id))
            .ok_or_else(not_found)?;
        notification.mark_read();
        Ok(notification.clone())
    }

    pub(crate) fn mark_all_read(&mut self, user_id: &AccountId) -> Vec<Notification> {
        self.by_user.get_mut(user_id).map_or_else(Vec::new, |log| {
            for notification in log.iter_mut() {
                notification.mark_read();
            }
            log.clone()
        })
    }
}
