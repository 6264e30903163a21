// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{AccountId, NotificationId};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A message delivered to one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification id.
    pub id: NotificationId,
    /// Recipient account.
    pub user_id: AccountId,
    /// Human-readable message.
    pub message: String,
    /// Optional in-app link.
    #[serde(default)]
    pub link: Option<String>,
    /// Whether the recipient has read it.
    #[serde(default)]
    pub is_read: bool,
    /// Creation instant.
    #[serde(with = "crate::serde_formats::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl Notification {
    /// Creates an unread notification.
    #[must_use]
    pub const fn new(
        id: NotificationId,
        user_id: AccountId,
        message: String,
        link: Option<String>,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            user_id,
            message,
            link,
            is_read: false,
            timestamp,
        }
    }

    /// Marks the notification read.
    ///
    /// Returns true if the flag changed.
    pub const fn mark_read(&mut self) -> bool {
        let changed: bool = !self.is_read;
        self.is_read = true;
        changed
    }
}
