// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{InMemoryStore, SeedData, StoreConfig};
use pilot_dispatch_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot, Subject};
use pilot_dispatch_domain::{Account, AccountId, Identity, OrderId};
use time::OffsetDateTime;
use time::macros::datetime;

/// Minimum bcrypt cost, so seeding stays fast.
pub fn test_config() -> StoreConfig {
    StoreConfig {
        notification_cap: 5,
        bcrypt_cost: 4,
    }
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-02-01 09:00 UTC)
}

pub fn create_demo_store() -> InMemoryStore {
    InMemoryStore::from_seed(test_config(), SeedData::demo()).unwrap()
}

pub fn create_test_client(id: &str, email: &str) -> Account {
    Account::Client(Identity::new(
        AccountId::new(id),
        "Test Client",
        email,
        Some(String::from("Test Freight")),
        None,
    ))
}

pub fn create_order_event(order_id: &str, action: &str) -> AuditEvent {
    AuditEvent::new(
        Actor::new(String::from("admin2"), String::from("staff")),
        Cause::new(String::from("test"), String::from("Test cause")),
        Action::new(String::from(action), None),
        Subject::Order(OrderId::new(order_id)),
        StateSnapshot::new(String::from("before")),
        StateSnapshot::new(String::from("after")),
        test_now(),
    )
}
