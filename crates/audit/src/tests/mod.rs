// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use crate::{Action, Actor, AuditEvent, Cause, StateSnapshot, Subject};
use pilot_dispatch_domain::{AccountId, OrderId};
use time::macros::datetime;

fn create_test_event(subject: Subject) -> AuditEvent {
    AuditEvent::new(
        Actor::new(String::from("admin2"), String::from("staff")),
        Cause::new(String::from("req-1"), String::from("Dispatcher assigned vendor")),
        Action::new(
            String::from("AssignVendor"),
            Some(String::from("vendor=vendor1")),
        ),
        subject,
        StateSnapshot::new(String::from("status=New")),
        StateSnapshot::new(String::from("status=Pending Review")),
        datetime!(2026-02-01 09:15 UTC),
    )
}

#[test]
fn test_new_event_is_unrecorded() {
    let event: AuditEvent = create_test_event(Subject::Order(OrderId::new("order102")));
    assert_eq!(event.event_id, None);
    assert_eq!(event.actor.id, "admin2");
    assert_eq!(event.action.details.as_deref(), Some("vendor=vendor1"));
}

#[test]
fn test_with_event_id_sets_only_the_id() {
    let event: AuditEvent = create_test_event(Subject::Order(OrderId::new("order102")));
    let recorded: AuditEvent = event.clone().with_event_id(7);

    assert_eq!(recorded.event_id, Some(7));
    assert_eq!(recorded.before, event.before);
    assert_eq!(recorded.after, event.after);
}

#[test]
fn test_concerns_order_matches_subject() {
    let order_id: OrderId = OrderId::new("order102");
    let event: AuditEvent = create_test_event(Subject::Order(order_id.clone()));
    assert!(event.concerns_order(&order_id));
    assert!(!event.concerns_order(&OrderId::new("order103")));

    let account_event: AuditEvent =
        create_test_event(Subject::Account(AccountId::new("vendor1")));
    assert!(!account_event.concerns_order(&order_id));
}

#[test]
fn test_system_actor() {
    let actor: Actor = Actor::system();
    assert_eq!(actor.id, "system");
    assert_eq!(actor.actor_type, "system");
}

#[test]
fn test_subject_serializes_tagged() {
    let json: serde_json::Value =
        serde_json::to_value(Subject::Order(OrderId::new("order101"))).unwrap();
    assert_eq!(json, serde_json::json!({"type": "order", "id": "order101"}));
}

#[test]
fn test_event_json_carries_rfc3339_timestamp() {
    let event: AuditEvent = create_test_event(Subject::Global);
    let json: serde_json::Value = serde_json::to_value(&event).unwrap();
    assert_eq!(json["recorded_at"], "2026-02-01T09:15:00Z");
}
