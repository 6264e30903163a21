// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pilot_dispatch_audit::{Actor, Cause};
use pilot_dispatch_domain::{
    Account, AccountId, Availability, EscortService, Identity, OrderDraft, OrderId, PilotOrder,
    Role, Vendor,
};
use time::OffsetDateTime;
use time::macros::{date, datetime, time};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin2"), String::from("staff"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Dispatcher request"))
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-02-01 09:00 UTC)
}

pub fn create_test_client() -> Identity {
    Identity::new(
        AccountId::new("client1"),
        "John Doe",
        "client@test.com",
        Some(String::from("Heavy Haulers Inc.")),
        Some(String::from("123456")),
    )
}

pub fn create_test_vendor(availability: Availability) -> Vendor {
    let mut vendor: Vendor = Vendor::new(Identity::new(
        AccountId::new("vendor1"),
        "Jane Smith",
        "vendor@test.com",
        Some(String::from("Safe Escorts LLC")),
        None,
    ));
    vendor.services = vec![EscortService::Lead, EscortService::Chase];
    vendor.availability = availability;
    vendor
}

pub fn create_test_draft() -> OrderDraft {
    OrderDraft {
        pickup_address: String::from("San Antonio, TX"),
        delivery_address: String::from("Austin, TX"),
        pickup_date: date!(2024 - 08 - 18),
        pickup_time: time!(11:00),
        services: vec![EscortService::HighPole],
        driver_name: String::from("Dave"),
        driver_phone: String::from("555-5678"),
    }
}

pub fn create_test_order() -> PilotOrder {
    PilotOrder::from_draft(
        OrderId::new("order102"),
        create_test_client(),
        create_test_draft(),
        test_now(),
    )
}

/// The six staff accounts plus one client and one vendor.
pub fn create_test_accounts() -> Vec<Account> {
    let mut accounts: Vec<Account> = vec![
        Account::Client(create_test_client()),
        Account::Vendor(create_test_vendor(Availability::Available)),
    ];
    for (index, role) in Role::STAFF.into_iter().enumerate() {
        let id: String = format!("admin{}", index + 1);
        accounts.push(Account::for_role(
            role,
            Identity::new(
                AccountId::new(&id),
                role.as_str(),
                &format!("{id}@pilotcars.com"),
                None,
                None,
            ),
        ));
    }
    accounts
}
