// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AccountId, Availability, EscortService, Identity, OrderDraft, Vendor,
};
use time::macros::{date, time};

pub fn create_test_identity(id: &str, company: Option<&str>) -> Identity {
    Identity::new(
        AccountId::new(id),
        "Test Person",
        &format!("{id}@example.com"),
        company.map(str::to_string),
        None,
    )
}

pub fn create_test_vendor(id: &str, availability: Availability) -> Vendor {
    let mut vendor: Vendor = Vendor::new(create_test_identity(id, Some("Escorts Co")));
    vendor.services = vec![EscortService::Lead];
    vendor.availability = availability;
    vendor
}

pub fn create_test_draft() -> OrderDraft {
    OrderDraft {
        pickup_address: String::from("1 Industrial Way, Dallas, TX"),
        delivery_address: String::from("99 Harbor Rd, Houston, TX"),
        pickup_date: date!(2026 - 03 - 02),
        pickup_time: time!(7:30),
        services: vec![EscortService::Lead, EscortService::Chase],
        driver_name: String::from("Sam Driver"),
        driver_phone: String::from("555-0100"),
    }
}
