// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Arc;

use pilot_dispatch_audit::Cause;
use pilot_dispatch_domain::{AccountId, EscortService, OrderDraft, Role};
use pilot_dispatch_persistence::{InMemoryStore, SeedData, StoreConfig};
use time::macros::{date, time};

use crate::{
    AuthenticatedActor, DispatchService, RegisterRequest, ServiceConfig, SubmitOrderRequest,
};

pub type TestService = DispatchService<InMemoryStore>;

/// A service over the demo marketplace with cheap password hashing.
pub fn create_test_service() -> TestService {
    let store: InMemoryStore = InMemoryStore::from_seed(
        StoreConfig {
            notification_cap: 200,
            bcrypt_cost: 4,
        },
        SeedData::demo(),
    )
    .unwrap();
    DispatchService::new(Arc::new(store), ServiceConfig::default())
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-test"), String::from("API request"))
}

fn actor(id: &str, role: Role) -> AuthenticatedActor {
    AuthenticatedActor::new(AccountId::new(id), role)
}

pub fn lead_dispatcher() -> AuthenticatedActor {
    actor("admin1", Role::LeadDispatcher)
}

pub fn dispatcher() -> AuthenticatedActor {
    actor("admin2", Role::Dispatcher)
}

pub fn content_marketing() -> AuthenticatedActor {
    actor("admin5", Role::ContentMarketing)
}

pub fn super_admin() -> AuthenticatedActor {
    actor("admin6", Role::SuperAdmin)
}

pub fn client() -> AuthenticatedActor {
    actor("client1", Role::Client)
}

pub fn vendor() -> AuthenticatedActor {
    actor("vendor1", Role::Vendor)
}

pub fn vendor_id() -> AccountId {
    AccountId::new("vendor1")
}

pub fn create_test_draft() -> OrderDraft {
    OrderDraft {
        pickup_address: String::from("Beaumont, TX"),
        delivery_address: String::from("Tyler, TX"),
        pickup_date: date!(2026 - 03 - 02),
        pickup_time: time!(7:30),
        services: vec![EscortService::Lead, EscortService::HighPole],
        driver_name: String::from("Luis"),
        driver_phone: String::from("555-7788"),
    }
}

pub fn create_submit_request() -> SubmitOrderRequest {
    SubmitOrderRequest {
        draft: create_test_draft(),
        client_id: None,
    }
}

pub fn create_register_request(email: &str, role: &str) -> RegisterRequest {
    RegisterRequest {
        name: String::from("Casey Rivera"),
        email: String::from(email),
        password: String::from("Escort-Lead9"),
        password_confirmation: String::from("Escort-Lead9"),
        role: String::from(role),
        company_name: Some(String::from("Rivera Escorts")),
        dot_number: None,
    }
}
