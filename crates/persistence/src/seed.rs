// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Initial store contents.
//!
//! Seed data is either the built-in demo marketplace or a JSON document
//! with the same shape.

use crate::error::PersistenceError;
use pilot_dispatch_domain::{
    Account, AccountId, Availability, BlogPost, Credential, DomainError, EscortService, Identity,
    OrderId, OrderStatus, PENDING_RATE, Permit, PermitId, PermitStatus, PilotOrder, PostId, Role,
    Vendor, validate_email, validate_email_unique, validate_name, validate_rating,
    validate_services,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use time::macros::{date, datetime, time};
use time::{Date, Time};
use tracing::info;

/// Password given to every demo account that does not specify one.
pub const DEMO_PASSWORD: &str = "pilotcar123";

/// An account plus the password to hash for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedAccount {
    /// The account.
    pub account: Account,
    /// Plain-text password; defaults to [`DEMO_PASSWORD`].
    #[serde(default)]
    pub password: Option<String>,
}

/// Everything loaded into a store at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    /// Accounts, including vendors.
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
    /// Orders in creation order.
    #[serde(default)]
    pub orders: Vec<PilotOrder>,
    /// Tracked permits.
    #[serde(default)]
    pub permits: Vec<Permit>,
    /// Blog posts.
    #[serde(default)]
    pub posts: Vec<BlogPost>,
}

impl SeedData {
    /// Loads seed data from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid seed JSON.
    pub fn from_json_file(path: &Path) -> Result<Self, PersistenceError> {
        let text: String = std::fs::read_to_string(path)?;
        let seed: Self = serde_json::from_str(&text)?;
        info!(
            path = %path.display(),
            accounts = seed.accounts.len(),
            orders = seed.orders.len(),
            "Loaded seed file"
        );
        Ok(seed)
    }

    /// Normalizes the seed and checks it against the rules registration
    /// and order submission enforce.
    ///
    /// Emails are trimmed and lowercased; order services are
    /// de-duplicated.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateEmail` if two accounts share an
    /// email ignoring case, or `PersistenceError::InvalidSeed` if:
    /// - An account email or name is invalid
    /// - A vendor rating is not between 0 and 5
    /// - An order requests no escort service
    /// - An order's assigned vendor disagrees with its status
    /// - An assigned vendor is not a seeded vendor account
    /// - An assigned dispatcher is not a seeded staff account
    pub fn validate(&mut self) -> Result<(), PersistenceError> {
        let mut emails: Vec<String> = Vec::with_capacity(self.accounts.len());
        for entry in &mut self.accounts {
            let identity: &mut Identity = entry.account.identity_mut();
            identity.email = identity.email.trim().to_lowercase();
            let id: AccountId = identity.id.clone();
            validate_email(&identity.email).map_err(|e| invalid_account(&id, &e))?;
            validate_name(&identity.name).map_err(|e| invalid_account(&id, &e))?;
            validate_email_unique(&identity.email, emails.iter().map(String::as_str))
                .map_err(|_| PersistenceError::DuplicateEmail(identity.email.clone()))?;
            emails.push(identity.email.clone());

            if let Some(vendor) = entry.account.as_vendor() {
                validate_rating(vendor.rating).map_err(|e| invalid_account(&id, &e))?;
            }
        }

        let vendor_ids: Vec<&AccountId> = self
            .accounts
            .iter()
            .filter_map(|entry| entry.account.as_vendor())
            .map(Vendor::id)
            .collect();
        let staff_ids: Vec<&AccountId> = self
            .accounts
            .iter()
            .filter(|entry| entry.account.is_staff())
            .map(|entry| entry.account.id())
            .collect();

        for order in &mut self.orders {
            order.services = validate_services(&order.services).map_err(|e| {
                PersistenceError::InvalidSeed(format!("order {}: {e}", order.id))
            })?;
            if !order.vendor_assignment_consistent() {
                return Err(PersistenceError::InvalidSeed(format!(
                    "order {} is '{}' but assigned vendor is {:?}",
                    order.id, order.status, order.assigned_vendor_id
                )));
            }
            if let Some(vendor_id) = &order.assigned_vendor_id
                && !vendor_ids.contains(&vendor_id)
            {
                return Err(PersistenceError::InvalidSeed(format!(
                    "order {} is assigned to {vendor_id}, which is not a vendor account",
                    order.id
                )));
            }
            if let Some(dispatcher_id) = &order.assigned_dispatcher_id
                && !staff_ids.contains(&dispatcher_id)
            {
                return Err(PersistenceError::InvalidSeed(format!(
                    "order {} names dispatcher {dispatcher_id}, which is not a staff account",
                    order.id
                )));
            }
        }
        Ok(())
    }

    /// The demo marketplace: one client, one vendor, one account per staff
    /// role, four orders and three permits.
    #[must_use]
    pub fn demo() -> Self {
        let client: Identity = Identity::new(
            AccountId::new("client1"),
            "John Doe",
            "client@test.com",
            Some(String::from("Heavy Haulers Inc.")),
            Some(String::from("123456")),
        );
        let other_client: Identity = Identity::new(
            AccountId::new("client2"),
            "Big Rig Co",
            "brc@test.com",
            None,
            None,
        );

        let mut accounts: Vec<SeedAccount> = vec![
            seed_account(Account::Client(client.clone())),
            seed_account(Account::Vendor(demo_vendor())),
        ];
        let staff: [(&str, &str, &str); 6] = [
            ("admin1", "Lead Dispatcher", "lead.dispatcher@pilotcars.com"),
            ("admin2", "Dispatcher Bob", "dispatcher@pilotcars.com"),
            ("admin3", "Permit Agent Pam", "permit.agent@pilotcars.com"),
            ("admin4", "Supervisor Sam", "supervisor@pilotcars.com"),
            ("admin5", "Marketing Mary", "marketing@pilotcars.com"),
            ("admin6", "Super Admin", "super.admin@pilotcars.com"),
        ];
        for ((id, name, email), role) in staff.into_iter().zip(Role::STAFF) {
            let identity: Identity = Identity::new(AccountId::new(id), name, email, None, None);
            accounts.push(seed_account(Account::for_role(role, identity)));
        }

        let mut assigned: PilotOrder = demo_order(
            "order101",
            &client,
            ("Houston, TX", "Dallas, TX"),
            (date!(2024 - 08 - 15), time!(9:00)),
            vec![EscortService::Lead, EscortService::Chase],
            ("Mike", "555-1234"),
        );
        assigned.rate = String::from("$1.75/mile");
        assigned.status = OrderStatus::Assigned;
        assigned.assigned_vendor_id = Some(AccountId::new("vendor1"));
        assigned.assigned_dispatcher_id = Some(AccountId::new("admin2"));

        let mut pending: PilotOrder = demo_order(
            "order104",
            &client,
            ("Corpus Christi, TX", "Laredo, TX"),
            (date!(2024 - 08 - 22), time!(14:00)),
            vec![EscortService::Steer],
            ("Chen", "555-3456"),
        );
        pending.status = OrderStatus::PendingAssignment;
        pending.assigned_dispatcher_id = Some(AccountId::new("admin2"));

        let orders: Vec<PilotOrder> = vec![
            assigned,
            demo_order(
                "order102",
                &client,
                ("San Antonio, TX", "Austin, TX"),
                (date!(2024 - 08 - 18), time!(11:00)),
                vec![EscortService::HighPole],
                ("Dave", "555-5678"),
            ),
            demo_order(
                "order103",
                &other_client,
                ("El Paso, TX", "Lubbock, TX"),
                (date!(2024 - 08 - 20), time!(8:00)),
                vec![EscortService::Chase],
                ("Sarah", "555-9012"),
            ),
            pending,
        ];

        let permits: Vec<Permit> = vec![
            demo_permit("p001", &client, "Texas", date!(2024 - 08 - 10), PermitStatus::Issued),
            demo_permit(
                "p002",
                &other_client,
                "New Mexico",
                date!(2024 - 08 - 11),
                PermitStatus::Processing,
            ),
            demo_permit(
                "p003",
                &client,
                "Oklahoma",
                date!(2024 - 08 - 12),
                PermitStatus::Requested,
            ),
        ];

        let posts: Vec<BlogPost> = vec![BlogPost {
            id: PostId::new("post1"),
            slug: String::from("what-is-a-pilot-car"),
            title: String::from("What Is a Pilot Car?"),
            author: String::from("Marketing Mary"),
            excerpt: String::from("Why oversize loads travel with escorts."),
            content: String::from(
                "Pilot cars lead and follow oversize loads, warning traffic and checking clearances.",
            ),
            published_at: datetime!(2024-08-01 12:00 UTC),
        }];

        Self {
            accounts,
            orders,
            permits,
            posts,
        }
    }
}

fn invalid_account(id: &AccountId, err: &DomainError) -> PersistenceError {
    PersistenceError::InvalidSeed(format!("account {id}: {err}"))
}

const fn seed_account(account: Account) -> SeedAccount {
    SeedAccount {
        account,
        password: None,
    }
}

fn demo_vendor() -> Vendor {
    let mut vendor: Vendor = Vendor::new(Identity::new(
        AccountId::new("vendor1"),
        "Jane Smith",
        "vendor@test.com",
        Some(String::from("Safe Escorts LLC")),
        None,
    ));
    vendor.services = vec![EscortService::Lead, EscortService::Chase];
    vendor.rating = 4.8;
    vendor.address = String::from("123 Pilot Rd, Austin, TX");
    vendor.availability = Availability::Available;
    vendor.credentials = vec![
        Credential::new(
            "cred1",
            "General Liability Insurance",
            Some(date!(2025 - 12 - 31)),
            Some(1_000_000),
        ),
        Credential::new(
            "cred2",
            "Pilot/Escort Vehicle Operator Certification",
            Some(date!(2024 - 01 - 15)),
            None,
        ),
    ];
    vendor
}

fn demo_order(
    id: &str,
    client: &Identity,
    (pickup_address, delivery_address): (&str, &str),
    (pickup_date, pickup_time): (Date, Time),
    services: Vec<EscortService>,
    (driver_name, driver_phone): (&str, &str),
) -> PilotOrder {
    PilotOrder {
        id: OrderId::new(id),
        client: client.clone(),
        pickup_address: pickup_address.to_string(),
        delivery_address: delivery_address.to_string(),
        pickup_date,
        pickup_time,
        services,
        driver_name: driver_name.to_string(),
        driver_phone: driver_phone.to_string(),
        rate: String::from(PENDING_RATE),
        status: OrderStatus::New,
        assigned_vendor_id: None,
        assigned_dispatcher_id: None,
        created_at: datetime!(2024-08-01 08:00 UTC),
    }
}

fn demo_permit(
    id: &str,
    client: &Identity,
    state: &str,
    submitted_date: Date,
    status: PermitStatus,
) -> Permit {
    Permit {
        id: PermitId::new(id),
        client_id: client.id.clone(),
        client_name: client.display_name().to_string(),
        state: state.to_string(),
        submitted_date,
        status,
    }
}
