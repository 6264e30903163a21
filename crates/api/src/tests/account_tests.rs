// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pilot_dispatch_domain::{Account, AccountId, Availability, ErrorKind, Role};
use pilot_dispatch_persistence::{DEMO_PASSWORD, Store};

use super::helpers::{
    TestService, client, create_register_request, create_test_cause, create_test_service,
    dispatcher, super_admin,
};
use crate::{ApiError, AuthenticatedActor, LoginRequest, LoginResponse, RegisterResponse};

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: String::from(email),
        password: String::from(password),
    }
}

#[tokio::test]
async fn test_register_client_allocates_next_user_id() {
    let service: TestService = create_test_service();

    let response: RegisterResponse = service
        .register(
            None,
            create_register_request("casey@rivera.com", "CLIENT"),
            create_test_cause(),
        )
        .await
        .unwrap();

    assert_eq!(response.account.id(), &AccountId::new("user9"));
    assert_eq!(response.account.role(), Role::Client);
    assert_eq!(
        response.account.identity().company_name.as_deref(),
        Some("Rivera Escorts")
    );
    assert!(service.store().get_account(&AccountId::new("user9")).is_ok());
}

#[tokio::test]
async fn test_register_vendor_starts_available_with_defaults() {
    let service: TestService = create_test_service();

    let response: RegisterResponse = service
        .register(
            None,
            create_register_request("escort@rivera.com", "vendor"),
            create_test_cause(),
        )
        .await
        .unwrap();

    let Account::Vendor(vendor) = response.account else {
        panic!("expected a vendor account");
    };
    assert!(vendor.services.is_empty());
    assert!(vendor.credentials.is_empty());
    assert!((vendor.rating - 5.0).abs() < f64::EPSILON);
    assert_eq!(vendor.availability, Availability::Available);
    assert_eq!(vendor.location, None);
}

#[tokio::test]
async fn test_register_duplicate_email_ignores_case() {
    let service: TestService = create_test_service();

    let err: ApiError = service
        .register(
            None,
            create_register_request("Client@Test.com", "CLIENT"),
            create_test_cause(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "email"));
    assert_eq!(service.store().list_accounts().unwrap().len(), 8);
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let service: TestService = create_test_service();
    let mut request = create_register_request("weak@rivera.com", "CLIENT");
    request.password = String::from("short");
    request.password_confirmation = String::from("short");

    let err: ApiError = service
        .register(None, request, create_test_cause())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::PasswordPolicyViolation { .. }));
    assert_eq!(err.kind(), Some(ErrorKind::Validation));
}

#[tokio::test]
async fn test_register_rejects_unknown_role() {
    let service: TestService = create_test_service();

    let err: ApiError = service
        .register(
            None,
            create_register_request("who@rivera.com", "DRIVER"),
            create_test_cause(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "role"));
}

#[tokio::test]
async fn test_staff_registration_requires_super_admin() {
    let service: TestService = create_test_service();

    let anonymous = service
        .register(
            None,
            create_register_request("new.dispatcher@pilotcars.com", "DISPATCHER"),
            create_test_cause(),
        )
        .await
        .unwrap_err();
    assert!(matches!(anonymous, ApiError::Unauthorized { .. }));

    let by_dispatcher = service
        .register(
            Some(&dispatcher()),
            create_register_request("new.dispatcher@pilotcars.com", "DISPATCHER"),
            create_test_cause(),
        )
        .await
        .unwrap_err();
    assert!(matches!(by_dispatcher, ApiError::Unauthorized { .. }));

    let response: RegisterResponse = service
        .register(
            Some(&super_admin()),
            create_register_request("new.dispatcher@pilotcars.com", "DISPATCHER"),
            create_test_cause(),
        )
        .await
        .unwrap();
    assert_eq!(response.account.role(), Role::Dispatcher);
    assert!(response.account.is_staff());
}

#[tokio::test]
async fn test_registration_is_audited_against_the_new_account() {
    let service: TestService = create_test_service();
    service
        .register(
            None,
            create_register_request("casey@rivera.com", "CLIENT"),
            create_test_cause(),
        )
        .await
        .unwrap();

    let events = service.store().audit_events().unwrap();
    let last = events.last().unwrap();
    assert_eq!(last.action.name, "RegisterAccount");
    assert_eq!(last.actor.id, "user9");
    assert_eq!(last.actor.actor_type, "client");
}

#[tokio::test]
async fn test_login_after_registration() {
    let service: TestService = create_test_service();
    service
        .register(
            None,
            create_register_request("casey@rivera.com", "VENDOR"),
            create_test_cause(),
        )
        .await
        .unwrap();

    let response: LoginResponse = service
        .login(login_request("CASEY@rivera.com", "Escort-Lead9"))
        .await
        .unwrap();

    assert_eq!(response.account.id(), &AccountId::new("user9"));
    assert!(response.capabilities.can_manage_vendor_profile.is_allowed());
    assert!(!response.capabilities.can_assign.is_allowed());
}

#[tokio::test]
async fn test_login_with_wrong_password_fails() {
    let service: TestService = create_test_service();

    let wrong_password = service
        .login(login_request("client@test.com", "not-the-password1"))
        .await
        .unwrap_err();
    let unknown_email = service
        .login(login_request("nobody@test.com", DEMO_PASSWORD))
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, ApiError::AuthenticationFailed { .. }));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_demo_accounts_log_in_with_demo_password() {
    let service: TestService = create_test_service();

    let response: LoginResponse = service
        .login(login_request("lead.dispatcher@pilotcars.com", DEMO_PASSWORD))
        .await
        .unwrap();

    assert_eq!(response.account.id(), &AccountId::new("admin1"));
    assert_eq!(response.account.role(), Role::LeadDispatcher);
    assert!(response.capabilities.can_review.is_allowed());
}

#[tokio::test]
async fn test_resolve_actor() {
    let service: TestService = create_test_service();

    let actor: AuthenticatedActor = service.resolve_actor("vendor1").unwrap();
    assert_eq!(actor.role, Role::Vendor);

    let unknown = service.resolve_actor("ghost").unwrap_err();
    assert!(matches!(unknown, ApiError::AuthenticationFailed { .. }));

    let empty = service.resolve_actor("  ").unwrap_err();
    assert!(matches!(empty, ApiError::AuthenticationFailed { .. }));
}

#[tokio::test]
async fn test_account_visibility() {
    let service: TestService = create_test_service();

    let own: Account = service
        .get_account(&client(), &AccountId::new("client1"))
        .await
        .unwrap();
    assert_eq!(own.identity().email, "client@test.com");

    let other = service
        .get_account(&client(), &AccountId::new("vendor1"))
        .await
        .unwrap_err();
    assert!(matches!(other, ApiError::Unauthorized { .. }));

    let all: Vec<Account> = service.list_accounts(&dispatcher()).await.unwrap();
    assert_eq!(all.len(), 8);

    let denied = service.list_accounts(&client()).await.unwrap_err();
    assert!(matches!(denied, ApiError::Unauthorized { .. }));
}
