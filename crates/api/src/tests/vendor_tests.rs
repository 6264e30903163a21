// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pilot_dispatch_domain::{
    AccountId, Availability, CredentialStatus, ErrorKind, EscortService, Vendor,
    VendorProfileUpdate,
};
use pilot_dispatch_persistence::Store;

use super::helpers::{
    TestService, client, create_register_request, create_test_cause, create_test_service,
    dispatcher, vendor, vendor_id,
};
use crate::{
    ApiError, AssignmentCandidates, CredentialView, ShareLocationRequest,
    UpdateAvailabilityRequest,
};
use time::macros::date;

async fn set_availability(service: &TestService, availability: Availability) -> Vendor {
    service
        .update_availability(
            &vendor(),
            &vendor_id(),
            UpdateAvailabilityRequest { availability },
            create_test_cause(),
        )
        .await
        .unwrap()
}

fn ids(vendors: &[Vendor]) -> Vec<&str> {
    vendors.iter().map(|v| v.id().value()).collect()
}

#[tokio::test]
async fn test_candidates_put_available_vendors_first() {
    let service: TestService = create_test_service();
    service
        .register(
            None,
            create_register_request("escort@rivera.com", "VENDOR"),
            create_test_cause(),
        )
        .await
        .unwrap();
    set_availability(&service, Availability::Unavailable).await;

    let candidates: AssignmentCandidates =
        service.assignment_candidates(&dispatcher()).await.unwrap();

    assert_eq!(ids(&candidates.eligible), vec!["user9"]);
    assert_eq!(ids(&candidates.all), vec!["user9", "vendor1"]);
}

#[tokio::test]
async fn test_candidates_are_staff_only() {
    let service: TestService = create_test_service();

    let err: ApiError = service.assignment_candidates(&vendor()).await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

#[tokio::test]
async fn test_availability_round_trip_is_audited() {
    let service: TestService = create_test_service();

    let on_load: Vendor = set_availability(&service, Availability::OnLoad).await;
    assert_eq!(on_load.availability, Availability::OnLoad);
    let available: Vendor = set_availability(&service, Availability::Available).await;
    assert_eq!(available.availability, Availability::Available);

    let actions: Vec<String> = service
        .store()
        .audit_events()
        .unwrap()
        .into_iter()
        .map(|e| e.action.name)
        .filter(|name| name == "UpdateAvailability")
        .collect();
    assert_eq!(actions.len(), 2);
}

#[tokio::test]
async fn test_profile_update_changes_only_supplied_fields() {
    let service: TestService = create_test_service();
    let update: VendorProfileUpdate = VendorProfileUpdate {
        address: Some(String::from("  9 Convoy Ln, Waco, TX ")),
        services: Some(vec![
            EscortService::Steer,
            EscortService::Survey,
            EscortService::Steer,
        ]),
        ..VendorProfileUpdate::default()
    };

    let updated: Vendor = service
        .update_profile(&vendor(), &vendor_id(), update, create_test_cause())
        .await
        .unwrap();

    assert_eq!(updated.address, "9 Convoy Ln, Waco, TX");
    assert_eq!(
        updated.services,
        vec![EscortService::Steer, EscortService::Survey]
    );
    assert_eq!(updated.identity.name, "Jane Smith");
    assert_eq!(updated.credentials.len(), 2);
    assert_eq!(service.get_vendor(&client(), &vendor_id()).await.unwrap(), updated);
}

#[tokio::test]
async fn test_profile_update_rejects_empty_services() {
    let service: TestService = create_test_service();
    let update: VendorProfileUpdate = VendorProfileUpdate {
        services: Some(Vec::new()),
        ..VendorProfileUpdate::default()
    };

    let err: ApiError = service
        .update_profile(&vendor(), &vendor_id(), update, create_test_cause())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "services"));
    let stored = service.get_vendor(&vendor(), &vendor_id()).await.unwrap();
    assert_eq!(
        stored.services,
        vec![EscortService::Lead, EscortService::Chase]
    );
}

#[tokio::test]
async fn test_share_and_clear_location() {
    let service: TestService = create_test_service();

    let shared: Vendor = service
        .share_location(
            &vendor(),
            &vendor_id(),
            ShareLocationRequest {
                lat: 30.2672,
                lng: -97.7431,
                address: String::from("Austin, TX"),
            },
            create_test_cause(),
        )
        .await
        .unwrap();
    let location = shared.location.unwrap();
    assert!((location.lat - 30.2672).abs() < f64::EPSILON);
    assert_eq!(location.address, "Austin, TX");

    let cleared: Vendor = service
        .clear_location(&vendor(), &vendor_id(), create_test_cause())
        .await
        .unwrap();
    assert_eq!(cleared.location, None);
}

#[tokio::test]
async fn test_share_location_rejects_out_of_range_coordinates() {
    let service: TestService = create_test_service();

    let err: ApiError = service
        .share_location(
            &vendor(),
            &vendor_id(),
            ShareLocationRequest {
                lat: 91.0,
                lng: 0.0,
                address: String::new(),
            },
            create_test_cause(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::Validation));
    let stored = service.get_vendor(&vendor(), &vendor_id()).await.unwrap();
    assert_eq!(stored.location, None);
}

#[tokio::test]
async fn test_vendor_lookup_rejects_other_account_kinds() {
    let service: TestService = create_test_service();

    let err: ApiError = service
        .get_vendor(&dispatcher(), &AccountId::new("client1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::NotFound));

    let vendors: Vec<Vendor> = service.list_vendors(&dispatcher()).await.unwrap();
    assert_eq!(ids(&vendors), vec!["vendor1"]);
}

#[tokio::test]
async fn test_vendor_credentials_report_status_for_the_day() {
    let service: TestService = create_test_service();

    let statuses: Vec<(String, CredentialStatus)> = service
        .vendor_credentials(&dispatcher(), &vendor_id(), date!(2024 - 08 - 20))
        .await
        .unwrap()
        .into_iter()
        .map(|view| (view.credential.id, view.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            (String::from("cred1"), CredentialStatus::Active),
            (String::from("cred2"), CredentialStatus::Expired),
        ]
    );

    let on_expiry_day: Vec<CredentialView> = service
        .vendor_credentials(&vendor(), &vendor_id(), date!(2024 - 01 - 15))
        .await
        .unwrap();
    assert!(
        on_expiry_day
            .iter()
            .all(|view| view.status == CredentialStatus::Active)
    );
}

#[tokio::test]
async fn test_vendor_credentials_hidden_from_clients() {
    let service: TestService = create_test_service();

    let err: ApiError = service
        .vendor_credentials(&client(), &vendor_id(), date!(2024 - 08 - 20))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));

    let missing: ApiError = service
        .vendor_credentials(&dispatcher(), &AccountId::new("vendor99"), date!(2024 - 08 - 20))
        .await
        .unwrap_err();
    assert_eq!(missing.kind(), Some(ErrorKind::NotFound));
}
