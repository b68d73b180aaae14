#![allow(clippy::unwrap_used)]
// End-to-end coordinator flows against a wiremock customer service.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clientele_core::{
    AddressCountFilter, AddressId, AddressInput, ConsoleConfig, Coordinator, CoreError,
    CustomerId, CustomerInput, DeleteOutcome, FilterCriteria, Operation,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Coordinator) {
    let server = MockServer::start().await;
    let url = Url::parse(&format!("{}/api/", server.uri())).unwrap();
    let coordinator = Coordinator::connect(&ConsoleConfig::new(url)).unwrap();
    (server, coordinator)
}

async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {
                    "id": 1,
                    "first_name": "Asha",
                    "last_name": "Rao",
                    "phone_number": "9876543210",
                    "addresses": [{
                        "id": 10,
                        "address_details": "12 MG Road",
                        "city": "Pune",
                        "state": "Maharashtra",
                        "pin_code": "411001",
                        "customer_id": 1
                    }]
                },
                {
                    "id": 2,
                    "first_name": "Vikram",
                    "last_name": "Shah",
                    "phone_number": "9123456780",
                    "addresses": null
                },
                {
                    "id": 12,
                    "first_name": "Nisha",
                    "last_name": "Pillai",
                    "phone_number": "9000000012",
                    "addresses": [
                        {
                            "id": 30,
                            "address_details": "4 Marine Drive",
                            "city": "Kochi",
                            "state": "Kerala",
                            "pin_code": "682011"
                        },
                        {
                            "id": 31,
                            "address_details": "88 FC Road",
                            "city": "Pune",
                            "state": "Maharashtra",
                            "pin_code": "411004"
                        }
                    ]
                }
            ]
        })))
        .mount(server)
        .await;
}

fn customer_input() -> CustomerInput {
    CustomerInput {
        first_name: "Rohan".into(),
        last_name: "Mehta".into(),
        phone_number: "9812345678".into(),
    }
}

// ── Loading and filtering ───────────────────────────────────────────

#[tokio::test]
async fn test_load_then_filter() {
    let (server, coordinator) = setup().await;
    mount_listing(&server).await;

    assert_eq!(coordinator.load().await.unwrap(), 3);
    let store = coordinator.store();
    assert!(store.last_full_refresh().is_some());

    let pune = store.filtered(&FilterCriteria {
        city: "pune".into(),
        ..FilterCriteria::default()
    });
    let ids: Vec<_> = pune.iter().map(|c| c.id.get()).collect();
    assert_eq!(ids, vec![1, 12]);

    let multiple = store.filtered(&FilterCriteria {
        address_count: AddressCountFilter::Multiple,
        ..FilterCriteria::default()
    });
    assert_eq!(multiple.len(), 1);
    assert_eq!(multiple[0].id, CustomerId(12));

    // Nested addresses without a back-reference belong to their customer.
    assert_eq!(
        store.address(AddressId(31)).unwrap().customer_id,
        CustomerId(12)
    );
    // Every loaded customer carries synthetic history.
    assert_eq!(store.customer(CustomerId(2)).unwrap().orders.len(), 6);
}

#[tokio::test]
async fn test_failed_load_leaves_store_empty() {
    let (server, coordinator) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/customers"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "database unavailable"
        })))
        .mount(&server)
        .await;

    let err = coordinator.load().await.unwrap_err();
    assert!(matches!(err, CoreError::Remote { status: Some(500), .. }));
    assert!(coordinator.store().is_empty());
}

// ── Customer mutations ──────────────────────────────────────────────

#[tokio::test]
async fn test_create_customer_appends_record() {
    let (server, coordinator) = setup().await;
    mount_listing(&server).await;
    coordinator.load().await.unwrap();

    Mock::given(method("POST"))
        .and(path("/api/customers"))
        .and(body_json(json!({
            "first_name": "Rohan",
            "last_name": "Mehta",
            "phone_number": "9812345678"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "customerId": 40 })))
        .expect(1)
        .mount(&server)
        .await;

    let id = coordinator.create_customer(customer_input()).await.unwrap();
    assert_eq!(id, CustomerId(40));

    let snapshot = coordinator.store().snapshot();
    assert_eq!(snapshot.last().unwrap().id, CustomerId(40));
    assert_eq!(snapshot.last().unwrap().address_count(), 0);
}

#[tokio::test]
async fn test_invalid_phone_never_reaches_the_server() {
    let (server, coordinator) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/customers"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "customerId": 1 })))
        .expect(0)
        .mount(&server)
        .await;

    let err = coordinator
        .create_customer(CustomerInput {
            phone_number: "12345".into(),
            ..customer_input()
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Phone number must be 10 digits.");
}

#[tokio::test]
async fn test_rejected_update_keeps_record_and_reports_field() {
    let (server, coordinator) = setup().await;
    mount_listing(&server).await;
    coordinator.load().await.unwrap();
    let before = coordinator.store().customer(CustomerId(2)).unwrap();

    Mock::given(method("PUT"))
        .and(path("/api/customers/2"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Phone number already in use",
            "field": "phone_number"
        })))
        .mount(&server)
        .await;

    let err = coordinator
        .update_customer(CustomerId(2), customer_input())
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("phone_number"));
    assert_eq!(
        err.user_message_for(Operation::UpdateCustomer),
        "Phone number already in use"
    );
    assert_eq!(*coordinator.store().customer(CustomerId(2)).unwrap(), *before);
}

#[tokio::test]
async fn test_update_customer_in_place() {
    let (server, coordinator) = setup().await;
    mount_listing(&server).await;
    coordinator.load().await.unwrap();

    Mock::given(method("PUT"))
        .and(path("/api/customers/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Customer updated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = coordinator
        .update_customer(CustomerId(1), customer_input())
        .await
        .unwrap();
    assert_eq!(updated.full_name(), "Rohan Mehta");
    assert_eq!(updated.address_count(), 1);
    assert_eq!(coordinator.store().snapshot()[0].id, CustomerId(1));
}

// ── Deletion ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_confirmed_delete() {
    let (server, coordinator) = setup().await;
    mount_listing(&server).await;
    coordinator.load().await.unwrap();

    Mock::given(method("DELETE"))
        .and(path("/api/customers/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Customer deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    coordinator.request_delete(CustomerId(12)).unwrap();
    let outcome = coordinator.confirm_delete().await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted(CustomerId(12)));
    assert_eq!(coordinator.store().len(), 2);
    assert!(coordinator.store().address(AddressId(30)).is_none());
    assert!(coordinator.deletion_state().is_idle());
}

#[tokio::test]
async fn test_delete_of_vanished_customer_resolves() {
    let (server, coordinator) = setup().await;
    mount_listing(&server).await;
    coordinator.load().await.unwrap();

    Mock::given(method("DELETE"))
        .and(path("/api/customers/2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Customer not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    coordinator.request_delete(CustomerId(2)).unwrap();
    assert_eq!(
        coordinator.confirm_delete().await.unwrap(),
        DeleteOutcome::AlreadyResolved(CustomerId(2))
    );
    assert!(coordinator.store().customer(CustomerId(2)).is_none());
}

#[tokio::test]
async fn test_failed_delete_keeps_record() {
    let (server, coordinator) = setup().await;
    mount_listing(&server).await;
    coordinator.load().await.unwrap();

    Mock::given(method("DELETE"))
        .and(path("/api/customers/1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    coordinator.request_delete(CustomerId(1)).unwrap();
    let err = coordinator.confirm_delete().await.unwrap_err();
    assert_eq!(
        err.user_message_for(Operation::DeleteCustomer),
        "Failed to delete customer. Please try again."
    );
    assert!(coordinator.store().customer(CustomerId(1)).is_some());
    assert!(coordinator.deletion_state().is_idle());
}

// ── Addresses ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_add_update_delete_address() {
    let (server, coordinator) = setup().await;
    mount_listing(&server).await;
    coordinator.load().await.unwrap();

    Mock::given(method("POST"))
        .and(path("/api/addresses"))
        .and(body_json(json!({
            "customer_id": 2,
            "address_details": "5 Park Street",
            "city": "Kolkata",
            "state": "West Bengal",
            "pin_code": "700016"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "address": {
                "id": 50,
                "address_details": "5 Park Street",
                "city": "Kolkata",
                "state": "West Bengal",
                "pin_code": "700016",
                "customer_id": 2
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/addresses/50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "address": {
                "id": 50,
                "address_details": "6 Park Street",
                "city": "Kolkata",
                "state": "West Bengal",
                "pin_code": "700016",
                "customer_id": 2
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/addresses/50"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let input = AddressInput {
        address_details: "5 Park Street".into(),
        city: "Kolkata".into(),
        state: "West Bengal".into(),
        pin_code: "700016".into(),
    };
    let created = coordinator
        .create_address(CustomerId(2), input.clone())
        .await
        .unwrap();
    assert_eq!(created.id, AddressId(50));
    assert_eq!(
        coordinator
            .store()
            .customer(CustomerId(2))
            .unwrap()
            .address_count(),
        1
    );

    let updated = coordinator
        .update_address(
            AddressId(50),
            AddressInput {
                address_details: "6 Park Street".into(),
                ..input
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.address_details, "6 Park Street");

    coordinator.delete_address(AddressId(50)).await.unwrap();
    assert_eq!(
        coordinator
            .store()
            .customer(CustomerId(2))
            .unwrap()
            .address_count(),
        0
    );
}

#[tokio::test]
async fn test_connection_refused_maps_to_connection_failed() {
    // Nothing listens on port 9 on the loopback interface.
    let url = Url::parse("http://127.0.0.1:9/api/").unwrap();
    let coordinator = Coordinator::connect(&ConsoleConfig::new(url)).unwrap();

    let err = coordinator.load().await.unwrap_err();
    assert!(matches!(err, CoreError::ConnectionFailed { .. }), "{err:?}");
    assert!(coordinator.store().is_empty());
}
