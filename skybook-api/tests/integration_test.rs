use serde_json::{json, Value};
use skybook_api::{app, AppState};
use skybook_store::MemoryStore;
use std::sync::Arc;

/// Serve the full router on an ephemeral port and return its base URL.
async fn spawn_app() -> String {
    let store = Arc::new(MemoryStore::new());
    let app = app(AppState::new(store));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn sample_user() -> Value {
    json!({
        "mobile_number": 9876543210i64,
        "email": "asha@example.com",
        "password": "s3cret!",
        "first_name": "Asha",
        "last_name": "Rao",
        "address": "12 MG Road, Bengaluru",
        "country_code": "91",
        "dob": "1990-04-02"
    })
}

fn sample_flight(id: &str) -> Value {
    json!({
        "flight_id": id,
        "departure_time": "2026-09-01T06:00:00Z",
        "arrival_time": "2026-09-01T08:30:00Z",
        "duration_minutes": 150,
        "destination": "DEL",
        "airline_name": "Air India",
        "airport_location": "BLR",
        "no_of_seats": 180,
        "available_seats": 180,
        "flight_type": "economy"
    })
}

fn sample_seat(seat_id: &str, flight_id: &str) -> Value {
    json!({
        "seat_id": seat_id,
        "flight_id": flight_id,
        "cabin_class": "economy",
        "type_of_seat": "window",
        "seat_preference": "double"
    })
}

fn sample_ticket(flight_id: &str, seat_id: &str) -> Value {
    json!({
        "user_id": 9876543210i64,
        "flight_id": flight_id,
        "seat_id": seat_id,
        "pnr": "PNR123",
        "date_of_departure": "2026-09-01",
        "fare": 4999.0,
        "passport_number": "P1234567",
        "government_id_type": "adhaar",
        "government_id_number": "1234-5678-9012",
        "health_status": "fit to fly"
    })
}

#[tokio::test]
async fn user_roundtrip_excludes_password() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/users/"))
        .json(&sample_user())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    let fetched: Value = client
        .get(format!("{base}/users/9876543210/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched["email"], "asha@example.com");
    assert_eq!(fetched["first_name"], "Asha");
    assert_eq!(fetched["country_code"], "91");
    assert_eq!(fetched["dob"], "1990-04-02");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn duplicate_users_conflict() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    assert_eq!(
        client
            .post(format!("{base}/users/"))
            .json(&sample_user())
            .send()
            .await
            .unwrap()
            .status(),
        201
    );

    // Same mobile number, different email
    let mut dup = sample_user();
    dup["email"] = json!("other@example.com");
    let res = client
        .post(format!("{base}/users/"))
        .json(&dup)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 409);

    // Same email, different mobile number
    let mut dup = sample_user();
    dup["mobile_number"] = json!(9123456789i64);
    let res = client
        .post(format!("{base}/users/"))
        .json(&dup)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 409);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("asha@example.com"));
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let mut user = sample_user();
    user["email"] = json!("not-an-email");
    let res = client
        .post(format!("{base}/users/"))
        .json(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn seat_with_unknown_flight_is_dangling_reference() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/seats/"))
        .json(&sample_seat("12A", "GHOST"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 422);
}

#[tokio::test]
async fn seat_enum_outside_value_set_is_rejected() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/flights/"))
        .json(&sample_flight("AI101"))
        .send()
        .await
        .unwrap();

    let mut seat = sample_seat("12A", "AI101");
    seat["type_of_seat"] = json!("middle");
    let res = client
        .post(format!("{base}/seats/"))
        .json(&seat)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("type_of_seat"));
}

#[tokio::test]
async fn missing_required_field_is_a_validation_error() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let mut user = sample_user();
    user.as_object_mut().unwrap().remove("password");
    let res = client
        .post(format!("{base}/users/"))
        .json(&user)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn ticket_seat_must_match_flight() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    client.post(format!("{base}/users/")).json(&sample_user()).send().await.unwrap();
    client.post(format!("{base}/flights/")).json(&sample_flight("AI101")).send().await.unwrap();
    client.post(format!("{base}/flights/")).json(&sample_flight("AI202")).send().await.unwrap();
    client.post(format!("{base}/seats/")).json(&sample_seat("12A", "AI101")).send().await.unwrap();

    let res = client
        .post(format!("{base}/tickets/"))
        .json(&sample_ticket("AI202", "12A"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 422);
}

#[tokio::test]
async fn deleting_flight_cascades_through_seat_ticket_payment() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    client.post(format!("{base}/users/")).json(&sample_user()).send().await.unwrap();
    client.post(format!("{base}/flights/")).json(&sample_flight("AI101")).send().await.unwrap();
    client.post(format!("{base}/seats/")).json(&sample_seat("12A", "AI101")).send().await.unwrap();

    let ticket: Value = client
        .post(format!("{base}/tickets/"))
        .json(&sample_ticket("AI101", "12A"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ticket_id = ticket["ticket_id"].as_str().unwrap().to_owned();

    let payment: Value = client
        .post(format!("{base}/payments/"))
        .json(&json!({
            "user_id": 9876543210i64,
            "ticket_id": ticket_id,
            "payment_mode": "upi",
            "transaction_id": "TXN-001"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let payment_id = payment["payment_id"].as_str().unwrap().to_owned();

    let res = client
        .delete(format!("{base}/flights/AI101/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 204);

    for path in [
        format!("{base}/flights/AI101/"),
        format!("{base}/seats/12A/"),
        format!("{base}/tickets/{ticket_id}/"),
        format!("{base}/payments/{payment_id}/"),
    ] {
        let res = client.get(&path).send().await.unwrap();
        assert_eq!(res.status(), 404, "expected {path} to be gone");
    }

    // The passenger survives the cascade
    let res = client
        .get(format!("{base}/users/9876543210/"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn partial_update_changes_only_named_fields() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    client.post(format!("{base}/flights/")).json(&sample_flight("AI101")).send().await.unwrap();

    let res = client
        .patch(format!("{base}/flights/AI101/"))
        .json(&json!({"available_seats": 120}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["available_seats"], 120);
    assert_eq!(updated["no_of_seats"], 180);
    assert_eq!(updated["airline_name"], "Air India");

    // PUT goes through the same partial-update path
    let res = client
        .put(format!("{base}/flights/AI101/"))
        .json(&json!({"destination": "BOM"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["destination"], "BOM");
    assert_eq!(updated["available_seats"], 120);
}

#[tokio::test]
async fn update_unknown_id_returns_not_found() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("{base}/flights/NOPE/"))
        .json(&json!({"destination": "BOM"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    let flights: Value = client
        .get(format!("{base}/flights/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(flights.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn available_seats_cannot_exceed_capacity() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let mut flight = sample_flight("AI101");
    flight["available_seats"] = json!(181);
    let res = client
        .post(format!("{base}/flights/"))
        .json(&flight)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn list_endpoints_return_all_records() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    client.post(format!("{base}/flights/")).json(&sample_flight("AI202")).send().await.unwrap();
    client.post(format!("{base}/flights/")).json(&sample_flight("AI101")).send().await.unwrap();

    let flights: Value = client
        .get(format!("{base}/flights/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<&str> = flights
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["flight_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["AI101", "AI202"]);
}
