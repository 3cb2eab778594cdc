use std::sync::atomic::Ordering;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::integration::common::{
    BOUNCE_MARKER, REJECTED_IMAGE_DATA, TEST_ADMIN_TOKEN, setup_test_app, setup_test_app_no_auth,
};

const PLACEHOLDER: &str = "https://placehold.co/800x600?text=No+Image";

fn listing_json(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "price": "24,500",
        "year": "2019",
        "make": "Toyota",
        "model": "Corolla",
        "mileage": "41000",
        "condition": "Used",
        "transmission": "Automatic",
        "fuelType": "Petrol",
        "features": ["Bluetooth", "Cruise control"]
    })
}

async fn post_listing(
    router: &Router,
    token: Option<&str>,
    body: &serde_json::Value,
) -> axum::response::Response {
    let mut request = Request::post("/api/cars").header("content-type", "application/json");
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }

    router
        .clone()
        .oneshot(
            request
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_email(router: &Router, body: &serde_json::Value) -> axum::response::Response {
    router
        .clone()
        .oneshot(
            Request::post("/api/send-email")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app().await;

    let (status, json) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app().await;

    let (status, json) = get_json(&app.router, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/api/cars"].is_object());
}

// ---------------------------------------------------------------------------
// Listings: auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_without_token_returns_401() {
    let app = setup_test_app().await;

    let response = post_listing(&app.router, None, &listing_json("Corolla")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = read_json(response).await;
    assert_eq!(json["error"], "unauthorized");
}

#[tokio::test]
async fn create_with_wrong_token_returns_401() {
    let app = setup_test_app().await;

    let response = post_listing(&app.router, Some("guess"), &listing_json("Corolla")).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_without_configured_token_returns_403() {
    let app = setup_test_app_no_auth().await;

    let response = post_listing(&app.router, Some("any-token"), &listing_json("Corolla")).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = read_json(response).await;
    assert_eq!(json["error"], "forbidden");
}

#[tokio::test]
async fn listing_reads_are_public() {
    let app = setup_test_app_no_auth().await;

    let (status, json) = get_json(&app.router, "/api/cars").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Listings: create / read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_coerces_numerics_and_uses_placeholder() {
    let app = setup_test_app().await;

    let response =
        post_listing(&app.router, Some(TEST_ADMIN_TOKEN), &listing_json("2019 Corolla")).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;

    assert!(json["id"].is_string());
    assert_eq!(json["price"], 24500.0);
    assert_eq!(json["year"], 2019);
    assert_eq!(json["mileage"], 41000.0);
    assert_eq!(json["downPayment"], 0.0);
    assert_eq!(json["currency"], "USD");
    assert_eq!(json["description"], "");
    assert_eq!(json["condition"], "Used");
    assert_eq!(json["fuelType"], "Petrol");
    assert_eq!(json["images"], serde_json::json!([PLACEHOLDER]));
    assert_eq!(app.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn create_uploads_inline_images_in_order() {
    let app = setup_test_app().await;

    let mut body = listing_json("Corolla with photos");
    body["images"] = serde_json::json!([
        "https://cdn.dealer.test/front.jpg",
        "data:image/png;base64,iVBORw0KGgo=",
        format!("data:image/png;base64,{REJECTED_IMAGE_DATA}"),
        "data:image/jpeg;base64,not base64!",
        "   "
    ]);

    let response = post_listing(&app.router, Some(TEST_ADMIN_TOKEN), &body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;

    assert_eq!(
        json["images"],
        serde_json::json!([
            "https://cdn.dealer.test/front.jpg",
            "https://res.cloudinary.test/demo/upload-0.png"
        ])
    );
    assert_eq!(app.uploads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn create_accepts_blank_form_inputs() {
    let app = setup_test_app().await;

    let mut body = listing_json("Blank inputs");
    body["mileage"] = serde_json::json!("");
    body["downPayment"] = serde_json::json!("");
    body["images"] = serde_json::Value::Null;
    body["features"] = serde_json::Value::Null;

    let response = post_listing(&app.router, Some(TEST_ADMIN_TOKEN), &body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = read_json(response).await;
    assert_eq!(json["mileage"], 0.0);
    assert_eq!(json["downPayment"], 0.0);
    assert_eq!(json["images"], serde_json::json!([PLACEHOLDER]));
    assert_eq!(json["features"], serde_json::json!([]));
}

#[tokio::test]
async fn create_rejects_missing_required_field() {
    let app = setup_test_app().await;

    let mut body = listing_json("No make");
    body.as_object_mut().unwrap().remove("make");

    let response = post_listing(&app.router, Some(TEST_ADMIN_TOKEN), &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = read_json(response).await;
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn create_rejects_unknown_enum_value() {
    let app = setup_test_app().await;

    let mut body = listing_json("Salvage title");
    body["condition"] = serde_json::json!("Salvage");

    let response = post_listing(&app.router, Some(TEST_ADMIN_TOKEN), &body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, listings) = get_json(&app.router, "/api/cars").await;
    assert_eq!(listings, serde_json::json!([]));
}

#[tokio::test]
async fn list_returns_newest_first_with_string_ids() {
    let app = setup_test_app().await;

    for title in ["oldest", "middle", "newest"] {
        let response =
            post_listing(&app.router, Some(TEST_ADMIN_TOKEN), &listing_json(title)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let (status, json) = get_json(&app.router, "/api/cars").await;
    assert_eq!(status, StatusCode::OK);

    let listings = json.as_array().unwrap();
    let titles: Vec<&str> = listings
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    assert!(listings.iter().all(|l| l["id"].is_string()));
}

#[tokio::test]
async fn get_listing_by_id() {
    let app = setup_test_app().await;

    let response =
        post_listing(&app.router, Some(TEST_ADMIN_TOKEN), &listing_json("Lookup me")).await;
    let created = read_json(response).await;
    let id = created["id"].as_str().unwrap();

    let (status, json) = get_json(&app.router, &format!("/api/cars/{id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Lookup me");
    assert_eq!(json["id"], created["id"]);
}

#[tokio::test]
async fn get_unknown_listing_returns_404() {
    let app = setup_test_app().await;

    let (status, json) = get_json(
        &app.router,
        "/api/cars/00000000-0000-4000-8000-000000000000",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");

    let (status, _) = get_json(&app.router, "/api/cars/not-a-uuid").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_contact_email() {
    let app = setup_test_app().await;

    let response = post_email(
        &app.router,
        &serde_json::json!({
            "type": "contact",
            "formData": {
                "name": "Ada",
                "email": "ada@example.com",
                "subject": "Test drive",
                "message": "Can I book a test drive on Saturday?"
            }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, serde_json::json!({"success": true}));

    let sent = app.sent_emails.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["to"], serde_json::json!(["sales@dealer.test"]));
    assert_eq!(sent[0]["subject"], "New contact enquiry: Test drive");
    assert_eq!(sent[0]["reply_to"], "ada@example.com");
}

#[tokio::test]
async fn send_order_email() {
    let app = setup_test_app().await;

    let response = post_email(
        &app.router,
        &serde_json::json!({
            "type": "order",
            "formData": {
                "name": "Grace",
                "email": "grace@example.com",
                "carTitle": "2019 Toyota Corolla",
                "carId": "abc",
                "price": 24500
            }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    let sent = app.sent_emails.lock().unwrap();
    assert_eq!(sent[0]["subject"], "New order request: 2019 Toyota Corolla");
    assert!(sent[0]["html"].as_str().unwrap().contains("Grace"));
}

#[tokio::test]
async fn unknown_notification_type_is_rejected_without_sending() {
    let app = setup_test_app().await;

    let response = post_email(
        &app.router,
        &serde_json::json!({
            "type": "newsletter",
            "formData": {"name": "Ada", "email": "ada@example.com"}
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.sent_emails.lock().unwrap().is_empty());
}

#[tokio::test]
async fn mail_transport_failure_returns_502() {
    let app = setup_test_app().await;

    let response = post_email(
        &app.router,
        &serde_json::json!({
            "type": "contact",
            "formData": {
                "name": "Ada",
                "email": "ada@example.com",
                "message": BOUNCE_MARKER
            }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = read_json(response).await;
    assert_eq!(json["error"], "mail_error");
}
