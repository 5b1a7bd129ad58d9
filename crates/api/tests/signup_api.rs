//! HTTP-level integration tests for the waitlist signup endpoints.
//!
//! Requests go straight to the router via `tower::ServiceExt`; the store is
//! an in-memory `MemoryStore` so tests can inspect rows and inject failures.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with, get, post_json, post_raw};
use mg_core::signup::{
    MSG_EMAIL_INVALID, MSG_GENRE_REQUIRED, MSG_LEVEL_REQUIRED, MSG_LEVEL_UNKNOWN,
    MSG_NAME_REQUIRED, MSG_UNEXPECTED,
};
use mg_db::repositories::SIGNUP_COLLECTION;
use mg_db::{MemoryStore, StoreError};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn valid_signup() -> Value {
    json!({
        "name": "Alex Turner",
        "email": "alex@example.com",
        "genres": ["Rock", "Blues"],
        "experienceLevel": "Intermediate",
        "favoriteArtists": ["Jimi Hendrix", "B.B. King"],
        "featuresRequest": "Chord charts please"
    })
}

// ---------------------------------------------------------------------------
// Test: GET /api/v1/signups/options lists the form choices
// ---------------------------------------------------------------------------

#[tokio::test]
async fn options_list_genres_and_levels() {
    let response = get(build_test_app(), "/api/v1/signups/options").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let genres = json["data"]["genres"].as_array().unwrap();
    assert_eq!(genres.len(), 13);
    assert_eq!(genres[0], "Rock");
    assert_eq!(
        json["data"]["experience_levels"],
        json!(["Beginner", "Intermediate", "Advanced", "Professional"])
    );
}

// ---------------------------------------------------------------------------
// Test: POST /api/v1/signups/validate reports every problem, writes nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn validate_reports_all_errors_in_order() {
    let store = Arc::new(MemoryStore::with_default_schema());
    let app = build_test_app_with(store.clone());

    let response = post_json(app, "/api/v1/signups/validate", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(
        json["data"]["errors"],
        json!([
            MSG_NAME_REQUIRED,
            MSG_EMAIL_INVALID,
            MSG_GENRE_REQUIRED,
            MSG_LEVEL_REQUIRED
        ])
    );
    assert_eq!(store.row_count(SIGNUP_COLLECTION).await, 0);
}

#[tokio::test]
async fn validate_accepts_a_complete_form() {
    let response = post_json(build_test_app(), "/api/v1/signups/validate", valid_signup()).await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], true);
    assert_eq!(json["data"]["errors"], json!([]));
}

// ---------------------------------------------------------------------------
// Test: POST /api/v1/signups stores a normalized row
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_signup_returns_201_with_normalized_row() {
    let store = Arc::new(MemoryStore::with_default_schema());
    let app = build_test_app_with(store.clone());

    let mut body = valid_signup();
    body["name"] = json!("  Alex Turner  ");
    body["email"] = json!("  Alex@Example.COM ");

    let response = post_json(app, "/api/v1/signups", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let rows = json["data"].as_array().expect("data should be an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Alex Turner");
    assert_eq!(rows[0]["email"], "alex@example.com");
    assert_eq!(rows[0]["genres"], json!(["Rock", "Blues"]));
    assert_eq!(rows[0]["experience_level"], "Intermediate");
    assert_eq!(rows[0]["favorite_artists"], json!(["Jimi Hendrix", "B.B. King"]));
    assert_eq!(rows[0]["features_request"], "Chord charts please");
    assert!(rows[0]["id"].is_i64());
    assert!(rows[0]["created_at"].is_string());

    assert_eq!(store.row_count(SIGNUP_COLLECTION).await, 1);
}

#[tokio::test]
async fn create_signup_accepts_snake_case_fields() {
    let body = json!({
        "name": "Sam",
        "email": "sam@example.com",
        "genres": ["Jazz"],
        "experience_level": "Advanced",
        "favorite_artists": [],
        "features_request": ""
    });

    let response = post_json(build_test_app(), "/api/v1/signups", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"][0]["experience_level"], "Advanced");
}

// ---------------------------------------------------------------------------
// Test: validation failures return 400 with the message list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_signup_with_invalid_fields_returns_400() {
    let store = Arc::new(MemoryStore::with_default_schema());
    let app = build_test_app_with(store.clone());

    let mut body = valid_signup();
    body["email"] = json!("not-an-email");
    body["genres"] = json!([]);

    let response = post_json(app, "/api/v1/signups", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["errors"], json!([MSG_EMAIL_INVALID, MSG_GENRE_REQUIRED]));
    assert_eq!(
        json["error"],
        format!("{MSG_EMAIL_INVALID}. {MSG_GENRE_REQUIRED}")
    );
    assert_eq!(store.row_count(SIGNUP_COLLECTION).await, 0);
}

#[tokio::test]
async fn unknown_experience_level_is_rejected() {
    let mut body = valid_signup();
    body["experienceLevel"] = json!("Wizard");

    let response = post_json(build_test_app(), "/api/v1/signups", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["errors"], json!([MSG_LEVEL_UNKNOWN]));
}

#[tokio::test]
async fn oddly_typed_fields_are_reported_not_rejected() {
    let body = json!({
        "name": 42,
        "email": "alex@example.com",
        "genres": "Rock",
        "experienceLevel": "Beginner"
    });

    let response = post_json(build_test_app(), "/api/v1/signups", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["errors"], json!([MSG_NAME_REQUIRED, MSG_GENRE_REQUIRED]));
}

#[tokio::test]
async fn both_spellings_of_a_field_are_accepted_together() {
    let body = r#"{
        "name": "Sam",
        "email": "sam@example.com",
        "genres": ["Jazz"],
        "experienceLevel": "Advanced",
        "experience_level": "Beginner"
    }"#;

    let response = post_raw(build_test_app(), "/api/v1/signups", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"][0]["experience_level"], "Advanced");
}

#[tokio::test]
async fn non_object_body_is_reported_by_the_validator() {
    let response = post_raw(build_test_app(), "/api/v1/signups", r#"["Alex"]"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["errors"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn malformed_json_is_a_client_error() {
    let response = post_raw(build_test_app(), "/api/v1/signups", "{not json").await;
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Test: store outcomes map onto signup error codes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_email_returns_409() {
    let store = Arc::new(MemoryStore::with_default_schema());

    let first = post_json(build_test_app_with(store.clone()), "/api/v1/signups", valid_signup()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let mut again = valid_signup();
    again["email"] = json!("ALEX@example.com");
    let response = post_json(build_test_app_with(store.clone()), "/api/v1/signups", again).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "DUPLICATE_EMAIL");
    assert_eq!(json["error"], "An account with this email already exists");
    assert_eq!(store.row_count(SIGNUP_COLLECTION).await, 1);
}

#[tokio::test]
async fn not_null_rejection_returns_missing_required_field() {
    let store = Arc::new(MemoryStore::with_default_schema());
    store
        .fail_next(StoreError::api(
            400,
            "23502",
            "null value in column \"name\" violates not-null constraint",
        ))
        .await;

    let response = post_json(build_test_app_with(store), "/api/v1/signups", valid_signup()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "MISSING_REQUIRED_FIELD");
    assert_eq!(json["error"], "Missing required field");
}

#[tokio::test]
async fn other_store_rejection_passes_message_through() {
    let store = Arc::new(MemoryStore::with_default_schema());
    store
        .fail_next(StoreError::api(
            404,
            "42P01",
            "relation \"public.beta_signups\" does not exist",
        ))
        .await;

    let response = post_json(build_test_app_with(store), "/api/v1/signups", valid_signup()).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "PERSISTENCE_FAILURE");
    assert_eq!(json["error"], "relation \"public.beta_signups\" does not exist");
}

#[tokio::test]
async fn unreadable_store_response_gets_generic_message() {
    let store = Arc::new(MemoryStore::with_default_schema());
    store
        .fail_next(StoreError::Decode("expected rows, got number".into()))
        .await;

    let response = post_json(build_test_app_with(store), "/api/v1/signups", valid_signup()).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["code"], "PERSISTENCE_FAILURE");
    assert_eq!(json["error"], MSG_UNEXPECTED);
}
