use reqwest::StatusCode;

use serde_json::json;

use sqlx::PgPool;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use alumni_portal::repo::{PgRegistrationRepo, RegistrationRepo};

use crate::helpers::{lookup_json, submit_minimal, TestApp};

fn photo_payload() -> serde_json::Value {
    use base64::Engine;

    let bytes = [0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    json!({
        "file_name": "portrait.jpg",
        "content_type": "image/jpeg",
        "data": base64::engine::general_purpose::STANDARD.encode(bytes),
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_returns_serial_for_minimal_valid_request(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let serial_id = submit_minimal(&app, "Jane Doe", "jane@example.com").await;

    assert_eq!(8, serial_id.len());
    assert!(serial_id.bytes().all(|b| b.is_ascii_digit()));

    let record = PgRegistrationRepo::fetch_by_serial_id(&pool, &serial_id.parse().unwrap())
        .await?
        .expect("Submitted record not stored");

    assert_eq!("Jane Doe", record.full_name);
    assert_eq!("jane@example.com", record.email_address);
    // Omitted optionals are stored as NULL, never as empty strings
    assert_eq!(None, record.mobile_number);
    assert_eq!(None, record.photo_url);
    assert_eq!(None, record.areas_of_interest);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_rejects_missing_or_malformed_fields(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let test_cases = vec![
        (
            "blank full name",
            json!({ "full_name": "   ", "email_address": "jane@example.com" }),
        ),
        (
            "malformed email",
            json!({ "full_name": "Jane Doe", "email_address": "not-an-email" }),
        ),
        (
            "short mobile number",
            json!({
                "full_name": "Jane Doe",
                "email_address": "jane@example.com",
                "mobile_number": "12345",
            }),
        ),
        (
            "unknown area of interest",
            json!({
                "full_name": "Jane Doe",
                "email_address": "jane@example.com",
                "areas_of_interest": ["Gardening"],
            }),
        ),
    ];

    for (desc, body) in test_cases {
        let res = app
            .registration_submit(&body)
            .await
            .expect("Failed to execute request");

        assert_eq!(
            StatusCode::BAD_REQUEST,
            res.status(),
            "API did not fail when payload had {}",
            desc
        );
    }

    // Validation happens before any store call
    assert_eq!(0, PgRegistrationRepo::count(&pool).await?);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn stored_record_round_trips_optional_nulls(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .registration_submit(&json!({
            "full_name": "  Jane Doe  ",
            "email_address": "jane@example.com",
            "gender": "Female",
            "blood_group": "   ",
            "session": "2015-16",
            "interested_in_activities": true,
            "areas_of_interest": ["Research Collaboration", "Mentorship Programs"],
        }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let body: serde_json::Value = res.json().await.unwrap();
    let serial_id = body["serial_id"].as_str().unwrap();

    let record = lookup_json(&app, serial_id).await;

    // Strings arrive trimmed, blanks collapse to null
    assert_eq!("Jane Doe", record["full_name"]);
    assert_eq!("Female", record["gender"]);
    assert!(record["blood_group"].is_null());
    assert!(record["mobile_number"].is_null());
    assert_eq!("2015-16", record["session"]);
    assert_eq!(true, record["interested_in_activities"]);
    // Selection order is preserved
    assert_eq!(
        json!(["Research Collaboration", "Mentorship Programs"]),
        record["areas_of_interest"]
    );

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn lookup_miss_is_not_found_not_an_error(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .registration_lookup("99999999")
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::NOT_FOUND, res.status());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn lookup_rejects_malformed_serial(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .registration_lookup("ABC12345")
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_with_photo_stores_its_public_url(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/object/photos/\d{8}\.jpg$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.photo_server)
        .await;

    let res = app
        .registration_submit(&json!({
            "full_name": "Jane Doe",
            "email_address": "jane@example.com",
            "photo": photo_payload(),
        }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let body: serde_json::Value = res.json().await.unwrap();
    let serial_id = body["serial_id"].as_str().unwrap();

    let record = PgRegistrationRepo::fetch_by_serial_id(&pool, &serial_id.parse().unwrap())
        .await?
        .expect("Submitted record not stored");

    let photo_url = record.photo_url.expect("Photo URL not stored");
    assert!(photo_url.ends_with(&format!("/object/public/photos/{}.jpg", serial_id)));

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_survives_a_failed_photo_upload(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.photo_server)
        .await;

    let res = app
        .registration_submit(&json!({
            "full_name": "Jane Doe",
            "email_address": "jane@example.com",
            "photo": photo_payload(),
        }))
        .await
        .expect("Failed to execute request");

    // Graceful degradation: registration succeeds without the photo
    assert!(res.status().is_success());

    let body: serde_json::Value = res.json().await.unwrap();
    let serial_id = body["serial_id"].as_str().unwrap();

    let record = PgRegistrationRepo::fetch_by_serial_id(&pool, &serial_id.parse().unwrap())
        .await?
        .expect("Submitted record not stored");
    assert_eq!(None, record.photo_url);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn submit_rejects_non_image_photo(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let res = app
        .registration_submit(&json!({
            "full_name": "Jane Doe",
            "email_address": "jane@example.com",
            "photo": {
                "file_name": "resume.pdf",
                "content_type": "application/pdf",
                "data": "JVBERi0xLjQ=",
            },
        }))
        .await
        .expect("Failed to execute request");

    assert_eq!(StatusCode::BAD_REQUEST, res.status());
    assert_eq!(0, PgRegistrationRepo::count(&pool).await?);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn print_renders_the_registration_document(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;

    let serial_id = submit_minimal(&app, "Jane Doe", "jane@example.com").await;

    let res = app
        .registration_print(&serial_id)
        .await
        .expect("Failed to execute request");

    assert!(res.status().is_success());
    let content_type = res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let html = res.text().await.expect("Failed to read body");
    assert!(html.contains("Membership Registration Form"));
    assert!(html.contains(&format!("Form No: {}", serial_id)));
    assert!(html.contains("Jane Doe"));

    Ok(())
}
