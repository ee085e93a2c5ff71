use reqwest::StatusCode;

use serde_json::json;

use sqlx::PgPool;

use uuid::Uuid;

use wiremock::matchers::*;
use wiremock::{Mock, ResponseTemplate};

use alumni_portal::repo::{PgRegistrationRepo, RegistrationRepo};

use crate::helpers::{lookup_json, submit_minimal, Credentials, TestAdmin, TestApp};

async fn admin_credentials(pool: &PgPool) -> Credentials {
    TestAdmin::register(pool, "admin@example.com", "correct-horse-battery")
        .await
        .credentials()
}

#[sqlx::test(migrations = "./migrations")]
async fn console_requires_authorization(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    let res = app.admin_list(None, None).await.expect("Failed to execute request");
    assert_eq!(StatusCode::UNAUTHORIZED, res.status());

    let wrong = Credentials {
        email: admin.email.clone(),
        password: "wrong-password".into(),
    };
    let res = app
        .admin_list(Some(&wrong), None)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::UNAUTHORIZED, res.status());

    let res = app
        .admin_list(Some(&admin), None)
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn list_returns_newest_first_with_counts(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    submit_minimal(&app, "Jane Doe", "jane@example.com").await;
    let second = submit_minimal(&app, "John Smith", "john@example.com").await;

    let res = app
        .admin_list(Some(&admin), None)
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(2, body["total"]);
    assert_eq!(2, body["filtered"]);
    assert_eq!(second, body["records"][0]["serial_id"]);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn list_filter_narrows_the_snapshot(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    submit_minimal(&app, "Jane Doe", "jane@example.com").await;
    submit_minimal(&app, "John Smith", "john@example.com").await;

    let res = app
        .admin_list(Some(&admin), Some("JANE"))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let body: serde_json::Value = res.json().await.unwrap();
    // Case-insensitive; the full snapshot count is still reported
    assert_eq!(2, body["total"]);
    assert_eq!(1, body["filtered"]);
    assert_eq!("Jane Doe", body["records"][0]["full_name"]);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn update_merges_only_supplied_fields(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    let serial_id = submit_minimal(&app, "Jane Doe", "jane@example.com").await;
    let record = lookup_json(&app, &serial_id).await;
    let id: Uuid = record["id"].as_str().unwrap().parse().unwrap();

    let res = app
        .admin_update(
            Some(&admin),
            id,
            &json!({ "organization_name": "Dept. of Geography" }),
        )
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!("Dept. of Geography", updated["organization_name"]);
    // Untouched fields survive the merge
    assert_eq!("Jane Doe", updated["full_name"]);
    assert_eq!(serial_id, updated["serial_id"]);
    assert_eq!(record["created_at"], updated["created_at"]);
    assert_ne!(record["updated_at"], updated["updated_at"]);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn update_can_clear_an_optional_field(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    let res = app
        .registration_submit(&json!({
            "full_name": "Jane Doe",
            "email_address": "jane@example.com",
            "blood_group": "O+",
        }))
        .await
        .expect("Failed to execute request");
    let serial_id = res.json::<serde_json::Value>().await.unwrap()["serial_id"]
        .as_str()
        .unwrap()
        .to_string();

    let record = lookup_json(&app, &serial_id).await;
    let id: Uuid = record["id"].as_str().unwrap().parse().unwrap();

    let res = app
        .admin_update(Some(&admin), id, &json!({ "blood_group": null }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let updated: serde_json::Value = res.json().await.unwrap();
    assert!(updated["blood_group"].is_null());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn update_keeps_previous_photo_when_upload_fails(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.photo_server)
        .await;

    let photo = {
        use base64::Engine;
        json!({
            "file_name": "portrait.jpg",
            "content_type": "image/jpeg",
            "data": base64::engine::general_purpose::STANDARD.encode([0xFFu8, 0xD8, 0xFF]),
        })
    };

    let res = app
        .registration_submit(&json!({
            "full_name": "Jane Doe",
            "email_address": "jane@example.com",
            "photo": photo,
        }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());
    let serial_id = res.json::<serde_json::Value>().await.unwrap()["serial_id"]
        .as_str()
        .unwrap()
        .to_string();

    let record = lookup_json(&app, &serial_id).await;
    let id: Uuid = record["id"].as_str().unwrap().parse().unwrap();
    let original_photo_url = record["photo_url"].as_str().unwrap().to_string();

    // Now make every further upload fail
    app.photo_server.reset().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.photo_server)
        .await;

    let res = app
        .admin_update(
            Some(&admin),
            id,
            &json!({
                "designation_position": "Lecturer",
                "photo": photo,
            }),
        )
        .await
        .expect("Failed to execute request");

    // The edit still succeeds; only the photo is left as it was
    assert!(res.status().is_success());

    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!("Lecturer", updated["designation_position"]);
    assert_eq!(original_photo_url, updated["photo_url"].as_str().unwrap());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_removes_the_record(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    let serial_id = submit_minimal(&app, "Jane Doe", "jane@example.com").await;
    let record = lookup_json(&app, &serial_id).await;
    let id: Uuid = record["id"].as_str().unwrap().parse().unwrap();

    let res = app
        .admin_delete(Some(&admin), id)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::NO_CONTENT, res.status());

    assert_eq!(0, PgRegistrationRepo::count(&pool).await?);

    let res = app
        .registration_lookup(&serial_id)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::NOT_FOUND, res.status());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn bulk_delete_removes_the_selection(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    let mut ids = Vec::new();
    for (name, email) in [
        ("Jane Doe", "jane@example.com"),
        ("John Smith", "john@example.com"),
    ] {
        let serial_id = submit_minimal(&app, name, email).await;
        let record = lookup_json(&app, &serial_id).await;
        ids.push(record["id"].as_str().unwrap().parse().unwrap());
    }
    submit_minimal(&app, "Farida Rahman", "farida@example.com").await;

    let res = app
        .admin_delete_many(Some(&admin), &ids)
        .await
        .expect("Failed to execute request");
    assert_eq!(StatusCode::NO_CONTENT, res.status());

    assert_eq!(1, PgRegistrationRepo::count(&pool).await?);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn export_quotes_every_field_and_leaves_nulls_empty(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    let res = app
        .registration_submit(&json!({
            "full_name": "Jane Doe",
            "email_address": "jane@example.com",
            "organization_name": "Dept. of Geography",
        }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());
    submit_minimal(&app, "John Smith", "john@example.com").await;

    let res = app
        .admin_export(Some(&admin))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let content_type = res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let disposition = res
        .headers()
        .get("content-disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("alumni_registrations_"));
    assert!(disposition.ends_with(".csv\""));

    let csv = res.text().await.expect("Failed to read body");
    let rows: Vec<&str> = csv.lines().collect();

    assert_eq!(3, rows.len());
    assert!(rows[0].starts_with("\"Serial ID\",\"Full Name\""));
    // John has no organization: the column is an empty quoted string
    let john_row = rows
        .iter()
        .find(|row| row.contains("John Smith"))
        .expect("Missing record row");
    assert!(john_row.contains(",\"\",\"\","));
    assert!(!csv.contains("null"));
    assert!(!csv.contains("N/A"));

    let jane_row = rows
        .iter()
        .find(|row| row.contains("Jane Doe"))
        .expect("Missing record row");
    assert!(jane_row.contains("\"Dept. of Geography\""));

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
async fn print_selection_renders_one_document_per_page(pool: PgPool) -> sqlx::Result<()> {
    let app = TestApp::spawn(&pool).await;
    let admin = admin_credentials(&pool).await;

    let mut ids: Vec<Uuid> = Vec::new();
    for (name, email) in [
        ("Jane Doe", "jane@example.com"),
        ("John Smith", "john@example.com"),
    ] {
        let serial_id = submit_minimal(&app, name, email).await;
        let record = lookup_json(&app, &serial_id).await;
        ids.push(record["id"].as_str().unwrap().parse().unwrap());
    }

    let res = app
        .admin_print(Some(&admin), &ids)
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let html = res.text().await.expect("Failed to read body");
    assert_eq!(2, html.matches("<div class=\"print-form\">").count());
    assert!(html.contains("Jane Doe"));
    assert!(html.contains("John Smith"));

    Ok(())
}
