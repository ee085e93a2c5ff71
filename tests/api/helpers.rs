use std::net::TcpListener;
use std::time::Duration;

use reqwest::{Client, Method, Response};

use sqlx::PgPool;

use serde_json::json;

use url::Url;

use uuid::Uuid;

use wiremock::MockServer;

use alumni_portal::app;
use alumni_portal::client::PhotoStore;
use alumni_portal::repo::{NewUser, UsersRepo};

pub struct TestApp {
    addr: String,

    pub client: Client,
    pub photo_server: MockServer,
}

impl TestApp {
    pub async fn spawn(pool: &PgPool) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let photo_server = MockServer::start().await;

        let photo_store = {
            let api_base_url =
                Url::parse(&format!("{}/", photo_server.uri())).expect("Failed to parse mock URI");
            let api_key = "TestStorageKey".parse().expect("Failed to parse API key");
            let api_timeout = Duration::from_secs(2);

            PhotoStore::new(api_base_url, api_key, "photos".into(), api_timeout)
                .expect("Failed to create photo store client")
        };

        let server =
            app::run(listener, pool.clone(), photo_store).expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self {
            addr,
            client,
            photo_server,
        }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub fn authorized_request(
        &self,
        method: Method,
        url: &str,
        credentials: Option<&Credentials>,
    ) -> reqwest::RequestBuilder {
        let req = self.request(method, url);
        if let Some(creds) = credentials {
            req.basic_auth(creds.email.clone(), Some(creds.password.clone()))
        } else {
            req
        }
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn registration_submit(
        &self,
        body: &serde_json::Value,
    ) -> reqwest::Result<Response> {
        self.request(Method::POST, "registrations")
            .json(body)
            .send()
            .await
    }

    pub async fn registration_lookup(&self, serial_id: &str) -> reqwest::Result<Response> {
        self.request(Method::GET, &format!("registrations/{}", serial_id))
            .send()
            .await
    }

    pub async fn registration_print(&self, serial_id: &str) -> reqwest::Result<Response> {
        self.request(Method::GET, &format!("registrations/{}/print", serial_id))
            .send()
            .await
    }

    pub async fn admin_list(
        &self,
        credentials: Option<&Credentials>,
        term: Option<&str>,
    ) -> reqwest::Result<Response> {
        let url = match term {
            Some(term) => format!("admin/registrations?q={}", term),
            None => "admin/registrations".into(),
        };
        self.authorized_request(Method::GET, &url, credentials)
            .send()
            .await
    }

    pub async fn admin_update(
        &self,
        credentials: Option<&Credentials>,
        id: Uuid,
        body: &serde_json::Value,
    ) -> reqwest::Result<Response> {
        self.authorized_request(
            Method::PATCH,
            &format!("admin/registrations/{}", id),
            credentials,
        )
        .json(body)
        .send()
        .await
    }

    pub async fn admin_delete(
        &self,
        credentials: Option<&Credentials>,
        id: Uuid,
    ) -> reqwest::Result<Response> {
        self.authorized_request(
            Method::DELETE,
            &format!("admin/registrations/{}", id),
            credentials,
        )
        .send()
        .await
    }

    pub async fn admin_delete_many(
        &self,
        credentials: Option<&Credentials>,
        ids: &[Uuid],
    ) -> reqwest::Result<Response> {
        self.authorized_request(Method::POST, "admin/registrations/delete", credentials)
            .json(&json!({ "ids": ids }))
            .send()
            .await
    }

    pub async fn admin_export(
        &self,
        credentials: Option<&Credentials>,
    ) -> reqwest::Result<Response> {
        self.authorized_request(Method::GET, "admin/registrations/export", credentials)
            .send()
            .await
    }

    pub async fn admin_print(
        &self,
        credentials: Option<&Credentials>,
        ids: &[Uuid],
    ) -> reqwest::Result<Response> {
        let ids = ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.authorized_request(
            Method::GET,
            &format!("admin/registrations/print?ids={}", ids),
            credentials,
        )
        .send()
        .await
    }
}

/// Submit a minimal valid registration and hand back its serial ID
pub async fn submit_minimal(app: &TestApp, full_name: &str, email: &str) -> String {
    let res = app
        .registration_submit(&json!({
            "full_name": full_name,
            "email_address": email,
        }))
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());

    let body: serde_json::Value = res.json().await.expect("Failed to parse response");
    body["serial_id"].as_str().expect("Missing serial_id").to_string()
}

/// Fetch the stored record behind a serial ID as JSON
pub async fn lookup_json(app: &TestApp, serial_id: &str) -> serde_json::Value {
    let res = app
        .registration_lookup(serial_id)
        .await
        .expect("Failed to execute request");
    assert!(res.status().is_success());
    res.json().await.expect("Failed to parse record")
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct TestAdmin {
    pub id: Uuid,
    pub email: String,
    pub password: String,
}

impl TestAdmin {
    pub async fn register(pool: &PgPool, email: &str, password: &str) -> Self {
        use argon2::password_hash::SaltString;
        use argon2::{Argon2, PasswordHasher};

        let salt = SaltString::generate(&mut rand::thread_rng());

        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("Failed to hash user password")
            .to_string();

        let new_user = NewUser {
            email: email.parse().expect("Failed to parse email address"),
            password_hash,
        };

        let id = UsersRepo::insert(pool, &new_user)
            .await
            .expect("Failed to insert test user");

        Self {
            id,
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}
