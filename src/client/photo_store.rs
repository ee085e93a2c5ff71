use std::convert::Infallible;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};

use secrecy::Secret;

use url::Url;

const UPSERT_HEADER: &str = "x-upsert";

/// Client for the photo bucket of the hosted blob store.
/// Keys live in the same namespace as registration serial IDs; the caller
/// derives them. Transient transport failures are retried once; uploads are
/// idempotent under the store's upsert flag, so the retry is safe.
#[derive(Debug)]
pub struct PhotoStore {
    client: Client,
    bucket: String,

    api_object_url: Url,
    api_public_url: Url,
    api_key: StorageApiKey,
}

impl PhotoStore {
    pub fn new(
        api_base_url: Url,
        api_key: StorageApiKey,
        bucket: String,
        api_timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(api_timeout)
            .build()
            .context("Failed to build http client")?;

        let api_object_url = api_base_url
            .join("object/")
            .context("Failed to create object endpoint URL")?;
        let api_public_url = api_object_url
            .join("public/")
            .context("Failed to create public object URL")?;

        Ok(Self {
            client,
            bucket,
            api_object_url,
            api_public_url,
            api_key,
        })
    }

    /// Upload a photo under `key` and hand back its public URL
    pub async fn upload(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
        upsert: bool,
    ) -> anyhow::Result<Url> {
        use secrecy::ExposeSecret;

        let url = self.object_url(key)?;

        let request = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose_secret()))
            .header(CONTENT_TYPE, content_type)
            .header(UPSERT_HEADER, if upsert { "true" } else { "false" })
            .body(bytes);

        send_with_retry(request).await?.error_for_status()?;

        self.public_url(key)
    }

    /// Best-effort removal, used to compensate an upload whose record
    /// insert failed afterwards
    pub async fn delete(&self, key: &str) -> anyhow::Result<()> {
        use secrecy::ExposeSecret;

        let url = self.object_url(key)?;

        let request = self
            .client
            .delete(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose_secret()));

        send_with_retry(request).await?.error_for_status()?;
        Ok(())
    }

    /// Public, unauthenticated URL of an uploaded photo
    pub fn public_url(&self, key: &str) -> anyhow::Result<Url> {
        self.api_public_url
            .join(&format!("{}/{}", self.bucket, key))
            .context("Failed to create public photo URL")
    }

    fn object_url(&self, key: &str) -> anyhow::Result<Url> {
        self.api_object_url
            .join(&format!("{}/{}", self.bucket, key))
            .context("Failed to create photo object URL")
    }
}

/// Send a request, retrying once on a transient transport failure
/// (timeout or failure to connect). Protocol-level errors are not retried.
async fn send_with_retry(request: RequestBuilder) -> reqwest::Result<Response> {
    let retry = request.try_clone();

    match request.send().await {
        Err(error) if error.is_timeout() || error.is_connect() => match retry {
            Some(retry) => {
                tracing::warn!(
                    error.cause_chain = ?error,
                    "Transient blob store failure, retrying once"
                );
                retry.send().await
            }
            None => Err(error),
        },
        result => result,
    }
}

/// API key for the blob store, kept out of logs
#[derive(Debug)]
pub struct StorageApiKey(Secret<String>);

impl FromStr for StorageApiKey {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Infallible> {
        let value = value.to_string();
        let value = Secret::new(value);

        Ok(Self(value))
    }
}

impl From<Secret<String>> for StorageApiKey {
    fn from(value: Secret<String>) -> Self {
        Self(value)
    }
}

impl secrecy::ExposeSecret<String> for StorageApiKey {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}
