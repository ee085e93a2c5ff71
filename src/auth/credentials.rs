use actix_web::http::header::{self, HeaderMap};

use anyhow::Context;

use secrecy::Secret;

const BASIC_AUTH_PREFIX: &str = "Basic ";

/// Sign-in credentials presented with an admin request
#[derive(Debug)]
pub struct Credentials {
    pub email: String,
    pub password: Secret<String>,
}

impl Credentials {
    /// Extract credentials from the headers of a request
    pub fn from_headers(headers: &HeaderMap) -> anyhow::Result<Self> {
        let header_value = headers
            .get(header::AUTHORIZATION)
            .context("Missing authorization in header")?
            .to_str()?;

        anyhow::ensure!(
            header_value.starts_with(BASIC_AUTH_PREFIX),
            "Missing or unknown Authorization scheme"
        );
        Self::from_basic(header_value)
    }

    /// Extract credentials from a string formatted as 'Basic <base64 credentials>'
    fn from_basic(header_value: &str) -> anyhow::Result<Self> {
        use base64::Engine;

        let encoded = header_value
            .strip_prefix(BASIC_AUTH_PREFIX)
            .context("Authorization scheme not basic")?;

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .context("Failed to decode authorization header")?;
        let decoded =
            String::from_utf8(decoded).context("Failed to decode authorization header")?;

        // 'email:password', with the password free to contain colons
        let (email, password) = decoded
            .split_once(':')
            .context("Missing password in authorization")?;

        Ok(Self {
            email: email.into(),
            password: Secret::new(password.into()),
        })
    }
}
