use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, error};

use shared_models::ServiceAccountKey;

pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
pub const EMULATOR_TOKEN: &str = "owner";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Supplies bearer tokens for store requests.
pub enum TokenSource {
    /// Fixed token, used against the emulator.
    Static(String),
    ServiceAccount {
        key: ServiceAccountKey,
        cached: Mutex<Option<AccessToken>>,
    },
}

impl TokenSource {
    pub fn service_account(key: ServiceAccountKey) -> Self {
        TokenSource::ServiceAccount {
            key,
            cached: Mutex::new(None),
        }
    }

    pub async fn bearer(&self, client: &Client) -> Result<String> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::ServiceAccount { key, cached } => {
                let mut slot = cached.lock().await;
                let now = Utc::now();

                if let Some(token) = slot.as_ref() {
                    if token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now {
                        return Ok(token.value.clone());
                    }
                }

                let token = exchange_assertion(client, key, now).await?;
                let value = token.value.clone();
                *slot = Some(token);
                Ok(value)
            }
        }
    }
}

/// Signs the RS256 assertion a service account trades for an access token.
pub fn sign_assertion(key: &ServiceAccountKey, issued_at: DateTime<Utc>) -> Result<String> {
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: DATASTORE_SCOPE,
        aud: &key.token_uri,
        iat: issued_at.timestamp(),
        exp: issued_at.timestamp() + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .context("service account private_key is not a valid RSA PEM")?;

    jsonwebtoken::encode(&header, &claims, &encoding_key).context("failed to sign token assertion")
}

async fn exchange_assertion(
    client: &Client,
    key: &ServiceAccountKey,
    now: DateTime<Utc>,
) -> Result<AccessToken> {
    let assertion = sign_assertion(key, now)?;
    debug!("Exchanging assertion for {} at {}", key.client_email, key.token_uri);

    let response = client
        .post(&key.token_uri)
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await?;
        error!("Token exchange failed ({}): {}", status, error_text);
        return Err(anyhow!("Authentication error: token exchange failed ({}): {}", status, error_text));
    }

    let body: TokenResponse = response.json().await?;
    let lifetime = body.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);

    Ok(AccessToken {
        value: body.access_token,
        expires_at: now + Duration::seconds(lifetime),
    })
}
