//! GCP authentication using service account
//!
//! Handles OAuth2 token generation for the Drive API.

use base64::Engine;
use ring::signature::RsaKeyPair;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::providers::document_source::ServiceAccountKey;

/// Read-only Drive scope
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

/// GCP authentication manager
pub struct GcpAuth {
    /// Service account identity and token endpoint
    key: ServiceAccountKey,
    /// Parsed signing key
    key_pair: RsaKeyPair,
    /// OAuth scope requested
    scope: String,
    /// HTTP client for the token exchange
    client: reqwest::Client,
    /// Cached access token
    token: RwLock<Option<CachedToken>>,
}

#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl GcpAuth {
    /// Create from a parsed service account key
    ///
    /// The private key is parsed here so a broken key is reported as a
    /// credential problem before any request is made.
    pub fn new(key: ServiceAccountKey, scope: impl Into<String>, client: reqwest::Client) -> Result<Self> {
        let private_key = key.private_key.replace("\\n", "\n");
        let pem = pem::parse(&private_key)
            .map_err(|e| Error::credential(format!("Failed to parse private key PEM: {}", e)))?;
        let key_pair = RsaKeyPair::from_pkcs8(pem.contents())
            .map_err(|e| Error::credential(format!("Failed to parse private key: {}", e)))?;

        Ok(Self {
            key,
            key_pair,
            scope: scope.into(),
            client,
            token: RwLock::new(None),
        })
    }

    /// Service account e-mail
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Get a valid access token (refreshing if needed)
    pub async fn get_token(&self) -> Result<String> {
        {
            let token = self.token.read().await;
            if let Some(ref cached) = *token {
                // Token valid for at least 60 more seconds
                if cached.expires_at > Instant::now() + Duration::from_secs(60) {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let response = self.refresh_token().await?;
        let lifetime = response.expires_in.unwrap_or(3600);

        let mut token = self.token.write().await;
        *token = Some(CachedToken {
            access_token: response.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });

        Ok(response.access_token)
    }

    /// Build the signed JWT assertion
    fn signed_assertion(&self) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = serde_json::json!({
            "iss": self.key.client_email,
            "scope": self.scope,
            "aud": self.key.token_uri,
            "iat": now,
            "exp": now + 3600,
        });

        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let header = engine.encode(r#"{"alg":"RS256","typ":"JWT"}"#.as_bytes());
        let payload = engine.encode(claims.to_string().as_bytes());
        let signing_input = format!("{}.{}", header, payload);

        let mut signature = vec![0u8; self.key_pair.public().modulus_len()];
        self.key_pair
            .sign(
                &ring::signature::RSA_PKCS1_SHA256,
                &ring::rand::SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|e| Error::credential(format!("Failed to sign JWT: {}", e)))?;

        Ok(format!("{}.{}", signing_input, engine.encode(&signature)))
    }

    /// Exchange a fresh JWT for an access token
    async fn refresh_token(&self) -> Result<TokenResponse> {
        let jwt = self.signed_assertion()?;

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", jwt.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::source_unavailable(format!("Token exchange request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::source_unavailable(format!(
                "Token exchange failed ({}): {}",
                status, body
            )));
        }

        response.json().await.map_err(|e| {
            Error::source_unavailable(format!("Failed to parse token response: {}", e))
        })
    }
}
