use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{IdentityConfig, IdentityMode};

/// Identity resolved from an access token
#[derive(Debug, Clone)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// Token missing, malformed, expired or rejected by the provider
    #[error("invalid or expired token")]
    InvalidToken,

    /// Provisioning refused because the account already exists
    #[error("account already exists")]
    AccountExists,

    #[error("identity provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected identity provider response: {0}")]
    Provider(String),
}

/// Seam to the hosted identity provider. Every admin check performs one
/// `resolve` round trip; there is no caching of results across requests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve an access token to the account it belongs to
    async fn resolve(&self, access_token: &str) -> Result<ProviderUser, IdentityError>;

    /// Create a new provider account (first-run admin bootstrap)
    async fn provision(&self, email: &str, password: &str) -> Result<ProviderUser, IdentityError>;

    /// Verify a password against an existing account and return it.
    /// Bootstrap uses this to re-attach a provider account that was
    /// created by an attempt that died before finishing.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, IdentityError>;
}

/// Build the provider selected by configuration
pub fn from_config(cfg: &IdentityConfig) -> Box<dyn IdentityProvider> {
    match cfg.mode {
        IdentityMode::Remote => {
            Box::new(HttpIdentityProvider::new(cfg.base_url.clone(), cfg.anon_key.clone()))
        }
        IdentityMode::Local => Box::new(LocalJwtProvider::new(cfg.jwt_secret.clone())),
    }
}

/// Talks to a GoTrue-style auth HTTP API
pub struct HttpIdentityProvider {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: Uuid,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignupResponse {
    // autoconfirm deployments return the user at the top level,
    // confirm-required ones nest it
    id: Option<Uuid>,
    email: Option<String>,
    user: Option<UserResponse>,
}

impl HttpIdentityProvider {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self { base_url, anon_key, client: reqwest::Client::new() }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve(&self, access_token: &str) -> Result<ProviderUser, IdentityError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let user: UserResponse = response
                    .json()
                    .await
                    .map_err(|e| IdentityError::Provider(e.to_string()))?;
                Ok(ProviderUser { id: user.id, email: user.email })
            }
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Err(IdentityError::InvalidToken)
            }
            status => Err(IdentityError::Provider(format!("user lookup returned {}", status))),
        }
    }

    async fn provision(&self, email: &str, password: &str) -> Result<ProviderUser, IdentityError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: SignupResponse = response
                    .json()
                    .await
                    .map_err(|e| IdentityError::Provider(e.to_string()))?;

                if let Some(id) = body.id {
                    return Ok(ProviderUser { id, email: body.email });
                }
                if let Some(user) = body.user {
                    return Ok(ProviderUser { id: user.id, email: user.email });
                }
                Err(IdentityError::Provider("signup response missing user id".to_string()))
            }
            reqwest::StatusCode::UNPROCESSABLE_ENTITY | reqwest::StatusCode::CONFLICT => {
                Err(IdentityError::AccountExists)
            }
            status => Err(IdentityError::Provider(format!("signup returned {}", status))),
        }
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, IdentityError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/token?grant_type=password", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                #[derive(Debug, Deserialize)]
                struct TokenResponse {
                    user: UserResponse,
                }

                let body: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| IdentityError::Provider(e.to_string()))?;
                Ok(ProviderUser { id: body.user.id, email: body.user.email })
            }
            reqwest::StatusCode::BAD_REQUEST
            | reqwest::StatusCode::UNAUTHORIZED
            | reqwest::StatusCode::FORBIDDEN => Err(IdentityError::InvalidToken),
            status => Err(IdentityError::Provider(format!("password grant returned {}", status))),
        }
    }
}

/// Claims carried by provider-issued access tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderClaims {
    pub sub: String,
    pub email: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Verifies provider JWTs locally with the shared signing secret.
/// Used in development and tests; expiry is enforced by the decoder.
pub struct LocalJwtProvider {
    secret: String,
}

impl LocalJwtProvider {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Mint a token for the given account, valid for `ttl_hours` (may be
    /// negative to produce an already-expired token in tests)
    pub fn issue(
        &self,
        user_id: Uuid,
        email: Option<String>,
        ttl_hours: i64,
    ) -> Result<String, IdentityError> {
        let now = Utc::now();
        let claims = ProviderClaims {
            sub: user_id.to_string(),
            email,
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| IdentityError::Provider(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for LocalJwtProvider {
    async fn resolve(&self, access_token: &str) -> Result<ProviderUser, IdentityError> {
        let data = decode::<ProviderClaims>(
            access_token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| IdentityError::InvalidToken)?;

        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| IdentityError::InvalidToken)?;
        Ok(ProviderUser { id, email: data.claims.email })
    }

    async fn provision(&self, email: &str, _password: &str) -> Result<ProviderUser, IdentityError> {
        // No external account store in local mode; fabricate an id
        Ok(ProviderUser { id: Uuid::new_v4(), email: Some(email.to_string()) })
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, IdentityError> {
        // Nothing to check a password against in local mode
        self.provision(email, password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_round_trip() {
        let provider = LocalJwtProvider::new("test-secret".to_string());
        let user_id = Uuid::new_v4();

        let token = provider.issue(user_id, Some("ops@transtech.example".to_string()), 1).unwrap();
        let resolved = provider.resolve(&token).await.unwrap();

        assert_eq!(resolved.id, user_id);
        assert_eq!(resolved.email.as_deref(), Some("ops@transtech.example"));
    }

    #[tokio::test]
    async fn test_local_rejects_expired_token() {
        let provider = LocalJwtProvider::new("test-secret".to_string());
        let token = provider.issue(Uuid::new_v4(), None, -1).unwrap();

        assert!(matches!(provider.resolve(&token).await, Err(IdentityError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_local_rejects_wrong_secret() {
        let issuer = LocalJwtProvider::new("secret-a".to_string());
        let verifier = LocalJwtProvider::new("secret-b".to_string());
        let token = issuer.issue(Uuid::new_v4(), None, 1).unwrap();

        assert!(matches!(verifier.resolve(&token).await, Err(IdentityError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_local_rejects_garbage() {
        let provider = LocalJwtProvider::new("test-secret".to_string());
        assert!(matches!(
            provider.resolve("not-a-jwt").await,
            Err(IdentityError::InvalidToken)
        ));
    }
}
