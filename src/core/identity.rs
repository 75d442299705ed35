//! Identity and authorization provider.
//!
//! The payment core only ever consumes an [`Identity`] (id + email) for
//! ownership comparisons; how a bearer token becomes an identity is hidden
//! behind the [`IdentityProvider`] trait so real deployments can swap in
//! their own provider.
//!
//! [`TokenIdentityProvider`] is the bundled implementation: it keeps user
//! rows in the store and issues signed HS256 tokens. Credential checking is
//! development-grade (plain comparison against the stored secret); it is not
//! a hardened credential store and is meant to be replaced behind the trait.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::AuthError;
use crate::storage::Store;

/// The authenticated identity attached to a request.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

/// A registered user row as held by the store.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password: password.into(),
            created_at: Utc::now(),
        }
    }

    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// An identity plus the bearer token that proves it.
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub token: String,
}

/// Resolves credentials and bearer tokens to identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a user and open a session for them.
    async fn register(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Verify credentials and open a session.
    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    /// Resolve a bearer token to the identity it names.
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    exp: usize,
}

/// Store-backed provider issuing signed HS256 bearer tokens.
pub struct TokenIdentityProvider {
    store: Arc<dyn Store>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl TokenIdentityProvider {
    pub fn new(store: Arc<dyn Store>, secret: &str, token_ttl: Duration) -> Self {
        Self {
            store,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        }
    }

    fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let expires_at = Utc::now() + self.token_ttl;
        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp().max(0) as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenRejected)
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_ascii_lowercase()
    }
}

#[async_trait]
impl IdentityProvider for TokenIdentityProvider {
    async fn register(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Self::normalize_email(email);
        let user = self
            .store
            .create_user(&email, password)
            .await?
            .ok_or(AuthError::EmailTaken)?;
        let token = self.issue_token(user.id)?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(Session {
            identity: user.identity(),
            token,
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = Self::normalize_email(email);
        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if user.password != password {
            return Err(AuthError::InvalidCredentials);
        }
        let token = self.issue_token(user.id)?;
        Ok(Session {
            identity: user.identity(),
            token,
        })
    }

    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::TokenRejected)?;
        let user = self
            .store
            .get_user(data.claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        Ok(user.identity())
    }
}
