/*!
 * # Authentication and authorization
 *
 * Credential verification, identity-token issuance and the role gate used
 * by every resource handler.
 *
 * Login issues a signed, time-bound HS256 token carrying the caller's id,
 * role, name and email. Logout adds the token's `jti` to an in-process
 * revocation list consulted on every validation. Password resets go through
 * a persisted, hashed, single-use token with a one-hour expiry enforced at
 * read time.
 */

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use http::{header, request::Parts};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

// Entity modules
pub mod password_reset_token;
pub mod user;

// Feature modules
mod rbac;
mod types;

// Re-exports
pub use rbac::*;
pub use types::*;

use crate::config::AppConfig;
use crate::errors::ServiceError;

/// Claim structure for identity tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,   // Subject (user ID)
    pub role: String,  // User's role
    pub name: String,  // User's name
    pub email: String, // User's email
    pub jti: String,   // Unique identifier for this token
    pub iat: i64,      // Issued at time
    pub exp: i64,      // Expiration time
}

/// Authenticated caller extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub token_id: String,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ServiceError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Invalid authentication token".to_string()))?;
        let role = Role::from_str(&claims.role)
            .map_err(|_| ServiceError::Unauthorized("Invalid authentication token".to_string()))?;
        Ok(AuthUser {
            user_id,
            role,
            name: claims.name,
            email: claims.email,
            token_id: claims.jti,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    crate::AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = crate::AppState::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServiceError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = app_state.auth.validate_token(token).await?;
        AuthUser::try_from(claims)
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiration: Duration,
    pub reset_token_expiration: Duration,
}

impl AuthConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_expiration: Duration::from_secs(config.jwt_expiration),
            reset_token_expiration: Duration::from_secs(config.reset_token_expiration),
        }
    }
}

/// Revocation list entry; pruned once the underlying token has expired anyway.
#[derive(Clone, Debug)]
struct RevokedToken {
    jti: String,
    expires_at: DateTime<Utc>,
}

/// Authentication service handling signup, login, token validation and the
/// password-reset flow.
#[derive(Debug)]
pub struct AuthService {
    config: AuthConfig,
    db: Arc<DatabaseConnection>,
    revoked_tokens: RwLock<Vec<RevokedToken>>,
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self {
            config,
            db,
            revoked_tokens: RwLock::new(Vec::new()),
        }
    }

    /// Register a new user. Fails with `Conflict` when the email is taken
    /// and `ValidationError` for an unknown role.
    pub async fn signup(&self, request: &SignupRequest) -> Result<user::Model, ServiceError> {
        let role = Role::from_str(&request.role).map_err(|_| {
            ServiceError::ValidationError(
                "role must be one of Admin, Sales, Warehouse".to_string(),
            )
        })?;

        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(request.email.as_str()))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict("Email already registered".to_string()));
        }

        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.clone()),
            email: Set(request.email.clone()),
            password_hash: Set(self.hash_password(&request.password)?),
            role: Set(role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let user = model.insert(&*self.db).await?;
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    /// Verify credentials and issue an identity token. The identifier
    /// matches either name or email; failures never reveal which part was
    /// wrong.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<(String, user::Model), ServiceError> {
        let user = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Name.eq(identifier))
                    .add(user::Column::Email.eq(identifier)),
            )
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;

        if !self.verify_password(&user.password_hash, password) {
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok((token, user))
    }

    /// Issue a signed identity token for a user.
    pub fn issue_token(&self, user: &user::Model) -> Result<String, ServiceError> {
        let now = Utc::now();
        let expires_at = now
            + ChronoDuration::from_std(self.config.token_expiration)
                .map_err(|_| ServiceError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| ServiceError::InternalError(format!("token creation failed: {}", e)))
    }

    /// Validate a token and extract its claims, rejecting revoked tokens.
    pub async fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ServiceError::Unauthorized("Token has expired".to_string())
            }
            _ => ServiceError::Unauthorized("Invalid authentication token".to_string()),
        })?
        .claims;

        if self.is_token_revoked(&claims.jti).await {
            return Err(ServiceError::Unauthorized(
                "Token has been revoked".to_string(),
            ));
        }

        Ok(claims)
    }

    /// Revoke a token by its `jti`. Entries are kept for at most one token
    /// lifetime, after which expiry rejects the token anyway.
    pub async fn revoke_token(&self, token_id: &str) -> Result<(), ServiceError> {
        let retention = ChronoDuration::from_std(self.config.token_expiration)
            .map_err(|_| ServiceError::InternalError("Invalid token duration".to_string()))?;

        let mut revoked = self.revoked_tokens.write().await;
        let now = Utc::now();
        revoked.retain(|entry| entry.expires_at > now);
        revoked.push(RevokedToken {
            jti: token_id.to_string(),
            expires_at: now + retention,
        });
        Ok(())
    }

    async fn is_token_revoked(&self, token_id: &str) -> bool {
        let revoked = self.revoked_tokens.read().await;
        revoked.iter().any(|entry| entry.jti == token_id)
    }

    /// Start the password-reset flow: persist a hashed single-use token and
    /// log the reset link (delivery is simulated, there is no mail
    /// transport). Returns the raw token.
    pub async fn forgot_password(&self, email: &str) -> Result<String, ServiceError> {
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Email not found".to_string()))?;

        let token: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();

        let now = Utc::now();
        let expires_at = now
            + ChronoDuration::from_std(self.config.reset_token_expiration)
                .map_err(|_| ServiceError::InternalError("Invalid token duration".to_string()))?;

        let model = password_reset_token::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            token_hash: Set(hash_reset_token(&token)),
            expires_at: Set(expires_at),
            created_at: Set(now),
            used_at: Set(None),
        };
        model.insert(&*self.db).await?;

        info!(
            user_id = %user.id,
            "password reset link (simulated delivery): /reset-password?token={}",
            token
        );
        Ok(token)
    }

    /// Complete the password-reset flow. The token must exist, be unused
    /// and unexpired; on success the password hash is overwritten and the
    /// token consumed, both in one transaction.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let record = password_reset_token::Entity::find()
            .filter(password_reset_token::Column::TokenHash.eq(hash_reset_token(token)))
            .one(&*self.db)
            .await?;

        let record = match record {
            Some(record) if record.used_at.is_none() && record.expires_at > Utc::now() => record,
            _ => {
                return Err(ServiceError::ValidationError(
                    "Invalid or expired token".to_string(),
                ))
            }
        };

        let user = user::Entity::find_by_id(record.user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

        let password_hash = self.hash_password(new_password)?;
        let user_id = user.id;

        let txn = self.db.begin().await?;

        let mut user_active: user::ActiveModel = user.into();
        user_active.password_hash = Set(password_hash);
        user_active.updated_at = Set(Utc::now());
        user_active.update(&txn).await?;

        let mut token_active: password_reset_token::ActiveModel = record.into();
        token_active.used_at = Set(Some(Utc::now()));
        token_active.update(&txn).await?;

        txn.commit().await?;
        info!(user_id = %user_id, "password reset completed");
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ServiceError::InternalError(format!("password hashing failed: {}", e)))
    }

    fn verify_password(&self, password_hash: &str, password: &str) -> bool {
        PasswordHash::new(password_hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

/// Reset tokens are stored hashed so a database leak does not expose them.
fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> AuthService {
        let db = sea_orm::Database::connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        AuthService::new(
            AuthConfig {
                jwt_secret: "unit_test_secret_that_is_long_enough_123".to_string(),
                token_expiration: Duration::from_secs(3600),
                reset_token_expiration: Duration::from_secs(3600),
            },
            Arc::new(db),
        )
    }

    fn sample_user() -> user::Model {
        user::Model {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            role: "Sales".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn password_hash_verifies_and_rejects() {
        let service = service().await;
        let hash = service.hash_password("p").unwrap();
        assert!(service.verify_password(&hash, "p"));
        assert!(!service.verify_password(&hash, "wrong"));
        assert!(!service.verify_password("not-a-hash", "p"));
    }

    #[tokio::test]
    async fn issued_tokens_round_trip() {
        let service = service().await;
        let user = sample_user();
        let token = service.issue_token(&user).unwrap();

        let claims = service.validate_token(&token).await.unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.role, "Sales");
        assert_eq!(claims.email, "ada@example.com");

        let auth_user = AuthUser::try_from(claims).unwrap();
        assert_eq!(auth_user.role, Role::Sales);
    }

    #[tokio::test]
    async fn revoked_tokens_are_rejected() {
        let service = service().await;
        let token = service.issue_token(&sample_user()).unwrap();
        let claims = service.validate_token(&token).await.unwrap();

        service.revoke_token(&claims.jti).await.unwrap();
        let err = service.validate_token(&token).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn garbage_tokens_are_rejected() {
        let service = service().await;
        let err = service.validate_token("garbage").await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[test]
    fn reset_token_hashing_is_stable() {
        assert_eq!(hash_reset_token("abc"), hash_reset_token("abc"));
        assert_ne!(hash_reset_token("abc"), hash_reset_token("abd"));
    }
}
