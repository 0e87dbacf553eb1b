//! Authentication service
//!
//! Signup stores an Argon2id digest, login issues an HS256 JWT and verify
//! turns a bearer token back into a user id.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::server::{MAX_TOKEN_TTL_SECS, MIN_JWT_SECRET_LEN};
use crate::config::{AuthConfig, ConfigError};
use crate::db::repositories::UserRepository;
use crate::db::{DatabaseConnection, DatabaseError};
use crate::db::models::User;
use crate::error::{GatewayError, Result};

/// Issuer embedded in and required from every token
pub const TOKEN_ISSUER: &str = "llm-arena-gateway";

/// Well-formed Argon2id digest that no password matches. Checked on logins
/// for unknown usernames so they cost the same as a wrong password.
const UNKNOWN_USER_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// JWT claim set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// A signed token and its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT token management
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, ttl: Duration) -> Result<Self> {
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(GatewayError::Config(ConfigError::invalid(format!(
                "JWT secret must be at least {} characters",
                MIN_JWT_SECRET_LEN
            ))));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Create a JWT manager from auth configuration
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let ttl = Some(config.token_ttl_secs)
            .filter(|secs| *secs <= MAX_TOKEN_TTL_SECS)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(Duration::try_seconds)
            .ok_or_else(|| {
                GatewayError::Config(ConfigError::invalid(format!(
                    "auth.token_ttl_secs must be at most {}",
                    MAX_TOKEN_TTL_SECS
                )))
            })?;
        Self::new(&config.jwt_secret, ttl)
    }

    /// Generate a token for a user id
    pub fn generate_token(&self, user_id: &str) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| GatewayError::internal("token expiry is out of range"))?;
        let claims = Claims {
            sub: user_id.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| GatewayError::internal(format!("failed to sign token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                GatewayError::unauthorized(match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => "token expired",
                    jsonwebtoken::errors::ErrorKind::InvalidIssuer => "token issuer mismatch",
                    _ => "invalid token",
                })
            })
    }
}

/// Hash a password on the blocking pool
pub async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| GatewayError::internal(format!("password hashing failed: {}", e)))
    })
    .await
    .map_err(|e| GatewayError::internal(format!("hashing task failed: {}", e)))?
}

/// Check a password against a stored PHC digest on the blocking pool
pub async fn verify_password(digest: String, password: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&digest)
            .map_err(|e| GatewayError::internal(format!("stored digest is malformed: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| GatewayError::internal(format!("verification task failed: {}", e)))?
}

/// Auth service: credential store plus token issuing
pub struct AuthService {
    db: DatabaseConnection,
    jwt: JwtManager,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, jwt: JwtManager) -> Self {
        Self { db, jwt }
    }

    /// Register a new user
    pub async fn signup(&self, username: &str, password: &str) -> Result<User> {
        let pool = self.db.pool();

        if UserRepository::find_by_username(pool, username).await?.is_some() {
            return Err(GatewayError::DuplicateUser(username.to_string()));
        }

        let digest = hash_password(password.to_string()).await?;
        let user = User::new(username, digest);

        match UserRepository::insert(pool, &user).await {
            Ok(_) => {}
            // lost a race against a concurrent signup
            Err(DatabaseError::ConstraintViolation(_)) => {
                return Err(GatewayError::DuplicateUser(username.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        info!(user_id = %user.id, username = %user.username, "User signed up");
        Ok(user)
    }

    /// Exchange credentials for a token
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken> {
        let user = match UserRepository::find_by_username(self.db.pool(), username).await? {
            Some(user) => user,
            None => {
                verify_password(UNKNOWN_USER_DIGEST.to_string(), password.to_string()).await?;
                warn!(username = %username, "Login for unknown user");
                return Err(GatewayError::InvalidCredentials);
            }
        };

        if !verify_password(user.password_digest.clone(), password.to_string()).await? {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(GatewayError::InvalidCredentials);
        }

        let issued = self.jwt.generate_token(&user.id)?;
        info!(user_id = %user.id, expires_at = %issued.expires_at, "Issued token");
        Ok(issued)
    }

    /// Resolve a token to the user id it was issued for
    pub async fn verify(&self, token: &str) -> Result<String> {
        Ok(self.jwt.validate_token(token)?.sub)
    }
}
