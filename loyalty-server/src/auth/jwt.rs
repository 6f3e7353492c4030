//! JWT Token Service
//!
//! Token generation, validation and parsing.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Staff token lifetime in minutes
    pub staff_expiration_minutes: i64,
    /// Member token lifetime in minutes (long-lived, the app stores it)
    pub member_expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, JwtError> {
        Ok(Self {
            secret: load_jwt_secret()?,
            staff_expiration_minutes: env_i64("JWT_STAFF_EXPIRATION_MINUTES", 12 * 60),
            member_expiration_minutes: env_i64("JWT_MEMBER_EXPIRATION_MINUTES", 365 * 24 * 60),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "loyalty-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "loyalty-clients".to_string()),
        })
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Load the signing secret from `JWT_SECRET`. In debug builds a missing
/// secret gets a generated one so development works out of the box; release
/// builds refuse to start without it.
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) => {
            if secret.len() < 32 {
                return Err(JwtError::ConfigError(
                    "JWT_SECRET must be at least 32 characters long".to_string(),
                ));
            }
            Ok(secret)
        }
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("JWT_SECRET not set; generating a temporary development key");
                generate_secret()
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "JWT_SECRET environment variable must be set in production".to_string(),
                ))
            }
        }
    }
}

const SECRET_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// 64 printable characters from the system CSPRNG.
pub fn generate_secret() -> Result<String, JwtError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 64];
    rng.fill(&mut bytes)
        .map_err(|_| JwtError::KeyGenerationFailed("system RNG unavailable".to_string()))?;
    Ok(bytes
        .iter()
        .map(|b| SECRET_ALPHABET[(*b as usize) % SECRET_ALPHABET.len()] as char)
        .collect())
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: staff id or member id
    pub sub: String,
    /// Display name
    pub name: String,
    /// "member" | "staff" | "admin"
    pub role: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Short-lived session token for staff terminals.
    pub fn generate_staff_token(
        &self,
        staff_id: i64,
        display_name: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        self.generate(
            &staff_id.to_string(),
            display_name,
            role,
            self.config.staff_expiration_minutes,
        )
    }

    /// Long-lived token handed to the member app at sign-up.
    pub fn generate_member_token(
        &self,
        member_id: i64,
        member_name: &str,
    ) -> Result<String, JwtError> {
        self.generate(
            &member_id.to_string(),
            member_name,
            "member",
            self.config.member_expiration_minutes,
        )
    }

    fn generate(
        &self,
        sub: &str,
        name: &str,
        role: &str,
        expiration_minutes: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(expiration_minutes);

        let claims = Claims {
            sub: sub.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            token_type: "access".to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an Authorization header value.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Current user context, parsed from JWT claims.
///
/// Created by the auth middleware and injected into request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Staff id or member id, as the token's subject string
    pub id: String,
    pub name: String,
    /// "member" | "staff" | "admin"
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Staff-level access: admins count as staff everywhere.
    pub fn is_staff(&self) -> bool {
        self.role == "staff" || self.role == "admin"
    }

    /// The member row id, when this session belongs to a member.
    pub fn member_id(&self) -> Option<i64> {
        if self.role == "member" {
            self.id.parse().ok()
        } else {
            None
        }
    }

    /// Members may read their own data; staff may read anyone's.
    pub fn can_access_member(&self, member_id: i64) -> bool {
        self.is_staff() || self.member_id() == Some(member_id)
    }
}
