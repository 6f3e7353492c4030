use crate::auth::JwtConfig;
use crate::loyalty::LoyaltyPolicy;

/// Server configuration, loaded from environment variables.
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | loyalty.db | SQLite database file |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_SECRET | (generated in debug) | token signing secret, >= 32 chars |
/// | JWT_STAFF_EXPIRATION_MINUTES | 720 | staff session lifetime |
/// | JWT_MEMBER_EXPIRATION_MINUTES | 525600 | member token lifetime |
/// | REDEMPTION_TTL_DAYS | 30 | redemption code validity |
/// | VISIT_ROTATION_HOURS | 24 | visit QR rotation interval |
/// | REVIEW_WINDOW_HOURS | 24 | review eligibility window |
/// | MAX_VISIT_CREDITS_PER_WINDOW | (unset = unlimited) | visit credits per code window |
///
/// ```ignore
/// DATABASE_PATH=/data/loyalty.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub policy: LoyaltyPolicy,
}

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

impl Config {
    /// Load from environment variables, using defaults where unset.
    /// Fails only when `JWT_SECRET` is present but unusable (or absent in
    /// a release build).
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = LoyaltyPolicy::default();
        let policy = LoyaltyPolicy {
            redemption_ttl_ms: env_parse("REDEMPTION_TTL_DAYS")
                .map(|d: i64| d * DAY_MS)
                .unwrap_or(defaults.redemption_ttl_ms),
            visit_rotation_ms: env_parse("VISIT_ROTATION_HOURS")
                .map(|h: i64| h * HOUR_MS)
                .unwrap_or(defaults.visit_rotation_ms),
            review_window_ms: env_parse("REVIEW_WINDOW_HOURS")
                .map(|h: i64| h * HOUR_MS)
                .unwrap_or(defaults.review_window_ms),
            max_credits_per_window: env_parse("MAX_VISIT_CREDITS_PER_WINDOW"),
        };

        Ok(Self {
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "loyalty.db".into()),
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::from_env()?,
            policy,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
