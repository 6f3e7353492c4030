use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::loyalty::LoyaltyPolicy;
use crate::utils::AppError;

/// Shared server state, cloned into every handler.
///
/// `Clone` is shallow: the pool is internally reference-counted and the
/// JWT service sits behind an `Arc`.
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Open the database, apply the schema, bootstrap the default admin
    /// and build the JWT service.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let pool = crate::db::connect(&config.database_path).await?;
        crate::db::ensure_default_admin(&pool).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self {
            config: config.clone(),
            pool,
            jwt_service,
        })
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn policy(&self) -> &LoyaltyPolicy {
        &self.config.policy
    }
}
