//! Reward Catalog Model

use serde::{Deserialize, Serialize};

/// Catalog entry members can exchange points for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reward {
    pub id: i64,
    pub title: String,
    pub points_required: i64,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create reward payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardCreate {
    pub title: String,
    pub points_required: i64,
    pub image_url: Option<String>,
}

/// Update reward payload (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardUpdate {
    pub title: Option<String>,
    pub points_required: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}
