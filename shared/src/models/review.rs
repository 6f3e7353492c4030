//! Mood Review Model

use serde::{Deserialize, Serialize};

/// Feedback record. Mood is a 1..=5 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Review {
    pub id: i64,
    pub member_id: i64,
    pub mood: i64,
    pub comment: Option<String>,
    pub created_at: i64,
}

/// Submit review payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmit {
    pub mood: i64,
    pub comment: Option<String>,
}
