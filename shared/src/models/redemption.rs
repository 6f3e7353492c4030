//! Reward Redemption Model
//!
//! The central stateful entity of the loyalty engine. A redemption is
//! minted `active`, is finalized `active → used` exactly once by staff,
//! and expires implicitly by time comparison — the stored status may still
//! read `active` after `expires_at` has passed, so readers must go through
//! an effective-status computation rather than trusting the raw column.

use serde::{Deserialize, Serialize};

/// Stored redemption lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum RedemptionStatus {
    Active,
    Used,
    Expired,
}

/// A redeemed reward, carrying the single-use coupon code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RewardRedemption {
    pub id: i64,
    pub member_id: i64,
    pub reward_id: i64,
    pub code: String,
    pub status: RedemptionStatus,
    pub created_at: i64,
    pub expires_at: i64,
}

/// Redemption joined with its reward title (member-facing list views).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RedemptionDetail {
    pub id: i64,
    pub member_id: i64,
    pub reward_id: i64,
    pub reward_title: String,
    pub code: String,
    pub status: RedemptionStatus,
    pub created_at: i64,
    pub expires_at: i64,
}
