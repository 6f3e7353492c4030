//! Review Eligibility Gate
//!
//! A member may post one review per recent visit: there must be ledger
//! activity (any kind) inside the rolling window, and no review inside
//! it. Both windows slide with `now`, so eligibility can flip in either
//! direction with no write in between: a visit ages out, or an old
//! review does.
//!
//! `submit` re-checks the gate itself; the read-only `eligibility` call is
//! for UI display and is not a reservation.

use crate::db::repository::{review, transaction};
use serde::Serialize;
use shared::models::Review;
use sqlx::SqlitePool;

use super::{LoyaltyError, LoyaltyPolicy, LoyaltyResult};

/// Why the gate is closed, machine-readable for the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IneligibleReason {
    NoRecentVisit,
    AlreadyReviewed,
}

#[derive(Debug, Serialize)]
pub struct ReviewEligibility {
    pub can_submit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<IneligibleReason>,
}

impl ReviewEligibility {
    fn open() -> Self {
        Self {
            can_submit: true,
            reason: None,
        }
    }

    fn closed(reason: IneligibleReason) -> Self {
        Self {
            can_submit: false,
            reason: Some(reason),
        }
    }
}

/// Evaluate the gate at `now`. Visit recency is checked first, so a member
/// with neither a visit nor a review sees `NoRecentVisit`.
pub async fn eligibility(
    pool: &SqlitePool,
    policy: &LoyaltyPolicy,
    member_id: i64,
    now: i64,
) -> LoyaltyResult<ReviewEligibility> {
    let since = now - policy.review_window_ms;

    // Any ledger row counts as presence, spends included: a member who
    // only redeemed tonight was still here tonight.
    let visits = transaction::count_since(pool, member_id, since).await?;
    if visits == 0 {
        return Ok(ReviewEligibility::closed(IneligibleReason::NoRecentVisit));
    }

    let reviews = review::count_since(pool, member_id, since).await?;
    if reviews > 0 {
        return Ok(ReviewEligibility::closed(IneligibleReason::AlreadyReviewed));
    }

    Ok(ReviewEligibility::open())
}

/// Validate and store a review, enforcing the gate at write time.
pub async fn submit(
    pool: &SqlitePool,
    policy: &LoyaltyPolicy,
    member_id: i64,
    mood: i64,
    comment: Option<&str>,
    now: i64,
) -> LoyaltyResult<Review> {
    if !(1..=5).contains(&mood) {
        return Err(LoyaltyError::InvalidMood(mood));
    }

    match eligibility(pool, policy, member_id, now).await?.reason {
        Some(IneligibleReason::NoRecentVisit) => return Err(LoyaltyError::NoRecentVisit),
        Some(IneligibleReason::AlreadyReviewed) => return Err(LoyaltyError::AlreadyReviewed),
        None => {}
    }

    let comment = comment.map(str::trim).filter(|c| !c.is_empty());
    let stored = review::insert(pool, member_id, mood, comment, now).await?;
    tracing::info!(member_id, mood, "Review submitted");
    Ok(stored)
}

/// Member's own reviews, newest first.
pub async fn history(pool: &SqlitePool, member_id: i64) -> LoyaltyResult<Vec<Review>> {
    Ok(review::find_by_member(pool, member_id).await?)
}
