//! Visit Check-in
//!
//! Each member carries one rotating QR credential. `current_code` is
//! read-through-rotate: callers never observe a stale code, and rotation
//! happens lazily on read rather than on a schedule. Staff scan the code
//! and pick an activity; `accept_visit` verifies the credential is live,
//! resolves the activity to its point value, and appends an `earn` entry
//! to the ledger.

use crate::auth::CurrentUser;
use crate::db::repository::{activity, member, transaction, visit_code};
use shared::models::{Member, TransactionKind, VisitActivity, VisitQrCode};
use sqlx::SqlitePool;

use super::{LoyaltyError, LoyaltyPolicy, LoyaltyResult, codes};

/// What a successful check-in produced, for the staff terminal to show.
#[derive(Debug, serde::Serialize)]
pub struct VisitAccepted {
    pub member: Member,
    pub activity: String,
    pub points_awarded: i64,
}

/// The member's live visit credential, rotating it first if the stored
/// one has aged past the rotation window (or none exists yet).
pub async fn current_code(
    pool: &SqlitePool,
    policy: &LoyaltyPolicy,
    member_id: i64,
    now: i64,
) -> LoyaltyResult<VisitQrCode> {
    if let Some(existing) = visit_code::find_by_member(pool, member_id).await?
        && existing.expires_at > now
    {
        return Ok(existing);
    }

    member::find_by_id(pool, member_id)
        .await?
        .ok_or_else(|| LoyaltyError::NotFound(format!("Member {member_id}")))?;

    let code = codes::visit_code();
    let fresh = visit_code::upsert(pool, member_id, &code, now, now + policy.visit_rotation_ms)
        .await?;
    tracing::debug!(member_id, "Visit code rotated");
    Ok(fresh)
}

/// Staff check-in: validate a scanned code, resolve the activity, and
/// credit the member's ledger.
pub async fn accept_visit(
    pool: &SqlitePool,
    policy: &LoyaltyPolicy,
    user: &CurrentUser,
    code: &str,
    activity_name: &str,
    now: i64,
) -> LoyaltyResult<VisitAccepted> {
    if !user.is_staff() {
        return Err(LoyaltyError::Unauthorized);
    }

    let scanned = code.trim();
    // Live means unexpired AND belonging to an active member.
    let qr = visit_code::find_live_by_code(pool, scanned, now)
        .await?
        .ok_or(LoyaltyError::InvalidOrExpiredCode)?;
    let member = member::find_by_id(pool, qr.member_id)
        .await?
        .ok_or_else(|| LoyaltyError::NotFound(format!("Member {}", qr.member_id)))?;

    let activity = activity::find_active_by_name(pool, activity_name)
        .await?
        .ok_or_else(|| LoyaltyError::UnknownActivity(activity_name.to_string()))?;

    if let Some(cap) = policy.max_credits_per_window {
        // Window is anchored at the current code's issue time, so a
        // rotation resets the count along with the credential.
        let credited = transaction::count_earn_since(pool, member.id, qr.issued_at).await?;
        if credited >= cap as i64 {
            return Err(LoyaltyError::VisitLimitReached);
        }
    }

    credit_visit(pool, member.id, &activity, now).await?;

    crate::security_log!(
        "INFO",
        "visit_accepted",
        staff_id = user.id.clone(),
        member_id = member.id,
        activity = activity.name.clone(),
        points = activity.points
    );

    Ok(VisitAccepted {
        member,
        activity: activity.name,
        points_awarded: activity.points,
    })
}

async fn credit_visit(
    pool: &SqlitePool,
    member_id: i64,
    activity: &VisitActivity,
    now: i64,
) -> LoyaltyResult<()> {
    transaction::insert(
        pool,
        member_id,
        TransactionKind::Earn,
        activity.points,
        &format!("Visit: {}", activity.name),
        now,
    )
    .await?;
    Ok(())
}
