//! Reward Redemption Repository
//!
//! Holds the two writes with real concurrency semantics: the atomic
//! redeem (spend + mint in one transaction, re-checking balance and the
//! duplicate-active guard inside it) and the guarded `active → used`
//! transition. Application-level pre-checks are optimistic filters only;
//! what happens here is authoritative.

use super::RepoResult;
use shared::models::{RedemptionDetail, RedemptionStatus, RewardRedemption};
use sqlx::SqlitePool;

const REDEMPTION_SELECT: &str =
    "SELECT id, member_id, reward_id, code, status, created_at, expires_at FROM reward_redemption";

/// Outcome of the atomic redeem transaction.
#[derive(Debug)]
pub enum RedeemOutcome {
    Created(RewardRedemption),
    /// Spendable balance below the reward cost at commit time.
    InsufficientBalance { available: i64 },
    /// An effectively-active redemption of the same reward already exists.
    DuplicateActive,
}

/// Spend points and mint a redemption in one SQL transaction.
///
/// Both preconditions are re-asserted against the store inside the
/// transaction, so concurrent redeems from multiple devices cannot
/// double-spend past the balance or create two live codes for the same
/// reward. Dropping the transaction on an early return rolls everything
/// back; an unaffordable or duplicate redeem leaves no partial rows.
pub async fn redeem_atomic(
    pool: &SqlitePool,
    member_id: i64,
    reward_id: i64,
    points_required: i64,
    code: &str,
    description: &str,
    now: i64,
    expires_at: i64,
) -> RepoResult<RedeemOutcome> {
    let mut tx = pool.begin().await?;

    let available: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(CASE WHEN kind = 'earn' THEN amount ELSE -amount END), 0)
         FROM points_transaction WHERE member_id = ?",
    )
    .bind(member_id)
    .fetch_one(&mut *tx)
    .await?;

    if available < points_required {
        return Ok(RedeemOutcome::InsufficientBalance { available });
    }

    // Effective-status guard: stored 'active' rows past expires_at do not count.
    let duplicates: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reward_redemption
         WHERE member_id = ?1 AND reward_id = ?2 AND status = 'active' AND expires_at > ?3",
    )
    .bind(member_id)
    .bind(reward_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    if duplicates > 0 {
        return Ok(RedeemOutcome::DuplicateActive);
    }

    let spend_id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO points_transaction (id, member_id, kind, amount, description, created_at) VALUES (?1, ?2, 'spend', ?3, ?4, ?5)",
    )
    .bind(spend_id)
    .bind(member_id)
    .bind(points_required)
    .bind(description)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let redemption_id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO reward_redemption (id, member_id, reward_id, code, status, created_at, expires_at) VALUES (?1, ?2, ?3, ?4, 'active', ?5, ?6)",
    )
    .bind(redemption_id)
    .bind(member_id)
    .bind(reward_id)
    .bind(code)
    .bind(now)
    .bind(expires_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let created = RewardRedemption {
        id: redemption_id,
        member_id,
        reward_id,
        code: code.to_string(),
        status: RedemptionStatus::Active,
        created_at: now,
        expires_at,
    };
    Ok(RedeemOutcome::Created(created))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<RewardRedemption>> {
    let sql = format!("{REDEMPTION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, RewardRedemption>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Member's redemptions joined with reward titles, newest first.
pub async fn find_by_member(pool: &SqlitePool, member_id: i64) -> RepoResult<Vec<RedemptionDetail>> {
    let rows = sqlx::query_as::<_, RedemptionDetail>(
        "SELECT rr.id, rr.member_id, rr.reward_id, rw.title as reward_title, rr.code, rr.status, rr.created_at, rr.expires_at
         FROM reward_redemption rr JOIN reward rw ON rr.reward_id = rw.id
         WHERE rr.member_id = ? ORDER BY rr.created_at DESC",
    )
    .bind(member_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All effectively-active redemptions whose code ends with `suffix`.
///
/// Codes are uppercase alphanumeric with no LIKE wildcards, so the suffix
/// can be concatenated into the pattern directly. Caller normalizes and
/// validates the fragment first.
pub async fn find_active_by_suffix(
    pool: &SqlitePool,
    suffix: &str,
    now: i64,
) -> RepoResult<Vec<RewardRedemption>> {
    let sql = format!(
        "{REDEMPTION_SELECT} WHERE status = 'active' AND expires_at > ?1 AND code LIKE '%' || ?2"
    );
    let rows = sqlx::query_as::<_, RewardRedemption>(&sql)
        .bind(now)
        .bind(suffix)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Guarded `active → used` transition. Returns true iff this call flipped
/// the row; a row already used, already expired-by-time, or missing
/// affects nothing.
pub async fn mark_used(pool: &SqlitePool, id: i64, now: i64) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE reward_redemption SET status = 'used' WHERE id = ? AND status = 'active' AND expires_at > ?",
    )
    .bind(id)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
