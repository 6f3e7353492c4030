//! Visit QR Code Repository
//!
//! One rotating credential row per member (UNIQUE on member_id); rotation
//! replaces the row in place via upsert.

use super::{RepoError, RepoResult};
use shared::models::VisitQrCode;
use sqlx::SqlitePool;

const VISIT_CODE_SELECT: &str =
    "SELECT id, member_id, code, issued_at, expires_at FROM visit_qr_code";

pub async fn find_by_member(pool: &SqlitePool, member_id: i64) -> RepoResult<Option<VisitQrCode>> {
    let sql = format!("{VISIT_CODE_SELECT} WHERE member_id = ?");
    let row = sqlx::query_as::<_, VisitQrCode>(&sql)
        .bind(member_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Look up a presented code, accepting it only while unexpired and only
/// for an active member.
pub async fn find_live_by_code(
    pool: &SqlitePool,
    code: &str,
    now: i64,
) -> RepoResult<Option<VisitQrCode>> {
    let row = sqlx::query_as::<_, VisitQrCode>(
        "SELECT v.id, v.member_id, v.code, v.issued_at, v.expires_at
         FROM visit_qr_code v JOIN member m ON v.member_id = m.id
         WHERE v.code = ?1 AND v.expires_at > ?2 AND m.is_active = 1",
    )
    .bind(code)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert or rotate the member's credential.
pub async fn upsert(
    pool: &SqlitePool,
    member_id: i64,
    code: &str,
    issued_at: i64,
    expires_at: i64,
) -> RepoResult<VisitQrCode> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO visit_qr_code (id, member_id, code, issued_at, expires_at) VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (member_id) DO UPDATE SET code = excluded.code, issued_at = excluded.issued_at, expires_at = excluded.expires_at",
    )
    .bind(id)
    .bind(member_id)
    .bind(code)
    .bind(issued_at)
    .bind(expires_at)
    .execute(pool)
    .await?;

    find_by_member(pool, member_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to upsert visit code".into()))
}
