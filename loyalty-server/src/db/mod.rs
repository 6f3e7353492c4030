//! Database Layer
//!
//! Embedded SQLite via sqlx. The schema is applied idempotently at startup;
//! uniqueness and check constraints here are the authoritative enforcement
//! of the loyalty invariants (unique redemption codes, one rotating visit
//! code per member, append-only positive-amount ledger rows).

pub mod repository;

use repository::{RepoError, RepoResult};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Open (creating if missing) the database file and apply the schema.
pub async fn connect(path: &str) -> RepoResult<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// In-memory pool for tests. Capped at one connection so every query sees
/// the same memory database.
pub async fn connect_memory() -> RepoResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    init_schema(&pool).await?;
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS staff (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'staff' CHECK (role IN ('staff', 'admin')),
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at INTEGER NOT NULL DEFAULT 0,
        updated_at INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS member (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        phone TEXT,
        email TEXT,
        card_number TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at INTEGER NOT NULL DEFAULT 0,
        updated_at INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS points_transaction (
        id INTEGER PRIMARY KEY,
        member_id INTEGER NOT NULL REFERENCES member(id),
        kind TEXT NOT NULL CHECK (kind IN ('earn', 'spend')),
        amount INTEGER NOT NULL CHECK (amount > 0),
        description TEXT NOT NULL DEFAULT '',
        created_at INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE INDEX IF NOT EXISTS idx_points_transaction_member
        ON points_transaction (member_id, created_at DESC)",
    "CREATE TABLE IF NOT EXISTS reward (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        points_required INTEGER NOT NULL CHECK (points_required > 0),
        image_url TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at INTEGER NOT NULL DEFAULT 0,
        updated_at INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS reward_redemption (
        id INTEGER PRIMARY KEY,
        member_id INTEGER NOT NULL REFERENCES member(id),
        reward_id INTEGER NOT NULL REFERENCES reward(id),
        code TEXT NOT NULL UNIQUE,
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'used', 'expired')),
        created_at INTEGER NOT NULL DEFAULT 0,
        expires_at INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE INDEX IF NOT EXISTS idx_reward_redemption_member
        ON reward_redemption (member_id, status)",
    "CREATE TABLE IF NOT EXISTS visit_qr_code (
        id INTEGER PRIMARY KEY,
        member_id INTEGER NOT NULL UNIQUE REFERENCES member(id),
        code TEXT NOT NULL UNIQUE,
        issued_at INTEGER NOT NULL DEFAULT 0,
        expires_at INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS visit_activity (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        points INTEGER NOT NULL CHECK (points > 0),
        is_active INTEGER NOT NULL DEFAULT 1
    )",
    "CREATE TABLE IF NOT EXISTS review (
        id INTEGER PRIMARY KEY,
        member_id INTEGER NOT NULL REFERENCES member(id),
        mood INTEGER NOT NULL CHECK (mood BETWEEN 1 AND 5),
        comment TEXT,
        created_at INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE INDEX IF NOT EXISTS idx_review_member
        ON review (member_id, created_at DESC)",
];

/// Apply the schema. Every statement is idempotent.
pub async fn init_schema(pool: &SqlitePool) -> RepoResult<()> {
    for stmt in SCHEMA {
        sqlx::query(stmt).execute(pool).await?;
    }
    Ok(())
}

/// Create the default admin account on first boot.
///
/// Password comes from `ADMIN_PASSWORD`; without it no account is created
/// and the operator must provision staff out of band.
pub async fn ensure_default_admin(pool: &SqlitePool) -> RepoResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let Ok(password) = std::env::var("ADMIN_PASSWORD") else {
        tracing::warn!("No staff accounts exist and ADMIN_PASSWORD is not set; skipping bootstrap");
        return Ok(());
    };

    let hash = crate::auth::hash_password(&password)
        .map_err(|e| RepoError::Database(format!("Failed to hash admin password: {e}")))?;
    repository::staff::create(pool, "admin", "Administrator", &hash, shared::StaffRole::Admin)
        .await?;
    tracing::info!("Bootstrapped default admin account 'admin'");
    Ok(())
}
