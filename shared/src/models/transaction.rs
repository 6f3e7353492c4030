//! Points Transaction Model
//!
//! The ledger is append-only: rows are inserted by visit crediting and
//! redemption debiting, never mutated or deleted.

use serde::{Deserialize, Serialize};

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum TransactionKind {
    Earn,
    Spend,
}

/// A single immutable ledger entry. `amount` is always positive; the
/// direction lives in `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PointsTransaction {
    pub id: i64,
    pub member_id: i64,
    pub kind: TransactionKind,
    pub amount: i64,
    pub description: String,
    pub created_at: i64,
}

/// The two ledger aggregates. They are deliberately kept apart:
/// `earned_total` (earn rows only) drives rank and never decreases;
/// `spendable` (earn minus spend) drives affordability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsSummary {
    pub earned_total: i64,
    pub spendable: i64,
}
