//! Points Ledger Reader
//!
//! Side-effect-free reads over the append-only transaction history. The
//! two aggregates are deliberately separate and must never be mixed:
//! a member who spends their whole balance keeps their rank.

use crate::db::repository::transaction;
use shared::models::{PointsSummary, PointsTransaction};
use sqlx::SqlitePool;

use super::LoyaltyResult;

/// Ordered history, newest first.
pub async fn history(pool: &SqlitePool, member_id: i64) -> LoyaltyResult<Vec<PointsTransaction>> {
    Ok(transaction::find_by_member(pool, member_id).await?)
}

/// Cumulative earned (rank) and spendable (affordability) in one call.
pub async fn summary(pool: &SqlitePool, member_id: i64) -> LoyaltyResult<PointsSummary> {
    Ok(transaction::summarize(pool, member_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::transaction::insert;
    use crate::loyalty::testutil::{seed_member, test_pool};
    use shared::models::TransactionKind;

    #[tokio::test]
    async fn empty_ledger_is_all_zeroes() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let s = summary(&pool, m).await.unwrap();
        assert_eq!(s.earned_total, 0);
        assert_eq!(s.spendable, 0);
        assert!(history(&pool, m).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn spending_reduces_spendable_but_not_earned() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        insert(&pool, m, TransactionKind::Earn, 500, "visit", 1_000)
            .await
            .unwrap();
        insert(&pool, m, TransactionKind::Earn, 700, "visit", 2_000)
            .await
            .unwrap();
        insert(&pool, m, TransactionKind::Spend, 1_000, "reward", 3_000)
            .await
            .unwrap();

        let s = summary(&pool, m).await.unwrap();
        assert_eq!(s.earned_total, 1_200);
        assert_eq!(s.spendable, 200);
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        insert(&pool, m, TransactionKind::Earn, 10, "first", 1_000)
            .await
            .unwrap();
        insert(&pool, m, TransactionKind::Earn, 20, "second", 2_000)
            .await
            .unwrap();

        let h = history(&pool, m).await.unwrap();
        assert_eq!(h.len(), 2);
        assert_eq!(h[0].description, "second");
        assert_eq!(h[1].description, "first");
    }

    #[tokio::test]
    async fn ledgers_are_per_member() {
        let pool = test_pool().await;
        let a = seed_member(&pool, "Alice").await;
        let b = seed_member(&pool, "Bob").await;
        insert(&pool, a, TransactionKind::Earn, 100, "visit", 1_000)
            .await
            .unwrap();

        assert_eq!(summary(&pool, a).await.unwrap().earned_total, 100);
        assert_eq!(summary(&pool, b).await.unwrap().earned_total, 0);
    }
}
