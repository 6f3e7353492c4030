//! Test fixtures for the loyalty engine.

use crate::auth::CurrentUser;
use crate::db;
use crate::db::repository::{activity, member, reward, transaction};
use shared::models::{MemberCreate, RewardCreate, TransactionKind, VisitActivityCreate};
use sqlx::SqlitePool;

/// In-memory pool with schema applied.
pub async fn test_pool() -> SqlitePool {
    db::connect_memory().await.unwrap()
}

pub async fn seed_member(pool: &SqlitePool, name: &str) -> i64 {
    member::create(
        pool,
        MemberCreate {
            name: name.to_string(),
            phone: None,
            email: None,
            card_number: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_reward(pool: &SqlitePool, title: &str, cost: i64) -> i64 {
    reward::create(
        pool,
        RewardCreate {
            title: title.to_string(),
            points_required: cost,
            image_url: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_activity(pool: &SqlitePool, name: &str, points: i64) -> i64 {
    activity::create(
        pool,
        VisitActivityCreate {
            name: name.to_string(),
            points,
        },
    )
    .await
    .unwrap()
    .id
}

pub async fn seed_earn(pool: &SqlitePool, member_id: i64, amount: i64, at: i64) {
    transaction::insert(pool, member_id, TransactionKind::Earn, amount, "seed", at)
        .await
        .unwrap();
}

pub fn staff_user() -> CurrentUser {
    CurrentUser {
        id: "42".to_string(),
        name: "Door Staff".to_string(),
        role: "staff".to_string(),
    }
}

pub fn member_user(member_id: i64) -> CurrentUser {
    CurrentUser {
        id: member_id.to_string(),
        name: "Member".to_string(),
        role: "member".to_string(),
    }
}
