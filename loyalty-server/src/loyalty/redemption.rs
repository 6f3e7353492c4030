//! Reward Redemption Engine
//!
//! Redeeming turns points into a time-boxed single-use coupon code;
//! acceptance resolves a staff-typed code tail to exactly one live coupon
//! and finalizes it. Redeeming is *not* idempotent — a repeated call
//! spends points again — so clients must disable their submit control
//! while a call is in flight.
//!
//! Expiry is implicit: no row is ever written to mark a redemption
//! expired. Every read site goes through [`effective_status`] instead of
//! trusting the stored column.

use crate::auth::CurrentUser;
use crate::db::repository::redemption::{self, RedeemOutcome};
use crate::db::repository::reward;
use shared::models::{RedemptionStatus, RewardRedemption};
use sqlx::SqlitePool;

use super::{LoyaltyError, LoyaltyPolicy, LoyaltyResult, codes};

/// How many times to re-mint on a (vanishingly unlikely) code collision.
const CODE_MINT_ATTEMPTS: usize = 3;

/// The true lifecycle state after accounting for time-based expiry.
pub fn effective_status(r: &RewardRedemption, now: i64) -> RedemptionStatus {
    match r.status {
        RedemptionStatus::Active if r.expires_at <= now => RedemptionStatus::Expired,
        other => other,
    }
}

/// Redeem a reward into a fresh `active` coupon.
///
/// Preconditions (re-asserted atomically at the persistence layer):
/// - reward exists and is active
/// - spendable balance covers `points_required`
/// - no effectively-active redemption of the same reward exists
///
/// On success exactly two rows were written in one transaction: the
/// `spend` ledger entry and the redemption. On any rejection, none.
pub async fn redeem(
    pool: &SqlitePool,
    policy: &LoyaltyPolicy,
    member_id: i64,
    reward_id: i64,
    now: i64,
) -> LoyaltyResult<RewardRedemption> {
    let reward = reward::find_by_id(pool, reward_id)
        .await?
        .ok_or_else(|| LoyaltyError::NotFound(format!("Reward {reward_id}")))?;
    if !reward.is_active {
        return Err(LoyaltyError::RewardUnavailable);
    }

    let expires_at = now + policy.redemption_ttl_ms;
    let description = format!("Redeemed: {}", reward.title);

    // UNIQUE(code) can reject a fresh mint; retry with a new code rather
    // than bubbling a 60-bit coincidence up to the member.
    let mut attempts = 0;
    loop {
        attempts += 1;
        let code = codes::redemption_code();
        let outcome = redemption::redeem_atomic(
            pool,
            member_id,
            reward_id,
            reward.points_required,
            &code,
            &description,
            now,
            expires_at,
        )
        .await;

        match outcome {
            Ok(RedeemOutcome::Created(created)) => {
                tracing::info!(
                    member_id,
                    reward_id,
                    redemption_id = created.id,
                    points = reward.points_required,
                    "Reward redeemed"
                );
                return Ok(created);
            }
            Ok(RedeemOutcome::InsufficientBalance { available }) => {
                return Err(LoyaltyError::InsufficientPoints {
                    required: reward.points_required,
                    available,
                });
            }
            Ok(RedeemOutcome::DuplicateActive) => {
                return Err(LoyaltyError::DuplicateActiveRedemption);
            }
            Err(crate::db::repository::RepoError::Duplicate(_))
                if attempts < CODE_MINT_ATTEMPTS =>
            {
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Staff acceptance: resolve a code suffix (3 characters minimum, longer
/// to break ties) to exactly one live redemption and transition it
/// `active → used`, exactly once.
pub async fn accept_by_fragment(
    pool: &SqlitePool,
    user: &CurrentUser,
    fragment: &str,
    now: i64,
) -> LoyaltyResult<RewardRedemption> {
    if !user.is_staff() {
        return Err(LoyaltyError::Unauthorized);
    }

    let Some(suffix) = codes::normalize_fragment(fragment) else {
        return Err(LoyaltyError::NotFound(format!(
            "No active redemption matches '{fragment}'"
        )));
    };

    let matches = redemption::find_active_by_suffix(pool, &suffix, now).await?;
    let candidate = match matches.len() {
        0 => {
            return Err(LoyaltyError::NotFound(format!(
                "No active redemption matches '{suffix}'"
            )));
        }
        1 => &matches[0],
        n => {
            // Deliberate policy: never pick one of several, make staff
            // retry with a longer suffix.
            return Err(LoyaltyError::AmbiguousFragment {
                fragment: suffix,
                matches: n,
            });
        }
    };

    let flipped = redemption::mark_used(pool, candidate.id, now).await?;

    // Derived read-back: confirm what the store actually holds.
    let stored = redemption::find_by_id(pool, candidate.id)
        .await?
        .ok_or(LoyaltyError::RedemptionUpdateFailed)?;

    if !flipped {
        // Lost the race between lookup and update.
        return match effective_status(&stored, now) {
            RedemptionStatus::Used => Err(LoyaltyError::AlreadyRedeemed),
            _ => Err(LoyaltyError::NotFound(format!(
                "No active redemption matches '{suffix}'"
            ))),
        };
    }

    if stored.status != RedemptionStatus::Used {
        return Err(LoyaltyError::RedemptionUpdateFailed);
    }

    tracing::info!(
        staff = %user.id,
        redemption_id = stored.id,
        member_id = stored.member_id,
        "Redemption accepted"
    );
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loyalty::testutil::{
        member_user, seed_earn, seed_member, seed_reward, staff_user, test_pool,
    };
    use crate::loyalty::{ledger, rank};

    const NOW: i64 = 1_750_000_000_000;

    fn policy() -> LoyaltyPolicy {
        LoyaltyPolicy::default()
    }

    #[tokio::test]
    async fn redeem_spends_points_and_mints_active_code() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let r = seed_reward(&pool, "Free Entry", 100).await;
        seed_earn(&pool, m, 250, NOW - 1000).await;

        let created = redeem(&pool, &policy(), m, r, NOW).await.unwrap();
        assert_eq!(created.status, RedemptionStatus::Active);
        assert_eq!(created.code.len(), codes::REDEMPTION_CODE_LEN);
        assert_eq!(created.expires_at, NOW + policy().redemption_ttl_ms);

        let s = ledger::summary(&pool, m).await.unwrap();
        assert_eq!(s.spendable, 150);
        // Rank still reads cumulative earned, untouched by the spend
        assert_eq!(s.earned_total, 250);
    }

    #[tokio::test]
    async fn unaffordable_redeem_leaves_no_partial_effect() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let r = seed_reward(&pool, "Bottle Service", 100).await;
        seed_earn(&pool, m, 50, NOW - 1000).await;

        let err = redeem(&pool, &policy(), m, r, NOW).await.unwrap_err();
        assert!(matches!(
            err,
            LoyaltyError::InsufficientPoints {
                required: 100,
                available: 50
            }
        ));

        // Ledger unchanged, nothing minted
        let s = ledger::summary(&pool, m).await.unwrap();
        assert_eq!(s.spendable, 50);
        let mine = crate::db::repository::redemption::find_by_member(&pool, m)
            .await
            .unwrap();
        assert!(mine.is_empty());
    }

    #[tokio::test]
    async fn duplicate_active_redemption_is_rejected() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let r = seed_reward(&pool, "Free Entry", 100).await;
        seed_earn(&pool, m, 1000, NOW - 1000).await;

        redeem(&pool, &policy(), m, r, NOW).await.unwrap();
        let err = redeem(&pool, &policy(), m, r, NOW + 1).await.unwrap_err();
        assert!(matches!(err, LoyaltyError::DuplicateActiveRedemption));

        // Only the first spend went through
        assert_eq!(ledger::summary(&pool, m).await.unwrap().spendable, 900);
    }

    #[tokio::test]
    async fn expired_redemption_does_not_block_a_new_one() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let r = seed_reward(&pool, "Free Entry", 100).await;
        seed_earn(&pool, m, 1000, NOW - 1000).await;

        let first = redeem(&pool, &policy(), m, r, NOW).await.unwrap();
        let after_expiry = first.expires_at + 1;

        // Stored status still says 'active', but effective status is expired
        assert_eq!(
            effective_status(&first, after_expiry),
            RedemptionStatus::Expired
        );
        redeem(&pool, &policy(), m, r, after_expiry).await.unwrap();
    }

    #[tokio::test]
    async fn inactive_or_missing_reward_is_unavailable() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        seed_earn(&pool, m, 1000, NOW - 1000).await;

        let r = seed_reward(&pool, "Retired", 100).await;
        crate::db::repository::reward::update(
            &pool,
            r,
            shared::models::RewardUpdate {
                title: None,
                points_required: None,
                image_url: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

        let err = redeem(&pool, &policy(), m, r, NOW).await.unwrap_err();
        assert!(matches!(err, LoyaltyError::RewardUnavailable));

        let err = redeem(&pool, &policy(), m, 99999, NOW).await.unwrap_err();
        assert!(matches!(err, LoyaltyError::NotFound(_)));
    }

    #[tokio::test]
    async fn accept_finalizes_exactly_once() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let r = seed_reward(&pool, "Free Entry", 100).await;
        seed_earn(&pool, m, 200, NOW - 1000).await;
        let created = redeem(&pool, &policy(), m, r, NOW).await.unwrap();

        let tail = &created.code[created.code.len() - 3..];
        let accepted = accept_by_fragment(&pool, &staff_user(), tail, NOW + 10)
            .await
            .unwrap();
        assert_eq!(accepted.id, created.id);
        assert_eq!(accepted.status, RedemptionStatus::Used);

        // Second acceptance must fail and must not revert the status
        let err = accept_by_fragment(&pool, &staff_user(), tail, NOW + 20)
            .await
            .unwrap_err();
        assert!(matches!(err, LoyaltyError::AlreadyRedeemed));
        let stored = redemption::find_by_id(&pool, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, RedemptionStatus::Used);
    }

    #[tokio::test]
    async fn members_cannot_accept_codes() {
        let pool = test_pool().await;
        let err = accept_by_fragment(&pool, &member_user(7), "ABC", NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, LoyaltyError::Unauthorized));
    }

    #[tokio::test]
    async fn unknown_fragment_is_not_found() {
        let pool = test_pool().await;
        let err = accept_by_fragment(&pool, &staff_user(), "ZZZ", NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, LoyaltyError::NotFound(_)));
    }

    #[tokio::test]
    async fn malformed_fragment_is_rejected_without_matching() {
        let pool = test_pool().await;
        // Too short, longer than a full code, or non-alphanumeric
        for frag in ["", "ab", "ABCDEFGHJKMNP", "a%c"] {
            let err = accept_by_fragment(&pool, &staff_user(), frag, NOW)
                .await
                .unwrap_err();
            assert!(matches!(err, LoyaltyError::NotFound(_)), "frag={frag:?}");
        }
    }

    #[tokio::test]
    async fn ambiguous_fragment_mutates_nothing() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let r1 = seed_reward(&pool, "Entry", 10).await;
        let r2 = seed_reward(&pool, "Drink", 10).await;
        seed_earn(&pool, m, 100, NOW - 1000).await;

        // Force two active codes with the same tail
        let a = redeem(&pool, &policy(), m, r1, NOW).await.unwrap();
        let b = redeem(&pool, &policy(), m, r2, NOW).await.unwrap();
        for red in [&a, &b] {
            sqlx::query("UPDATE reward_redemption SET code = ? WHERE id = ?")
                .bind(format!("{}ABC", &red.code[..9]))
                .bind(red.id)
                .execute(&pool)
                .await
                .unwrap();
        }

        let err = accept_by_fragment(&pool, &staff_user(), "abc", NOW + 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LoyaltyError::AmbiguousFragment { matches: 2, .. }
        ));

        // Neither code was touched
        for red in [&a, &b] {
            let stored = redemption::find_by_id(&pool, red.id).await.unwrap().unwrap();
            assert_eq!(stored.status, RedemptionStatus::Active);
        }
    }

    #[tokio::test]
    async fn longer_suffix_resolves_an_ambiguous_tail() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let r1 = seed_reward(&pool, "Entry", 10).await;
        let r2 = seed_reward(&pool, "Drink", 10).await;
        seed_earn(&pool, m, 100, NOW - 1000).await;

        // Two live codes colliding on the last 3 characters but not the last 4
        let a = redeem(&pool, &policy(), m, r1, NOW).await.unwrap();
        let b = redeem(&pool, &policy(), m, r2, NOW).await.unwrap();
        for (red, code) in [(&a, "AAAAAAAAXABC"), (&b, "BBBBBBBBYABC")] {
            sqlx::query("UPDATE reward_redemption SET code = ? WHERE id = ?")
                .bind(code)
                .bind(red.id)
                .execute(&pool)
                .await
                .unwrap();
        }

        let err = accept_by_fragment(&pool, &staff_user(), "ABC", NOW + 10)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LoyaltyError::AmbiguousFragment { matches: 2, .. }
        ));

        // One extra character singles out the first code
        let accepted = accept_by_fragment(&pool, &staff_user(), "xabc", NOW + 10)
            .await
            .unwrap();
        assert_eq!(accepted.id, a.id);
        assert_eq!(accepted.status, RedemptionStatus::Used);

        // The other stays live and is now reachable by the short tail again
        let other = redemption::find_by_id(&pool, b.id).await.unwrap().unwrap();
        assert_eq!(other.status, RedemptionStatus::Active);
        let second = accept_by_fragment(&pool, &staff_user(), "ABC", NOW + 20)
            .await
            .unwrap();
        assert_eq!(second.id, b.id);
    }

    #[tokio::test]
    async fn expired_codes_are_invisible_to_lookup() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let r = seed_reward(&pool, "Entry", 10).await;
        seed_earn(&pool, m, 100, NOW - 1000).await;
        let created = redeem(&pool, &policy(), m, r, NOW).await.unwrap();

        let tail = &created.code[created.code.len() - 3..];
        let err = accept_by_fragment(&pool, &staff_user(), tail, created.expires_at + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, LoyaltyError::NotFound(_)));
    }

    #[tokio::test]
    async fn rank_survives_spending_everything() {
        let pool = test_pool().await;
        let m = seed_member(&pool, "Alice").await;
        let r = seed_reward(&pool, "Big Ticket", 1000).await;
        seed_earn(&pool, m, 1000, NOW - 1000).await;

        redeem(&pool, &policy(), m, r, NOW).await.unwrap();
        let s = ledger::summary(&pool, m).await.unwrap();
        assert_eq!(s.spendable, 0);
        assert_eq!(rank::rank_for(s.earned_total).name, "Trendsetter");
    }
}
