//! Loyalty Engine
//!
//! Business rules over the repositories:
//!
//! - [`ledger`] - transaction history and the two point aggregates
//! - [`rank`] - static tier table and rank math (pure)
//! - [`codes`] - coupon/visit code generation and fragment handling (pure)
//! - [`redemption`] - reward redemption lifecycle + staff fragment lookup
//! - [`visits`] - rotating visit credential and staff visit crediting
//! - [`reviews`] - rolling-window review eligibility gate
//!
//! Engine functions take `now` as an explicit `i64` millis argument;
//! handlers pass `shared::util::now_millis()`. Time-window behavior is
//! tested without touching the clock.

pub mod codes;
pub mod error;
pub mod ledger;
pub mod rank;
pub mod redemption;
pub mod reviews;
pub mod visits;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{LoyaltyError, LoyaltyResult};
pub use rank::{RANKS, Rank};

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Tunable business policy, loaded from the environment by `Config`.
#[derive(Debug, Clone)]
pub struct LoyaltyPolicy {
    /// How long a minted redemption code stays valid.
    pub redemption_ttl_ms: i64,
    /// Rotation interval of the per-member visit credential.
    pub visit_rotation_ms: i64,
    /// Width of both review-gate sliding windows.
    pub review_window_ms: i64,
    /// Max visit credits per code rotation window; `None` = unlimited.
    pub max_credits_per_window: Option<u32>,
}

impl Default for LoyaltyPolicy {
    fn default() -> Self {
        Self {
            redemption_ttl_ms: 30 * DAY_MS,
            visit_rotation_ms: DAY_MS,
            review_window_ms: DAY_MS,
            max_credits_per_window: None,
        }
    }
}
