//! Rank Calculator
//!
//! Pure functions over the static tier table. Rank is derived from
//! *cumulative earned* points, never from the spendable balance — spending
//! points on rewards must not demote a member. This asymmetry is a business
//! rule, not an accident; see `ledger`.

use serde::Serialize;

/// A loyalty tier. The table is totally ordered by `min_points` with no
/// gaps: every non-negative value lands in exactly one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rank {
    pub name: &'static str,
    pub min_points: i64,
    pub color: &'static str,
    pub icon: &'static str,
}

/// Tiers ascending by `min_points`. The first entry must start at 0.
pub const RANKS: [Rank; 5] = [
    Rank {
        name: "Rookie",
        min_points: 0,
        color: "#9CA3AF",
        icon: "star-outline",
    },
    Rank {
        name: "Trendsetter",
        min_points: 1000,
        color: "#34D399",
        icon: "flash",
    },
    Rank {
        name: "Socialite",
        min_points: 5000,
        color: "#A78BFA",
        icon: "sparkles",
    },
    Rank {
        name: "Icon",
        min_points: 15000,
        color: "#FBBF24",
        icon: "flame",
    },
    Rank {
        name: "Legend",
        min_points: 30000,
        color: "#F87171",
        icon: "crown",
    },
];

/// Best-qualifying tier: the highest `min_points` still `<= earned`.
/// Negative input (impossible through the ledger) clamps to the floor tier.
pub fn rank_for(earned_points: i64) -> &'static Rank {
    let earned = earned_points.max(0);
    RANKS
        .iter()
        .rev()
        .find(|r| r.min_points <= earned)
        .unwrap_or(&RANKS[0])
}

/// The next tier up, or `None` at the top.
pub fn next_rank(earned_points: i64) -> Option<&'static Rank> {
    let earned = earned_points.max(0);
    RANKS.iter().find(|r| r.min_points > earned)
}

/// Points remaining to the next tier; 0 at or above the top tier.
pub fn points_to_next(earned_points: i64) -> i64 {
    next_rank(earned_points)
        .map(|r| r.min_points - earned_points.max(0))
        .unwrap_or(0)
}
