//! Code Generation
//!
//! Redemption and visit codes share one alphabet: uppercase alphanumerics
//! with the ambiguous glyphs (0/O, 1/I) removed, so staff can read a code
//! over the bar and key in its tail without transcription errors.
//!
//! At 32 symbols a 12-character redemption code carries 60 bits; guessing
//! a live code from its 3-character tail means hitting the remaining 45
//! bits, which is out of reach for someone poking a staff terminal.

use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const REDEMPTION_CODE_LEN: usize = 12;
pub const VISIT_CODE_LEN: usize = 16;

/// Minimum suffix length staff key in for reward acceptance.
pub const FRAGMENT_LEN: usize = 3;

fn random_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Fresh coupon code for a reward redemption.
pub fn redemption_code() -> String {
    random_code(REDEMPTION_CODE_LEN)
}

/// Fresh rotating visit credential.
pub fn visit_code() -> String {
    random_code(VISIT_CODE_LEN)
}

/// Normalize a staff-typed fragment: trim, uppercase, and require between
/// [`FRAGMENT_LEN`] and [`REDEMPTION_CODE_LEN`] ASCII alphanumerics.
/// Suffixes longer than the minimum let staff narrow down a tail that
/// matched more than one live code. Codes contain no LIKE wildcards, so
/// anything else cannot match and is rejected up front.
pub fn normalize_fragment(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if !(FRAGMENT_LEN..=REDEMPTION_CODE_LEN).contains(&trimmed.len())
        || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}
