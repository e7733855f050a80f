//! Hotel resolution by token overlap.
//!
//! A guest's free-text message is matched against every hotel's id, name,
//! location and aliases. The scoring is deliberately simple: each query
//! token found in the hotel's haystack scores one point, and the whole
//! query appearing verbatim scores two more.

use crate::models::{HotelRecord, MatchResult};

/// Minimum token length that counts towards the score.
pub const MIN_TOKEN_LEN: usize = 2;

/// Bonus awarded when the whole normalized query appears in the haystack.
pub const FULL_MATCH_BONUS: u32 = 2;

/// Normalizes a query for matching.
///
/// Everything except letters, digits, hyphens and whitespace is removed,
/// whitespace runs collapse to a single space, and the result is lowercased.
///
/// ```
/// use innkeeper::knowledge::normalize_query;
///
/// assert_eq!(normalize_query("  D'Mariners   Inn!! "), "dmariners inn");
/// ```
pub fn normalize_query(query: &str) -> String {
    let kept: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Splits a normalized query into scoring tokens.
pub fn scoring_tokens(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .collect()
}

fn haystack(hotel: &HotelRecord) -> String {
    let mut parts: Vec<&str> = vec![&hotel.id, &hotel.name, &hotel.location];
    parts.extend(hotel.aliases.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

/// Scores one hotel against a normalized query.
pub fn score_hotel(normalized: &str, hotel: &HotelRecord) -> u32 {
    let hay = haystack(hotel);
    let token_hits = scoring_tokens(normalized)
        .into_iter()
        .filter(|t| hay.contains(t))
        .count() as u32;
    let bonus = if !normalized.is_empty() && hay.contains(normalized) {
        FULL_MATCH_BONUS
    } else {
        0
    };
    token_hits + bonus
}

/// Resolves a message to the best-matching hotel.
///
/// Returns `None` when no hotel scores at least one point. On ties the
/// earlier candidate wins.
///
/// # Examples
///
/// ```
/// use innkeeper::knowledge::resolve;
/// use innkeeper::models::HotelRecord;
///
/// let hotels: Vec<HotelRecord> = serde_json::from_value(serde_json::json!([
///     { "id": "seaside", "name": "Seaside Suites", "location": "Dumaguete" },
///     { "id": "dmariners", "name": "D'Mariners Inn Hotel", "aliases": ["bicotel"] }
/// ])).unwrap();
///
/// let matched = resolve("whats the price at bicotel", &hotels).unwrap();
/// assert_eq!(matched.hotel.id, "dmariners");
/// ```
pub fn resolve(query: &str, candidates: &[HotelRecord]) -> Option<MatchResult> {
    let normalized = normalize_query(query);
    if normalized.is_empty() {
        return None;
    }

    let mut best: Option<(&HotelRecord, u32)> = None;
    for hotel in candidates {
        let score = score_hotel(&normalized, hotel);
        if score >= 1 && best.is_none_or(|(_, top)| score > top) {
            best = Some((hotel, score));
        }
    }

    best.map(|(hotel, score)| MatchResult {
        hotel: hotel.clone(),
        score,
    })
}
