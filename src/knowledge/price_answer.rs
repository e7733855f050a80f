//! Direct price answers from the compact room summary.
//!
//! When a guest asks what a room costs, the answer is already sitting in
//! the `Rooms:` section of the compact context. Reading it back avoids a
//! generation round trip and guarantees the quoted figure is the stored one.

use once_cell::sync::Lazy;
use regex::Regex;

use super::resolver::{normalize_query, scoring_tokens};

static NIGHTS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(?\s*(\d+)\s*nights?\s*\)?").expect("nights label pattern is valid")
});

static PRICE_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:prices?|costs?|how much|rates?)\b").expect("price question pattern is valid")
});

const ROOMS_MARKER: &str = "Rooms:";

/// One parsed `Rooms:` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceEntry {
    /// Room type label.
    pub room_type: String,
    /// Nights, when the entry names them.
    pub nights: Option<u32>,
    /// Price exactly as written.
    pub price_text: String,
}

impl PriceEntry {
    /// Renders the entry as a reply, e.g. `deluxe: ₱3,000 (2 nights)`.
    pub fn answer(&self) -> String {
        match self.nights {
            Some(n) => format!("{}: {} ({} nights)", self.room_type, self.price_text, n),
            None => format!("{}: {}", self.room_type, self.price_text),
        }
    }

    fn matches(&self, query_tokens: &[&str]) -> bool {
        let normalized = normalize_query(&self.room_type);
        let type_tokens = scoring_tokens(&normalized);
        query_tokens.iter().any(|q| {
            type_tokens
                .iter()
                .any(|t| t.contains(q) || q.contains(t))
        })
    }
}

/// Returns true when a message asks about price.
pub fn is_price_question(message: &str) -> bool {
    PRICE_QUESTION.is_match(message)
}

/// Isolates the text after `Rooms:` up to the next `|`.
pub fn rooms_section(context: &str) -> Option<&str> {
    let start = context.find(ROOMS_MARKER)? + ROOMS_MARKER.len();
    let rest = &context[start..];
    let end = rest.find('|').unwrap_or(rest.len());
    Some(rest[..end].trim())
}

/// Parses one `;`-separated entry.
///
/// The price is whatever follows the last em-dash, or the last hyphen when
/// there is no em-dash. A `<N> night(s)` mention on the left names the
/// nights; the type is the text before any `:` or `(`.
///
/// ```
/// use innkeeper::knowledge::parse_price_entry;
///
/// let entry = parse_price_entry("deluxe: 2 nights — ₱3,000").unwrap();
/// assert_eq!(entry.room_type, "deluxe");
/// assert_eq!(entry.nights, Some(2));
/// assert_eq!(entry.price_text, "₱3,000");
/// ```
pub fn parse_price_entry(entry: &str) -> Option<PriceEntry> {
    let entry = entry.trim();
    let (left, price) = entry
        .rsplit_once('—')
        .or_else(|| entry.rsplit_once('-'))?;
    let price_text = price.trim();
    if price_text.is_empty() {
        return None;
    }

    let nights = NIGHTS_LABEL
        .captures(left)
        .and_then(|caps| caps.get(1)?.as_str().parse::<u32>().ok());
    let without_nights = NIGHTS_LABEL.replace(left, "");
    let room_type = without_nights
        .split(|c| c == ':' || c == '(')
        .next()
        .unwrap_or_default()
        .trim();
    if room_type.is_empty() {
        return None;
    }

    Some(PriceEntry {
        room_type: room_type.to_string(),
        nights,
        price_text: price_text.to_string(),
    })
}

/// Parses every entry of the `Rooms:` section.
pub fn parse_rooms_section(context: &str) -> Vec<PriceEntry> {
    rooms_section(context)
        .map(|section| section.split(';').filter_map(parse_price_entry).collect())
        .unwrap_or_default()
}

/// Answers a price question straight from the compact context.
///
/// Returns the first room whose type overlaps the message, or a summary of
/// every room when the message is a price question that names none.
/// `None` tells the caller to fall back to full generation.
///
/// # Examples
///
/// ```
/// use innkeeper::knowledge::extract_price_answer;
///
/// let context = "Rooms: standard: 1 nights — ₱1,500; deluxe: 2 nights — ₱3,000";
///
/// assert_eq!(
///     extract_price_answer("how much is the deluxe", context).as_deref(),
///     Some("deluxe: ₱3,000 (2 nights)")
/// );
/// assert_eq!(
///     extract_price_answer("how much", context).as_deref(),
///     Some("standard: ₱1,500 (1 nights); deluxe: ₱3,000 (2 nights)")
/// );
/// ```
pub fn extract_price_answer(user_message: &str, short_context: &str) -> Option<String> {
    let entries = parse_rooms_section(short_context);
    if entries.is_empty() {
        return None;
    }

    let normalized = normalize_query(user_message);
    let query_tokens = scoring_tokens(&normalized);
    if let Some(entry) = entries.iter().find(|e| e.matches(&query_tokens)) {
        return Some(entry.answer());
    }

    if is_price_question(user_message) {
        return Some(
            entries
                .iter()
                .map(PriceEntry::answer)
                .collect::<Vec<_>>()
                .join("; "),
        );
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTEXT: &str = "Rooms: standard: 1 nights — ₱1,500; deluxe: 2 nights — ₱3,000";

    #[test]
    fn test_named_room_answer() {
        assert_eq!(
            extract_price_answer("how much is the deluxe", CONTEXT).as_deref(),
            Some("deluxe: ₱3,000 (2 nights)")
        );
    }

    #[test]
    fn test_price_question_without_type_gives_summary() {
        assert_eq!(
            extract_price_answer("how much", CONTEXT).as_deref(),
            Some("standard: ₱1,500 (1 nights); deluxe: ₱3,000 (2 nights)")
        );
    }

    #[test]
    fn test_non_price_question_without_match_is_none() {
        assert_eq!(extract_price_answer("is there wifi", CONTEXT), None);
    }

    #[test]
    fn test_no_rooms_marker_is_none() {
        assert_eq!(extract_price_answer("how much", "Hotel: Harbor View Inn"), None);
    }

    #[test]
    fn test_section_stops_at_pipe() {
        let context = "Hotel: X | Rooms: suite — ₱9,000 | FAQs: Pool? Yes — open daily";
        assert_eq!(rooms_section(context), Some("suite — ₱9,000"));
        assert_eq!(
            extract_price_answer("price of the suite", context).as_deref(),
            Some("suite: ₱9,000")
        );
    }

    #[test]
    fn test_hyphen_separator_and_parenthetical_nights() {
        let entry = parse_price_entry("Family room (3 nights) - ₱7,500").unwrap();

        assert_eq!(entry.room_type, "Family room");
        assert_eq!(entry.nights, Some(3));
        assert_eq!(entry.price_text, "₱7,500");
    }

    #[test]
    fn test_partial_token_containment() {
        // "deluxe" contains "delux"; matching runs both ways.
        assert_eq!(
            extract_price_answer("delux?", CONTEXT).as_deref(),
            Some("deluxe: ₱3,000 (2 nights)")
        );
    }

    #[test]
    fn test_entries_without_price_are_skipped() {
        let entries = parse_rooms_section("Rooms: standard; deluxe — ₱3,000");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].room_type, "deluxe");
    }

    #[test]
    fn test_price_question_detection() {
        assert!(is_price_question("What are your RATES?"));
        assert!(is_price_question("how much for two"));
        assert!(!is_price_question("separate beds please"));
    }
}
