//! Room normalization and pricing helpers.
//!
//! Raw [`RoomDocument`]s are turned into canonical [`RoomView`]s on every
//! read. Prices are parsed into [`Decimal`] and rendered as peso text;
//! availability encodings collapse to a plain boolean.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::Value;

use crate::models::{RoomDocument, RoomView};

use super::fields::{self, DEFAULT_ROOM_TYPE};

/// Shown when a room has no price at all.
pub const MISSING_PRICE: &str = "n/a";

static NIGHTS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+)\s*nights?\b").expect("nights pattern is valid"));

/// Parses a price value.
///
/// JSON numbers are taken directly. Strings have thousands separators,
/// whitespace and a leading peso sign removed before parsing.
///
/// ```
/// use innkeeper::knowledge::parse_price;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// assert_eq!(parse_price(&json!("1,500")), Some(Decimal::from(1500)));
/// assert_eq!(parse_price(&json!(1500)), Some(Decimal::from(1500)));
/// assert_eq!(parse_price(&json!("ask the desk")), None);
/// ```
pub fn parse_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| *c != ',' && !c.is_whitespace())
                .collect();
            let cleaned = cleaned.trim_start_matches('₱');
            if cleaned.is_empty() {
                None
            } else {
                parse_decimal(cleaned)
            }
        }
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .map(|d| d.normalize())
}

/// Formats a peso amount for guests.
///
/// Thousands are comma-grouped; two decimals are shown only when the amount
/// has a fractional part.
///
/// ```
/// use innkeeper::knowledge::format_peso;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_peso(Decimal::from(1500)), "₱1,500");
/// assert_eq!(format_peso(Decimal::new(150050, 2)), "₱1,500.50");
/// ```
pub fn format_peso(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let whole = abs.trunc().normalize();
    let fraction = abs - whole;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if fraction.is_zero() {
        format!("{sign}₱{grouped}")
    } else {
        let cents = (fraction * Decimal::ONE_HUNDRED).round().to_i64().unwrap_or(0);
        format!("{sign}₱{grouped}.{cents:02}")
    }
}

/// Collapses an availability value to a boolean.
///
/// Booleans pass through; `true`/`yes`/`1` and `false`/`no`/`0` strings are
/// recognized case-insensitively; the number `1` is available. Anything else,
/// including an absent value, is unavailable.
pub fn coerce_available(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1"),
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        _ => false,
    }
}

fn parse_nights(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n >= 1)
}

/// Builds the canonical view of one room document.
pub fn room_view(hotel_id: &str, doc: &RoomDocument) -> RoomView {
    let raw_price = fields::PRICE.get(&doc.fields);
    let price = raw_price.and_then(parse_price);
    let price_display = match (price, raw_price) {
        (Some(p), _) => format_peso(p),
        (None, Some(raw)) => fields::PRICE
            .get_text(&doc.fields)
            .unwrap_or_else(|| raw.to_string()),
        (None, None) => MISSING_PRICE.to_string(),
    };

    RoomView {
        id: doc.id.clone(),
        hotel_id: hotel_id.to_string(),
        room_type: fields::ROOM_TYPE
            .get_text(&doc.fields)
            .unwrap_or_else(|| DEFAULT_ROOM_TYPE.to_string()),
        room_number: fields::ROOM_NUMBER.get_text(&doc.fields),
        price,
        price_display,
        nights: fields::NIGHTS.get(&doc.fields).and_then(parse_nights),
        available: coerce_available(fields::AVAILABILITY.get(&doc.fields)),
        status: fields::STATUS.get_text(&doc.fields),
    }
}

/// Normalizes every room document of a hotel.
pub fn extract_rooms(hotel_id: &str, docs: &[RoomDocument]) -> Vec<RoomView> {
    docs.iter().map(|doc| room_view(hotel_id, doc)).collect()
}

/// Sorts rooms by ascending price. Rooms without a parsed price go last;
/// the sort is stable.
pub fn sort_by_price(rooms: &mut [RoomView]) {
    rooms.sort_by(|a, b| match (a.price, b.price) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Finds a `<N> night(s)` mention in a message. Zero nights is ignored.
///
/// ```
/// use innkeeper::knowledge::detect_nights;
///
/// assert_eq!(detect_nights("Price for 3 Nights please"), Some(3));
/// assert_eq!(detect_nights("one night"), None);
/// ```
pub fn detect_nights(message: &str) -> Option<u32> {
    NIGHTS_PATTERN
        .captures_iter(message)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .find(|n| *n >= 1)
}

/// A precomputed multi-night total for one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightTotal {
    /// Room type label.
    pub room_type: String,
    /// Formatted total.
    pub total: String,
}

/// Computes `price × nights` for every room with a parsed price.
///
/// Rooms whose total does not fit in a `Decimal` are left out.
pub fn multi_night_totals(rooms: &[RoomView], nights: u32) -> Vec<NightTotal> {
    let n = Decimal::from(nights);
    rooms
        .iter()
        .filter_map(|room| {
            let total = room.price?.checked_mul(n)?;
            Some(NightTotal {
                room_type: room.room_type.clone(),
                total: format_peso(total),
            })
        })
        .collect()
}

/// Builds the instruction block telling the generator to quote the
/// precomputed totals. Returns `None` when no room has a price.
pub fn nights_instruction_block(rooms: &[RoomView], nights: u32) -> Option<String> {
    let totals = multi_night_totals(rooms, nights);
    if totals.is_empty() {
        return None;
    }

    let mut block = format!(
        "The guest is asking about a {nights}-night stay. Quote these precomputed totals exactly as written and do not do your own arithmetic:\n"
    );
    for t in &totals {
        block.push_str(&format!("- {} → {} for {} nights\n", t.room_type, t.total, nights));
    }
    Some(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, value: Value) -> RoomDocument {
        RoomDocument::new(id, value)
    }

    #[test]
    fn test_price_encodings_parse_equal() {
        let expected = Some(Decimal::from(1500));
        assert_eq!(parse_price(&json!("1,500")), expected);
        assert_eq!(parse_price(&json!(1500)), expected);
        assert_eq!(parse_price(&json!(1500.00)), expected);
        assert_eq!(parse_price(&json!("1500.00")), expected);
        assert_eq!(parse_price(&json!(" ₱1 500 ")), expected);
    }

    #[test]
    fn test_unparseable_prices() {
        assert_eq!(parse_price(&json!("")), None);
        assert_eq!(parse_price(&json!("call us")), None);
        assert_eq!(parse_price(&json!(true)), None);
    }

    #[test]
    fn test_format_peso() {
        assert_eq!(format_peso(Decimal::from(0)), "₱0");
        assert_eq!(format_peso(Decimal::from(999)), "₱999");
        assert_eq!(format_peso(Decimal::from(1_234_567)), "₱1,234,567");
        assert_eq!(format_peso(Decimal::new(25, 1)), "₱2.50");
    }

    #[test]
    fn test_available_encodings() {
        for value in [json!(true), json!("true"), json!("yes"), json!("1"), json!(1), json!(" YES ")] {
            assert!(coerce_available(Some(&value)), "{value} should be available");
        }
        for value in [json!(false), json!("false"), json!("no"), json!("0"), json!(0), json!("unknown"), json!(2)] {
            assert!(!coerce_available(Some(&value)), "{value} should be unavailable");
        }
        assert!(!coerce_available(None));
    }

    #[test]
    fn test_room_view_field_fallbacks() {
        let room = room_view(
            "dmariners",
            &doc("r1", json!({ "rate": "2,000", "type": "Family", "no": 12, "nightsCount": "2", "isAvailable": "yes" })),
        );

        assert_eq!(room.room_type, "Family");
        assert_eq!(room.room_number.as_deref(), Some("12"));
        assert_eq!(room.price, Some(Decimal::from(2000)));
        assert_eq!(room.price_display, "₱2,000");
        assert_eq!(room.nights, Some(2));
        assert!(room.available);
        assert_eq!(room.hotel_id, "dmariners");
    }

    #[test]
    fn test_room_view_placeholders() {
        let room = room_view("h", &doc("r2", json!({})));
        assert_eq!(room.room_type, "room");
        assert_eq!(room.price_display, "n/a");
        assert!(!room.available);

        let room = room_view("h", &doc("r3", json!({ "price": "on request" })));
        assert_eq!(room.price, None);
        assert_eq!(room.price_display, "on request");
    }

    #[test]
    fn test_sort_puts_unpriced_last_and_is_stable() {
        let mut rooms = extract_rooms(
            "h",
            &[
                doc("a", json!({ "type": "suite", "price": 5000 })),
                doc("b", json!({ "type": "mystery" })),
                doc("c", json!({ "type": "standard", "price": "1,500" })),
                doc("d", json!({ "type": "promo", "price": "tbd" })),
                doc("e", json!({ "type": "twin", "price": 1500 })),
            ],
        );

        sort_by_price(&mut rooms);

        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "e", "a", "b", "d"]);
    }

    #[test]
    fn test_detect_nights() {
        assert_eq!(detect_nights("2 nights at the deluxe"), Some(2));
        assert_eq!(detect_nights("1 night"), Some(1));
        assert_eq!(detect_nights("0 nights then 4 nights"), Some(4));
        assert_eq!(detect_nights("tonight"), None);
    }

    #[test]
    fn test_multi_night_totals_and_block() {
        let rooms = extract_rooms(
            "h",
            &[
                doc("a", json!({ "type": "standard", "price": 1500 })),
                doc("b", json!({ "type": "mystery" })),
            ],
        );

        let totals = multi_night_totals(&rooms, 3);
        assert_eq!(
            totals,
            vec![NightTotal {
                room_type: "standard".to_string(),
                total: "₱4,500".to_string()
            }]
        );

        let block = nights_instruction_block(&rooms, 3).unwrap();
        assert!(block.contains("standard → ₱4,500"));
        assert!(nights_instruction_block(&rooms[1..], 3).is_none());
    }

    #[test]
    fn test_multi_night_totals_skip_unrepresentable_price() {
        let rooms = extract_rooms(
            "h",
            &[
                doc("a", json!({ "type": "standard", "price": 1500 })),
                doc("b", json!({ "type": "palace", "price": "7e28" })),
            ],
        );
        assert_eq!(rooms[1].price, Some(Decimal::from_scientific("7e28").unwrap()));

        let totals = multi_night_totals(&rooms, 3);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].room_type, "standard");
        assert_eq!(totals[0].total, "₱4,500");

        assert!(nights_instruction_block(&rooms[1..], 3).is_none());
    }
}
