//! Hotel knowledge-base models.
//!
//! Hotels, their rooms and FAQs are owned by the document store. Room
//! documents arrive with inconsistent field names, so they are kept as
//! untyped maps ([`RoomDocument`]) and normalised into [`RoomView`] on
//! every read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Hotel ID used for FAQs that are not tied to a single hotel.
pub const GENERAL_FAQ_SCOPE: &str = "general";

fn general_scope() -> String {
    GENERAL_FAQ_SCOPE.to_string()
}

/// A hotel in the chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelRecord {
    /// Document identifier (e.g. "dmariners").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Alternative names guests use for the hotel.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Free-text location.
    #[serde(default)]
    pub location: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Normalised rooms, filled in when knowledge is assembled for a prompt.
    #[serde(default)]
    pub rooms: Vec<RoomView>,
    /// Hotel-scoped FAQs, filled in when knowledge is assembled for a prompt.
    #[serde(default)]
    pub faqs: Vec<FaqEntry>,
}

/// A frequently asked question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    /// The question text.
    pub question: String,
    /// The answer text.
    pub answer: String,
    /// Owning hotel, or [`GENERAL_FAQ_SCOPE`].
    #[serde(default = "general_scope")]
    pub hotel_id: String,
}

/// A raw room document as stored.
///
/// Only the identifier is guaranteed; everything else is looked up through
/// the ordered accessors in [`crate::knowledge::fields`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDocument {
    /// Document identifier.
    pub id: String,
    /// All other fields, untyped.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RoomDocument {
    /// Builds a document from a JSON object. Non-object values give an empty field map.
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            fields,
        }
    }
}

/// Canonical view of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomView {
    /// Room document identifier.
    pub id: String,
    /// Owning hotel.
    pub hotel_id: String,
    /// Room type label, `"room"` when none is recorded.
    pub room_type: String,
    /// Room number, when recorded.
    pub room_number: Option<String>,
    /// Parsed nightly price.
    pub price: Option<Decimal>,
    /// Price as shown to guests (`₱1,500`, raw text, or `n/a`).
    pub price_display: String,
    /// Contracted nights, when recorded.
    pub nights: Option<u32>,
    /// Coerced availability.
    pub available: bool,
    /// Free-text status, when recorded.
    pub status: Option<String>,
}

/// The best-scoring hotel for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The matched hotel.
    pub hotel: HotelRecord,
    /// Its token-overlap score.
    pub score: u32,
}
