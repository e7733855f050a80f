//! Ordered field accessors for loosely-structured room documents.
//!
//! Room documents have been written by several admin tools over time, so the
//! same fact is spelled differently from one document to the next. Each
//! [`FieldAccessor`] names the candidate keys in priority order; the first
//! key present with a non-null value wins.

use serde_json::{Map, Value};

/// An ordered list of keys that may hold one logical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAccessor {
    /// Logical name, used in logs.
    pub name: &'static str,
    /// Candidate keys, highest priority first.
    pub keys: &'static [&'static str],
}

impl FieldAccessor {
    /// Returns the first non-null value among the candidate keys.
    ///
    /// ```
    /// use innkeeper::knowledge::fields::PRICE;
    /// use serde_json::json;
    ///
    /// let doc = json!({ "price": null, "rate": "1,500" });
    /// let value = PRICE.get(doc.as_object().unwrap()).unwrap();
    /// assert_eq!(value, &json!("1,500"));
    /// ```
    pub fn get<'a>(&self, fields: &'a Map<String, Value>) -> Option<&'a Value> {
        self.keys
            .iter()
            .filter_map(|key| fields.get(*key))
            .find(|value| !value.is_null())
    }

    /// Returns the first candidate that renders as non-blank text.
    ///
    /// Numbers and booleans are rendered; blank strings, arrays and objects
    /// are skipped in favour of the next key.
    pub fn get_text(&self, fields: &Map<String, Value>) -> Option<String> {
        self.keys
            .iter()
            .filter_map(|key| fields.get(*key))
            .find_map(value_text)
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Nightly price.
pub const PRICE: FieldAccessor = FieldAccessor {
    name: "price",
    keys: &["price", "rate", "cost"],
};

/// Room type label. Falls back to [`DEFAULT_ROOM_TYPE`].
pub const ROOM_TYPE: FieldAccessor = FieldAccessor {
    name: "room_type",
    keys: &["roomtype", "roomType", "type", "name"],
};

/// Room number.
pub const ROOM_NUMBER: FieldAccessor = FieldAccessor {
    name: "room_number",
    keys: &["roomnumber", "roomNumber", "number", "no"],
};

/// Contracted nights.
pub const NIGHTS: FieldAccessor = FieldAccessor {
    name: "nights",
    keys: &["nights", "nightsCount", "nights_count"],
};

/// Explicit availability flag.
pub const AVAILABILITY: FieldAccessor = FieldAccessor {
    name: "available",
    keys: &["available", "isAvailable", "is_available"],
};

/// Free-text status.
pub const STATUS: FieldAccessor = FieldAccessor {
    name: "status",
    keys: &["status", "roomStatus"],
};

/// Owning hotel reference on a room document.
pub const HOTEL_REF: FieldAccessor = FieldAccessor {
    name: "hotel_id",
    keys: &["hotelId", "hotel_id", "hotel"],
};

/// Room type used when a document carries none.
pub const DEFAULT_ROOM_TYPE: &str = "room";
