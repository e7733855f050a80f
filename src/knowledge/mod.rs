//! Knowledge-base heuristics behind the chatbot.
//!
//! This module resolves a guest's message to a hotel, normalizes room
//! documents, builds the context text for generation, answers simple price
//! questions directly and classifies intake questions.

mod classifier;
mod context;
pub mod fields;
mod price_answer;
mod resolver;
mod room_query;
mod rooms;

pub use classifier::{
    CategoryClassifier, Classification, ClassificationSource, classification_prompt,
    classify_by_rules, parse_category_reply,
};
pub use context::{
    TRUNCATION_MARKER, broad_context, compact_context, hotel_context, room_entry, room_summary,
    truncate_chars,
};
pub use fields::FieldAccessor;
pub use price_answer::{
    PriceEntry, extract_price_answer, is_price_question, parse_price_entry, parse_rooms_section,
    rooms_section,
};
pub use resolver::{FULL_MATCH_BONUS, MIN_TOKEN_LEN, normalize_query, resolve, score_hotel, scoring_tokens};
pub use room_query::{
    DEFAULT_BATCH_MINIMUM, FallbackReason, RoomFetch, RoomFetchPath, RoomQueryStrategy,
    StoreRoomQuery, fetch_available_rooms, is_available_in_scan,
};
pub use rooms::{
    MISSING_PRICE, NightTotal, coerce_available, detect_nights, extract_rooms, format_peso,
    multi_night_totals, nights_instruction_block, parse_price, room_view, sort_by_price,
};
