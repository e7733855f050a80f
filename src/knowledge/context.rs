//! Context text handed to the generator.
//!
//! Three shapes are built:
//!
//! - a compact one-line summary (`Hotel: … | Rooms: … | FAQs: …`) that the
//!   price-answer extractor reads back;
//! - a narrow context for a matched hotel;
//! - a broad context covering the whole knowledge base.
//!
//! The narrow and broad forms are cut to a character budget.

use crate::models::{FaqEntry, HotelRecord, RoomView};

/// Appended when a context is cut short.
pub const TRUNCATION_MARKER: &str = "\n[…]";

/// Renders one room as a compact summary entry, e.g.
/// `deluxe: 2 nights — ₱3,000`.
pub fn room_entry(room: &RoomView) -> String {
    match room.nights {
        Some(n) => format!("{}: {} nights — {}", room.room_type, n, room.price_display),
        None => format!("{} — {}", room.room_type, room.price_display),
    }
}

/// Joins room entries with `"; "`.
pub fn room_summary(rooms: &[RoomView]) -> String {
    rooms.iter().map(room_entry).collect::<Vec<_>>().join("; ")
}

fn one_line(text: &str) -> String {
    text.replace('|', "/")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the compact single-line summary for a hotel.
///
/// ```
/// use innkeeper::knowledge::compact_context;
/// use innkeeper::knowledge::extract_rooms;
/// use innkeeper::models::{HotelRecord, RoomDocument};
/// use serde_json::json;
///
/// let hotel: HotelRecord = serde_json::from_value(json!({ "id": "h", "name": "Harbor View Inn" })).unwrap();
/// let rooms = extract_rooms("h", &[RoomDocument::new("r1", json!({ "type": "standard", "price": 1500, "nights": 1 }))]);
///
/// assert_eq!(
///     compact_context(&hotel, &rooms, &[]),
///     "Hotel: Harbor View Inn | Rooms: standard: 1 nights — ₱1,500"
/// );
/// ```
pub fn compact_context(hotel: &HotelRecord, rooms: &[RoomView], faqs: &[FaqEntry]) -> String {
    let mut sections = vec![format!("Hotel: {}", one_line(&hotel.name))];
    if !rooms.is_empty() {
        sections.push(format!("Rooms: {}", one_line(&room_summary(rooms))));
    }
    if !faqs.is_empty() {
        let faq_text = faqs
            .iter()
            .map(|f| format!("{} {}", one_line(&f.question), one_line(&f.answer)))
            .collect::<Vec<_>>()
            .join("; ");
        sections.push(format!("FAQs: {faq_text}"));
    }
    sections.join(" | ")
}

fn push_hotel_block(out: &mut String, hotel: &HotelRecord, rooms: &[RoomView], faqs: &[FaqEntry]) {
    out.push_str(&format!("Hotel: {}\n", hotel.name));
    if !hotel.location.is_empty() {
        out.push_str(&format!("Location: {}\n", hotel.location));
    }
    if !hotel.aliases.is_empty() {
        out.push_str(&format!("Also known as: {}\n", hotel.aliases.join(", ")));
    }
    if !hotel.description.is_empty() {
        out.push_str(&format!("About: {}\n", hotel.description));
    }

    if rooms.is_empty() {
        out.push_str("Rooms: no available rooms listed\n");
    } else {
        out.push_str("Available rooms:\n");
        for room in rooms {
            out.push_str(&format!("- {}", room.room_type));
            if let Some(number) = &room.room_number {
                out.push_str(&format!(" (room {number})"));
            }
            out.push_str(&format!(": {} per night", room.price_display));
            if let Some(n) = room.nights {
                out.push_str(&format!(", {n} nights"));
            }
            out.push('\n');
        }
    }

    push_faqs(out, "FAQs", faqs);
}

fn push_faqs(out: &mut String, heading: &str, faqs: &[FaqEntry]) {
    if faqs.is_empty() {
        return;
    }
    out.push_str(&format!("{heading}:\n"));
    for faq in faqs {
        out.push_str(&format!("Q: {}\nA: {}\n", faq.question, faq.answer));
    }
}

/// Builds the context for a single matched hotel.
pub fn hotel_context(
    hotel: &HotelRecord,
    rooms: &[RoomView],
    faqs: &[FaqEntry],
    general_faqs: &[FaqEntry],
    max_chars: usize,
) -> String {
    let mut out = String::new();
    push_hotel_block(&mut out, hotel, rooms, faqs);
    push_faqs(&mut out, "General FAQs", general_faqs);
    truncate_chars(&out, max_chars)
}

/// Builds the context covering every hotel.
///
/// Each hotel's `rooms` and `faqs` are expected to be filled in already.
pub fn broad_context(hotels: &[HotelRecord], general_faqs: &[FaqEntry], max_chars: usize) -> String {
    let mut out = String::new();
    for hotel in hotels {
        push_hotel_block(&mut out, hotel, &hotel.rooms, &hotel.faqs);
        out.push('\n');
    }
    push_faqs(&mut out, "General FAQs", general_faqs);
    truncate_chars(&out, max_chars)
}

/// Cuts `text` to at most `max_chars` characters, never splitting a
/// character, and marks the cut.
///
/// ```
/// use innkeeper::knowledge::truncate_chars;
///
/// assert_eq!(truncate_chars("short", 10), "short");
/// assert!(truncate_chars("₱₱₱₱₱₱₱₱₱₱", 8).chars().count() <= 8);
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let marker_len = TRUNCATION_MARKER.chars().count();
    if max_chars <= marker_len {
        return text.chars().take(max_chars).collect();
    }
    let mut cut: String = text.chars().take(max_chars - marker_len).collect();
    cut.push_str(TRUNCATION_MARKER);
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::extract_rooms;
    use crate::models::RoomDocument;
    use serde_json::json;

    fn hotel() -> HotelRecord {
        serde_json::from_value(json!({
            "id": "dmariners",
            "name": "D'Mariners Inn Hotel",
            "aliases": ["bicotel"],
            "location": "Sibulan",
            "description": "Seaside inn near the port."
        }))
        .unwrap()
    }

    fn rooms() -> Vec<RoomView> {
        extract_rooms(
            "dmariners",
            &[
                RoomDocument::new("r1", json!({ "roomtype": "standard", "price": 1500, "nights": 1 })),
                RoomDocument::new("r2", json!({ "roomtype": "deluxe", "price": "3,000", "nights": 2, "roomnumber": "204" })),
                RoomDocument::new("r3", json!({ "roomtype": "promo" })),
            ],
        )
    }

    fn faq(q: &str, a: &str) -> FaqEntry {
        FaqEntry {
            question: q.to_string(),
            answer: a.to_string(),
            hotel_id: "dmariners".to_string(),
        }
    }

    #[test]
    fn test_room_summary_format() {
        assert_eq!(
            room_summary(&rooms()),
            "standard: 1 nights — ₱1,500; deluxe: 2 nights — ₱3,000; promo — n/a"
        );
    }

    #[test]
    fn test_compact_context_sections() {
        let text = compact_context(&hotel(), &rooms()[..2], &[faq("Parking?", "Free | covered")]);

        assert_eq!(
            text,
            "Hotel: D'Mariners Inn Hotel | Rooms: standard: 1 nights — ₱1,500; deluxe: 2 nights — ₱3,000 | FAQs: Parking? Free / covered"
        );
    }

    #[test]
    fn test_compact_context_without_rooms() {
        let text = compact_context(&hotel(), &[], &[]);
        assert_eq!(text, "Hotel: D'Mariners Inn Hotel");
    }

    #[test]
    fn test_hotel_context_includes_details() {
        let general = vec![FaqEntry {
            question: "Do you accept cards?".to_string(),
            answer: "Yes.".to_string(),
            hotel_id: "general".to_string(),
        }];
        let text = hotel_context(&hotel(), &rooms(), &[faq("Pets?", "No pets.")], &general, 6_000);

        assert!(text.contains("Location: Sibulan"));
        assert!(text.contains("Also known as: bicotel"));
        assert!(text.contains("- deluxe (room 204): ₱3,000 per night, 2 nights"));
        assert!(text.contains("Q: Pets?\nA: No pets."));
        assert!(text.contains("General FAQs:"));
    }

    #[test]
    fn test_broad_context_is_bounded() {
        let mut hotels = Vec::new();
        for i in 0..50 {
            let mut h = hotel();
            h.id = format!("h{i}");
            h.rooms = rooms();
            hotels.push(h);
        }

        let text = broad_context(&hotels, &[], 1_000);

        assert_eq!(text.chars().count(), 1_000);
        assert!(text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_tiny_budget() {
        assert_eq!(truncate_chars("abcdef", 2), "ab");
        assert_eq!(truncate_chars("", 0), "");
    }
}
