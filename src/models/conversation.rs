//! Chatbot conversation models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed taxonomy guest questions are filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    /// Room rates and fees.
    Pricing,
    /// Whether rooms are free.
    Availability,
    /// Reservations, check-in and check-out.
    Booking,
    /// Facilities.
    Amenities,
    /// House rules, cancellations, refunds.
    Policies,
    /// Getting to the hotel.
    Directions,
    /// Restaurant and meals.
    Food,
    /// Anything else answerable.
    General,
    /// Explicitly off-topic.
    Other,
}

impl QuestionCategory {
    /// Every category, in taxonomy order.
    pub const ALL: [QuestionCategory; 9] = [
        QuestionCategory::Pricing,
        QuestionCategory::Availability,
        QuestionCategory::Booking,
        QuestionCategory::Amenities,
        QuestionCategory::Policies,
        QuestionCategory::Directions,
        QuestionCategory::Food,
        QuestionCategory::General,
        QuestionCategory::Other,
    ];

    /// The lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionCategory::Pricing => "pricing",
            QuestionCategory::Availability => "availability",
            QuestionCategory::Booking => "booking",
            QuestionCategory::Amenities => "amenities",
            QuestionCategory::Policies => "policies",
            QuestionCategory::Directions => "directions",
            QuestionCategory::Food => "food",
            QuestionCategory::General => "general",
            QuestionCategory::Other => "other",
        }
    }

    /// Parses an exact lowercase label.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

/// How the chatbot produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// Answered directly from the compact room summary.
    PriceAnswer,
    /// Generated from a matched hotel's context.
    HotelContext,
    /// Generated from the whole knowledge base.
    BroadContext,
    /// Generation failed; a canned apology was sent.
    Fallback,
}

/// One exchange with a guest, written to the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationLog {
    /// Messaging-platform sender ID.
    pub sender_id: String,
    /// What the guest wrote.
    pub message: String,
    /// What was sent back.
    pub reply: String,
    /// The hotel the message resolved to, if any.
    pub hotel_id: Option<String>,
    /// How the reply was produced.
    pub source: ReplySource,
    /// When the exchange happened.
    pub created_at: DateTime<Utc>,
}

/// A raw question saved from the intake form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Record identifier.
    pub id: Uuid,
    /// The question text.
    pub question: String,
    /// Hotel the question is about, if given.
    pub hotel_id: Option<String>,
    /// Assigned category.
    pub category: QuestionCategory,
    /// When it was saved.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for category in QuestionCategory::ALL {
            assert_eq!(QuestionCategory::from_label(category.as_str()), Some(category));
        }
        assert_eq!(QuestionCategory::from_label("Pricing"), None);
        assert_eq!(QuestionCategory::from_label("weather"), None);
    }

    #[test]
    fn test_serde_matches_labels() {
        let json = serde_json::to_string(&QuestionCategory::Directions).unwrap();
        assert_eq!(json, "\"directions\"");
    }
}
