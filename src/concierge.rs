//! Inbound message handling for the chatbot.
//!
//! One message flows through: hotel resolution, available-room fetch, the
//! direct price answer, context building, generation, delivery and the
//! conversation log. Only generation failures change the reply (to the
//! configured apology); every other failure is logged and skipped.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::ConciergeSettings;
use crate::knowledge::{
    StoreRoomQuery, broad_context, compact_context, detect_nights, extract_price_answer,
    fetch_available_rooms, hotel_context, nights_instruction_block, resolve, sort_by_price,
};
use crate::llm::TextGenerator;
use crate::messenger::MessageSender;
use crate::models::{ConversationLog, FaqEntry, HotelRecord, ReplySource, RoomView};
use crate::store::DocumentStore;

/// A reply and how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConciergeReply {
    /// Text sent to the guest.
    pub text: String,
    /// How the text was produced.
    pub source: ReplySource,
    /// The hotel the message resolved to, if any.
    pub hotel_id: Option<String>,
}

/// Builds the generation prompt around a context block.
pub fn build_prompt(context: &str, message: &str) -> String {
    format!(
        "You are the front-desk concierge for a hotel chain, chatting with a guest on Messenger.\n\
         Answer briefly and only from the information below. If the answer is not there, say so \
         and suggest contacting the front desk.\n\n\
         --- Hotel information ---\n{context}\n--- End of information ---\n\n\
         Guest: {message}"
    )
}

/// Answers guest messages from the knowledge base.
pub struct Concierge<'a> {
    store: &'a dyn DocumentStore,
    generator: &'a dyn TextGenerator,
    settings: &'a ConciergeSettings,
}

impl<'a> Concierge<'a> {
    /// Creates a concierge over its collaborators.
    pub fn new(
        store: &'a dyn DocumentStore,
        generator: &'a dyn TextGenerator,
        settings: &'a ConciergeSettings,
    ) -> Self {
        Self {
            store,
            generator,
            settings,
        }
    }

    /// Produces a reply for one message.
    pub async fn answer(&self, message: &str) -> ConciergeReply {
        let hotels = self.store.list_hotels().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to list hotels");
            Vec::new()
        });

        match resolve(message, &hotels) {
            Some(matched) => {
                info!(hotel_id = %matched.hotel.id, score = matched.score, "Message resolved to hotel");
                self.answer_for_hotel(message, &matched.hotel).await
            }
            None => self.answer_broadly(message, &hotels).await,
        }
    }

    /// Answers a message, delivers the reply and logs the exchange.
    ///
    /// Delivery and logging failures are logged; the reply is returned either way.
    pub async fn handle_message(
        &self,
        sender: &dyn MessageSender,
        sender_id: &str,
        message: &str,
    ) -> ConciergeReply {
        let reply = self.answer(message).await;

        if let Err(e) = sender.send_text(sender_id, &reply.text).await {
            warn!(sender_id = %sender_id, error = %e, "Failed to deliver reply");
        }

        let entry = ConversationLog {
            sender_id: sender_id.to_string(),
            message: message.to_string(),
            reply: reply.text.clone(),
            hotel_id: reply.hotel_id.clone(),
            source: reply.source,
            created_at: Utc::now(),
        };
        if let Err(e) = self.store.log_conversation(entry).await {
            warn!(sender_id = %sender_id, error = %e, "Failed to log conversation");
        }

        reply
    }

    async fn answer_for_hotel(&self, message: &str, hotel: &HotelRecord) -> ConciergeReply {
        let rooms = self.available_rooms(&hotel.id).await;
        let nights = detect_nights(message);

        if nights.is_none() {
            let compact = compact_context(hotel, &rooms, &[]);
            if let Some(answer) = extract_price_answer(message, &compact) {
                return ConciergeReply {
                    text: answer,
                    source: ReplySource::PriceAnswer,
                    hotel_id: Some(hotel.id.clone()),
                };
            }
        }

        let faqs = self.faqs(Some(&hotel.id)).await;
        let general = self.faqs(None).await;
        let mut context = hotel_context(
            hotel,
            &rooms,
            &faqs,
            &general,
            self.settings.narrow_context_chars,
        );
        if let Some(block) = nights.and_then(|n| nights_instruction_block(&rooms, n)) {
            context.push_str("\n\n");
            context.push_str(&block);
        }

        self.generate(message, &context, ReplySource::HotelContext, Some(hotel.id.clone()))
            .await
    }

    async fn answer_broadly(&self, message: &str, hotels: &[HotelRecord]) -> ConciergeReply {
        let mut enriched = Vec::with_capacity(hotels.len());
        for hotel in hotels {
            let mut hotel = hotel.clone();
            hotel.rooms = self.available_rooms(&hotel.id).await;
            hotel.faqs = self.faqs(Some(&hotel.id)).await;
            enriched.push(hotel);
        }
        let general = self.faqs(None).await;
        let context = broad_context(&enriched, &general, self.settings.broad_context_chars);

        self.generate(message, &context, ReplySource::BroadContext, None)
            .await
    }

    async fn generate(
        &self,
        message: &str,
        context: &str,
        source: ReplySource,
        hotel_id: Option<String>,
    ) -> ConciergeReply {
        match self.generator.generate(&build_prompt(context, message)).await {
            Ok(text) => ConciergeReply {
                text,
                source,
                hotel_id,
            },
            Err(e) => {
                warn!(error = %e, "Generation failed, sending apology");
                ConciergeReply {
                    text: self.settings.apology.clone(),
                    source: ReplySource::Fallback,
                    hotel_id,
                }
            }
        }
    }

    async fn available_rooms(&self, hotel_id: &str) -> Vec<RoomView> {
        let strategy = StoreRoomQuery::new(self.store, self.settings.fallback_batch_minimum);
        match fetch_available_rooms(&strategy, hotel_id, self.settings.room_limit).await {
            Ok(fetch) => {
                debug!(hotel_id = %hotel_id, path = ?fetch.path, rooms = fetch.rooms.len(), "Rooms fetched");
                let mut rooms = fetch.rooms;
                if self.settings.sort_rooms_by_price {
                    sort_by_price(&mut rooms);
                }
                rooms
            }
            Err(e) => {
                warn!(hotel_id = %hotel_id, error = %e, "Failed to fetch rooms");
                Vec::new()
            }
        }
    }

    async fn faqs(&self, hotel_id: Option<&str>) -> Vec<FaqEntry> {
        self.store.list_faqs(hotel_id).await.unwrap_or_else(|e| {
            warn!(hotel_id = ?hotel_id, error = %e, "Failed to fetch FAQs");
            Vec::new()
        })
    }
}
