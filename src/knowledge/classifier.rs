//! Guest question classification.
//!
//! Questions are labelled with a [`QuestionCategory`]. The model is asked
//! first; when it fails or answers off-list, ordered keyword rules decide.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::llm::TextGenerator;
use crate::models::QuestionCategory;

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// The model's reply was a known category.
    Model,
    /// The keyword rules decided.
    Rules,
}

/// A category and how it was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// The category.
    pub category: QuestionCategory,
    /// Model or rules.
    pub source: ClassificationSource,
}

struct Rule {
    category: QuestionCategory,
    pattern: Regex,
}

fn rule(category: QuestionCategory, pattern: &str) -> Rule {
    Rule {
        category,
        pattern: Regex::new(pattern).expect("classifier rule pattern is valid"),
    }
}

/// Ordered rules; the first match wins.
static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        rule(
            QuestionCategory::Pricing,
            r"\b(?:prices?|pricing|costs?|how much|rates?|fees?|charges?|pesos?|php|expensive|cheap|discounts?|promos?)\b",
        ),
        rule(
            QuestionCategory::Availability,
            r"\b(?:availab\w*|vacan\w*|fully booked|any rooms?|rooms? left|open rooms?)\b",
        ),
        rule(
            QuestionCategory::Booking,
            r"\b(?:book\w*|reserv\w*|check[- ]?in|check[- ]?out|cancel my|change my)\b",
        ),
        rule(
            QuestionCategory::Amenities,
            r"\b(?:wi-?fi|internet|pool|gym|parking|amenit\w*|air[- ]?con\w*|aircon|tv|spa|laundry|towels?|shower)\b",
        ),
        rule(
            QuestionCategory::Policies,
            r"\b(?:polic\w*|cancel\w*|refunds?|rules?|pets?|smoking|deposit|curfew|visitors?)\b",
        ),
        rule(
            QuestionCategory::Directions,
            r"\b(?:where|directions?|locat\w*|address|get there|how to get|nearest|landmarks?|route)\b",
        ),
        rule(
            QuestionCategory::Food,
            r"\b(?:food|restaurant|menu|meals?|breakfast|lunch|dinner|eat|dining|room service)\b",
        ),
    ]
});

/// Classifies with the keyword rules alone.
///
/// ```
/// use innkeeper::knowledge::classify_by_rules;
/// use innkeeper::models::QuestionCategory;
///
/// assert_eq!(classify_by_rules("What is the cancellation policy?"), QuestionCategory::Policies);
/// assert_eq!(classify_by_rules("hello there"), QuestionCategory::General);
/// ```
pub fn classify_by_rules(question: &str) -> QuestionCategory {
    let lowered = question.to_lowercase();
    RULES
        .iter()
        .find(|r| r.pattern.is_match(&lowered))
        .map(|r| r.category)
        .unwrap_or(QuestionCategory::General)
}

/// Reads a category from a model reply.
///
/// Only the first word counts, and only when it is an exact category label.
pub fn parse_category_reply(reply: &str) -> Option<QuestionCategory> {
    let first = reply
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .find(|t| !t.is_empty())?;
    QuestionCategory::from_label(&first.to_lowercase())
}

/// Builds the constrained classification prompt.
pub fn classification_prompt(question: &str) -> String {
    let labels = QuestionCategory::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Classify the hotel guest question below into exactly one category from this list: {labels}.\n\
         Reply with the single category word only.\n\n\
         Question: {question}"
    )
}

/// Classifies questions, preferring the model.
pub struct CategoryClassifier<'a> {
    generator: &'a dyn TextGenerator,
}

impl<'a> CategoryClassifier<'a> {
    /// Creates a classifier over a generator.
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self { generator }
    }

    /// Classifies a question. Never fails: model problems fall through to
    /// the keyword rules.
    pub async fn classify(&self, question: &str) -> Classification {
        match self.generator.generate(&classification_prompt(question)).await {
            Ok(reply) => {
                if let Some(category) = parse_category_reply(&reply) {
                    return Classification {
                        category,
                        source: ClassificationSource::Model,
                    };
                }
                debug!(reply = %reply, "Model reply is not a known category");
            }
            Err(e) => {
                warn!(error = %e, "Classification call failed, using keyword rules");
            }
        }

        Classification {
            category: classify_by_rules(question),
            source: ClassificationSource::Rules,
        }
    }
}
