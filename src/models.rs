use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment category assigned by the backend. The client never recomputes
/// it from the score, only displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        };
        f.write_str(text)
    }
}

/// One journal entry as returned by the backend. Read-only after creation;
/// the backend owns identity and sentiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub text: String,
    pub date: NaiveDate,
    pub sentiment: f64,
    pub sentiment_label: SentimentLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Body of a create-entry request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub text: String,
    pub date: NaiveDate,
}

/// Aggregate counts, recomputed server-side on every fetch. Counters absent
/// from the payload read as 0; `avg_sentiment` is delivered by the backend
/// but not rendered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    #[serde(default)]
    pub total_entries: u64,
    #[serde(default)]
    pub positive_count: u64,
    #[serde(default)]
    pub negative_count: u64,
    #[serde(default)]
    pub neutral_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_sentiment: Option<f64>,
}
