use thiserror::Error;

/// Failures from the API client. Non-2xx statuses are failures regardless
/// of body content; the body is kept for diagnostics only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("cannot reach the journal service: {0}")]
    Unreachable(String),

    #[error("journal service returned HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("journal service sent a malformed response: {0}")]
    BadResponse(String),
}

/// Client-side input rejection. Never reaches the network layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter some text for your journal entry.")]
    EmptyText,

    #[error("Please write at least 5 characters for better sentiment analysis.")]
    TextTooShort,

    #[error("Please select a date for your entry.")]
    MissingDate,

    #[error("Please enter the date as YYYY-MM-DD.")]
    InvalidDate,
}
