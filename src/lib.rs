pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod form;
pub mod models;
pub mod notify;
pub mod store;
pub mod ui;

pub use api::{HttpApi, SentimentApi};
pub use app::App;
pub use errors::{ApiError, ValidationError};
pub use models::{JournalEntry, SentimentLabel, Stats};
pub use store::JournalStore;
