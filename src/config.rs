use std::env;
use std::time::Duration;

/// Default base URL of the sentiment service.
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// How often the event loop wakes up to drain messages and redraw.
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Startup readiness probe: attempts and delay between them.
pub const HEALTH_ATTEMPTS: u32 = 5;
pub const HEALTH_DELAY: Duration = Duration::from_millis(200);

/// Base URL of the journal service, from `MOODLOG_API_URL` when set.
pub fn resolve_api_url() -> String {
    match env::var("MOODLOG_API_URL") {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => DEFAULT_API_URL.to_string(),
    }
}
