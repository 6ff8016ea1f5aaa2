use std::time::{Duration, Instant};

/// How long a message stays on screen.
pub const DISPLAY_WINDOW: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    id: u64,
    pub kind: NoticeKind,
    pub text: String,
    expires_at: Instant,
}

impl Notice {
    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Append-only stack of transient success/error messages. Concurrent
/// messages stack; each expires after [`DISPLAY_WINDOW`]. Removal is
/// idempotent, whether by expiry or explicit dismissal.
#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<Notice>,
    next_id: u64,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_success(&mut self, text: impl Into<String>, now: Instant) -> u64 {
        self.push(NoticeKind::Success, text.into(), now)
    }

    pub fn push_error(&mut self, text: impl Into<String>, now: Instant) -> u64 {
        self.push(NoticeKind::Error, text.into(), now)
    }

    fn push(&mut self, kind: NoticeKind, text: String, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Notice {
            id,
            kind,
            text,
            expires_at: now + DISPLAY_WINDOW,
        });
        id
    }

    /// Drop everything whose display window has passed.
    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|notice| notice.expires_at > now);
    }

    /// No-op when the notice is already gone.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|notice| notice.id != id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
