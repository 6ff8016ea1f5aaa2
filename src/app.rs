use crate::api::SentimentApi;
use crate::errors::ApiError;
use crate::form::EntryForm;
use crate::models::{JournalEntry, NewEntry, Stats};
use crate::notify::Notices;
use crate::store::JournalStore;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

/// Completion messages from spawned network tasks, drained by the UI loop.
#[derive(Debug)]
pub enum AppMsg {
    HealthChecked(bool),
    EntriesLoaded(Result<Vec<JournalEntry>, ApiError>),
    StatsLoaded(Result<Stats, ApiError>),
    EntryCreated(Result<JournalEntry, ApiError>),
}

/// Follow-up work a handler asks the caller to start.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Reload,
    Submit(NewEntry),
}

pub fn channel() -> (UnboundedSender<AppMsg>, UnboundedReceiver<AppMsg>) {
    mpsc::unbounded_channel()
}

/// Spawns network calls and reports their results back over the message
/// channel. Each fetch is its own task, so a slow stats call never holds
/// up the entry list.
pub struct Remote<A> {
    api: A,
    tx: UnboundedSender<AppMsg>,
}

impl<A: SentimentApi + Clone + 'static> Remote<A> {
    pub fn new(api: A, tx: UnboundedSender<AppMsg>) -> Self {
        Self { api, tx }
    }

    pub fn check_health(&self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppMsg::HealthChecked(api.check_health().await));
        });
    }

    /// Fetch entries and stats concurrently; each updates only its own
    /// section when it lands.
    pub fn reload_all(&self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppMsg::EntriesLoaded(api.list_entries().await));
        });

        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppMsg::StatsLoaded(api.fetch_stats().await));
        });
    }

    pub fn submit(&self, entry: NewEntry) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppMsg::EntryCreated(api.create_entry(entry).await));
        });
    }
}

/// Everything the renderers read: the store, the form, and the toasts.
pub struct App {
    pub store: JournalStore,
    pub form: EntryForm,
    pub notices: Notices,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            store: JournalStore::new(),
            form: EntryForm::new(Local::now().date_naive()),
            notices: Notices::new(),
            should_quit: false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Effect {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                Effect::None
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                Effect::None
            }
            KeyCode::Tab => {
                self.form.toggle_focus();
                Effect::None
            }
            KeyCode::Backspace => {
                self.form.backspace();
                Effect::None
            }
            KeyCode::Enter => self.submit(now),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.insert(c);
                Effect::None
            }
            _ => Effect::None,
        }
    }

    /// Validate and, when the input passes, hand the request to the
    /// caller. While a submission is in flight further submits are
    /// ignored; that flag is the only guard against overlapping writes.
    fn submit(&mut self, now: Instant) -> Effect {
        if self.form.is_submitting() {
            return Effect::None;
        }
        match self.form.validate() {
            Ok(entry) => {
                self.form.begin_submit();
                Effect::Submit(entry)
            }
            Err(rule) => {
                self.notices.push_error(rule.to_string(), now);
                Effect::None
            }
        }
    }

    pub fn handle_msg(&mut self, msg: AppMsg, now: Instant) -> Effect {
        match msg {
            AppMsg::HealthChecked(healthy) => {
                if !healthy {
                    self.notices.push_error(
                        "Cannot connect to the journal service. Is the backend running?",
                        now,
                    );
                }
                Effect::None
            }
            AppMsg::EntriesLoaded(Ok(entries)) => {
                self.store.replace_entries(entries);
                Effect::None
            }
            AppMsg::EntriesLoaded(Err(err)) => {
                self.store.mark_entries_failed();
                self.notices.push_error(format!("Failed to load entries: {err}"), now);
                Effect::None
            }
            AppMsg::StatsLoaded(Ok(stats)) => {
                self.store.replace_stats(stats);
                Effect::None
            }
            AppMsg::StatsLoaded(Err(err)) => {
                // Degrade this section on its own; the list keeps rendering.
                warn!("failed to load stats: {err}");
                self.store.zero_stats();
                Effect::None
            }
            AppMsg::EntryCreated(Ok(entry)) => {
                self.form
                    .finish_submit(Some((entry.sentiment, entry.sentiment_label)));
                self.notices.push_success("Entry saved successfully!", now);
                Effect::Reload
            }
            AppMsg::EntryCreated(Err(err)) => {
                self.form.finish_submit(None);
                self.notices.push_error(format!("Failed to save entry: {err}"), now);
                Effect::None
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SentimentLabel;
    use crate::notify::NoticeKind;
    use crate::store::EntriesState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_entry() -> JournalEntry {
        JournalEntry {
            id: 1,
            text: "Had a wonderful day!".to_string(),
            date: "2024-05-01".parse().unwrap(),
            sentiment: 0.8,
            sentiment_label: SentimentLabel::Positive,
            created_at: None,
        }
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut app = App::new();
        let now = Instant::now();
        app.handle_key(key(KeyCode::Char('h')), now);
        app.handle_key(key(KeyCode::Char('i')), now);
        assert_eq!(app.form.text, "hi");

        app.handle_key(key(KeyCode::Tab), now);
        app.handle_key(key(KeyCode::Backspace), now);
        assert_eq!(app.form.text, "hi");
        assert!(!app.form.date.is_empty());
    }

    #[test]
    fn invalid_submit_notifies_without_a_request() {
        let mut app = App::new();
        app.form.text = "hey".to_string();
        let effect = app.handle_key(key(KeyCode::Enter), Instant::now());
        assert_eq!(effect, Effect::None);
        assert!(!app.form.is_submitting());
        let notice = app.notices.iter().next().expect("validation notice");
        assert_eq!(notice.kind, NoticeKind::Error);
    }

    #[test]
    fn valid_submit_enters_submitting_and_ignores_repeats() {
        let mut app = App::new();
        app.form.text = "Had a wonderful day!".to_string();
        let now = Instant::now();

        match app.handle_key(key(KeyCode::Enter), now) {
            Effect::Submit(entry) => assert_eq!(entry.text, "Had a wonderful day!"),
            other => panic!("expected submit effect, got {other:?}"),
        }
        assert!(app.form.is_submitting());

        // The advisory lock: a second Enter does nothing while in flight.
        assert_eq!(app.handle_key(key(KeyCode::Enter), now), Effect::None);
    }

    #[test]
    fn successful_create_shows_result_and_reloads() {
        let mut app = App::new();
        app.form.text = "Had a wonderful day!".to_string();
        let now = Instant::now();
        app.handle_key(key(KeyCode::Enter), now);

        let effect = app.handle_msg(AppMsg::EntryCreated(Ok(sample_entry())), now);
        assert_eq!(effect, Effect::Reload);
        assert!(!app.form.is_submitting());
        assert!(app.form.text.is_empty());
        assert_eq!(app.form.last_result(), Some((0.8, SentimentLabel::Positive)));
        assert!(app.notices.iter().any(|n| n.kind == NoticeKind::Success));
    }

    #[test]
    fn failed_create_keeps_input_for_retry() {
        let mut app = App::new();
        app.form.text = "Had a wonderful day!".to_string();
        let now = Instant::now();
        app.handle_key(key(KeyCode::Enter), now);

        let err = ApiError::RequestFailed {
            status: 500,
            body: "boom".to_string(),
        };
        let effect = app.handle_msg(AppMsg::EntryCreated(Err(err)), now);
        assert_eq!(effect, Effect::None);
        assert!(!app.form.is_submitting());
        assert_eq!(app.form.text, "Had a wonderful day!");
        assert!(app.notices.iter().any(|n| n.kind == NoticeKind::Error));
    }

    #[test]
    fn stats_failure_does_not_touch_the_entry_list() {
        let mut app = App::new();
        let now = Instant::now();
        app.handle_msg(AppMsg::EntriesLoaded(Ok(vec![sample_entry()])), now);
        app.handle_msg(
            AppMsg::StatsLoaded(Err(ApiError::Unreachable("refused".to_string()))),
            now,
        );

        assert_eq!(app.store.entries_state(), EntriesState::Loaded);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.stats().total_entries, 0);
    }

    #[test]
    fn entries_failure_is_surfaced_and_distinct() {
        let mut app = App::new();
        let now = Instant::now();
        app.handle_msg(
            AppMsg::EntriesLoaded(Err(ApiError::Unreachable("refused".to_string()))),
            now,
        );
        assert_eq!(app.store.entries_state(), EntriesState::Failed);
        assert!(app.notices.iter().any(|n| n.kind == NoticeKind::Error));
    }

    #[test]
    fn failed_health_probe_warns_the_user() {
        let mut app = App::new();
        let now = Instant::now();
        app.handle_msg(AppMsg::HealthChecked(false), now);
        assert_eq!(app.notices.len(), 1);

        app.handle_msg(AppMsg::HealthChecked(true), now);
        assert_eq!(app.notices.len(), 1);
    }

    #[test]
    fn escape_quits() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Esc), Instant::now());
        assert!(app.should_quit);
    }

    mod remote {
        use super::*;
        use crate::api::SentimentApi;
        use std::future::Future;

        /// In-memory stand-in for the journal service.
        #[derive(Clone)]
        struct FakeApi {
            entries: Vec<JournalEntry>,
            fail_stats: bool,
        }

        impl SentimentApi for FakeApi {
            fn check_health(&self) -> impl Future<Output = bool> + Send {
                async { true }
            }

            fn create_entry(
                &self,
                entry: NewEntry,
            ) -> impl Future<Output = Result<JournalEntry, ApiError>> + Send {
                async move {
                    Ok(JournalEntry {
                        id: 99,
                        text: entry.text,
                        date: entry.date,
                        sentiment: 0.8,
                        sentiment_label: SentimentLabel::Positive,
                        created_at: None,
                    })
                }
            }

            fn list_entries(
                &self,
            ) -> impl Future<Output = Result<Vec<JournalEntry>, ApiError>> + Send {
                let entries = self.entries.clone();
                async move { Ok(entries) }
            }

            fn fetch_stats(&self) -> impl Future<Output = Result<Stats, ApiError>> + Send {
                let fail = self.fail_stats;
                async move {
                    if fail {
                        Err(ApiError::Unreachable("refused".to_string()))
                    } else {
                        Ok(Stats {
                            total_entries: 1,
                            positive_count: 1,
                            ..Stats::default()
                        })
                    }
                }
            }
        }

        async fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppMsg>, n: usize) -> Vec<AppMsg> {
            let mut out = Vec::with_capacity(n);
            for _ in 0..n {
                out.push(rx.recv().await.expect("message"));
            }
            out
        }

        #[tokio::test]
        async fn reload_delivers_both_sections_independently() {
            let (tx, mut rx) = channel();
            let remote = Remote::new(
                FakeApi {
                    entries: vec![sample_entry()],
                    fail_stats: true,
                },
                tx,
            );

            remote.reload_all();
            let msgs = drain(&mut rx, 2).await;

            let mut app = App::new();
            let now = Instant::now();
            for msg in msgs {
                app.handle_msg(msg, now);
            }

            // Partial failure: the list arrived, stats fell back to zero.
            assert_eq!(app.store.len(), 1);
            assert_eq!(app.store.entries_state(), EntriesState::Loaded);
            assert_eq!(app.store.stats().total_entries, 0);
        }

        #[tokio::test]
        async fn submit_round_trips_through_the_channel() {
            let (tx, mut rx) = channel();
            let remote = Remote::new(
                FakeApi {
                    entries: Vec::new(),
                    fail_stats: false,
                },
                tx,
            );

            remote.submit(NewEntry {
                text: "Had a wonderful day!".to_string(),
                date: "2024-05-01".parse().unwrap(),
            });

            match rx.recv().await.expect("created message") {
                AppMsg::EntryCreated(Ok(entry)) => {
                    assert_eq!(entry.sentiment_label, SentimentLabel::Positive);
                }
                other => panic!("unexpected message: {other:?}"),
            }
        }
    }
}
