use crate::models::{JournalEntry, Stats};
use chrono::NaiveDate;

/// Rows shown in the recent-entries list.
pub const RECENT_LIMIT: usize = 5;

/// How the entry collection last fared. `Empty` and `Failed` render as
/// distinct placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntriesState {
    Loading,
    Loaded,
    Failed,
}

/// Single source of truth the renderers read from. Entries and stats are
/// wholly replaced on every successful fetch, never merged; the backend
/// owns both.
#[derive(Debug)]
pub struct JournalStore {
    entries: Vec<JournalEntry>,
    entries_state: EntriesState,
    stats: Stats,
}

impl Default for JournalStore {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            entries_state: EntriesState::Loading,
            stats: Stats::default(),
        }
    }
}

impl JournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_entries(&mut self, entries: Vec<JournalEntry>) {
        self.entries = entries;
        self.entries_state = EntriesState::Loaded;
    }

    /// A failed fetch falls back to an empty collection for rendering but
    /// keeps the failure visible as its own placeholder state.
    pub fn mark_entries_failed(&mut self) {
        self.entries.clear();
        self.entries_state = EntriesState::Failed;
    }

    pub fn replace_stats(&mut self, stats: Stats) {
        self.stats = stats;
    }

    /// Stats failures degrade to zeroed counters rather than blocking the
    /// rest of the render.
    pub fn zero_stats(&mut self) {
        self.stats = Stats::default();
    }

    pub fn entries_state(&self) -> EntriesState {
        self.entries_state
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// At most [`RECENT_LIMIT`] entries, in delivery order. No resort for
    /// the list view.
    pub fn recent(&self) -> &[JournalEntry] {
        &self.entries[..self.entries.len().min(RECENT_LIMIT)]
    }

    /// The full collection as a (date, sentiment) series sorted ascending
    /// by date. The sort is stable, so delivery order is preserved within
    /// a single date.
    pub fn chart_series(&self) -> Vec<(NaiveDate, f64)> {
        let mut series: Vec<(NaiveDate, f64)> = self
            .entries
            .iter()
            .map(|entry| (entry.date, entry.sentiment))
            .collect();
        series.sort_by_key(|(date, _)| *date);
        series
    }
}
