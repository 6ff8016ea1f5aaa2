use crate::errors::ValidationError;
use crate::models::{NewEntry, SentimentLabel};
use chrono::NaiveDate;

/// Which input field receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Text,
    Date,
}

/// Input buffers and submission lifecycle for the entry form.
///
/// Validation is synchronous: a submit either aborts back to idle with a
/// [`ValidationError`] or enters the submitting state. While submitting,
/// further submits are ignored; the flag is cleared when the create call
/// resolves, success or failure.
#[derive(Debug)]
pub struct EntryForm {
    pub text: String,
    pub date: String,
    pub focus: Focus,
    submitting: bool,
    last_result: Option<(f64, SentimentLabel)>,
}

impl EntryForm {
    /// The date buffer defaults to the given day, normally today.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            text: String::new(),
            date: today.to_string(),
            focus: Focus::Text,
            submitting: false,
            last_result: None,
        }
    }

    /// Check the rules in order; the first failure wins. Validation never
    /// reaches the network layer.
    pub fn validate(&self) -> Result<NewEntry, ValidationError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyText);
        }
        if text.chars().count() < 5 {
            return Err(ValidationError::TextTooShort);
        }
        let date = self.date.trim();
        if date.is_empty() {
            return Err(ValidationError::MissingDate);
        }
        let date: NaiveDate = date.parse().map_err(|_| ValidationError::InvalidDate)?;
        Ok(NewEntry {
            text: text.to_string(),
            date,
        })
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn begin_submit(&mut self) {
        self.submitting = true;
        self.last_result = None;
    }

    /// Guaranteed cleanup path: clears the loading state whatever the
    /// outcome was. On success the text buffer is emptied (the date is
    /// kept); on failure the input stays intact so the user can retry.
    pub fn finish_submit(&mut self, result: Option<(f64, SentimentLabel)>) {
        self.submitting = false;
        if result.is_some() {
            self.text.clear();
            self.last_result = result;
        }
    }

    /// The score/label panel shown after a successful submission.
    pub fn last_result(&self) -> Option<(f64, SentimentLabel)> {
        self.last_result
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Text => Focus::Date,
            Focus::Date => Focus::Text,
        };
    }

    pub fn insert(&mut self, c: char) {
        match self.focus {
            Focus::Text => self.text.push(c),
            Focus::Date => self.date.push(c),
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Focus::Text => {
                self.text.pop();
            }
            Focus::Date => {
                self.date.pop();
            }
        }
    }
}
