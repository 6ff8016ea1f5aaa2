use crate::app::App;
use crate::form::Focus;
use crate::models::SentimentLabel;
use crate::notify::NoticeKind;
use crate::store::EntriesState;
use chrono::NaiveDate;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, List, ListItem, Paragraph},
};

/// Contractual sentiment range; the chart never rescales to the data.
pub const SENTIMENT_BOUNDS: [f64; 2] = [-1.0, 1.0];

/// List rows show at most this many characters of text.
pub const PREVIEW_LIMIT: usize = 100;

pub fn draw(f: &mut Frame, app: &App) {
    let notice_height = (app.notices.len() as u16).min(3);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(notice_height + 1),
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_form(f, chunks[1], app);
    render_stats(f, chunks[2], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);
    render_entries(f, columns[0], app);
    render_chart(f, columns[1], app);

    render_footer(f, chunks[4], app);
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Line::from(Span::styled(
        "Mood Journal",
        Style::default()
            .fg(Color::LightCyan)
            .add_modifier(Modifier::BOLD),
    ));
    f.render_widget(Paragraph::new(title).alignment(Alignment::Center), area);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let marker = if focused { "\u{258e} " } else { "  " };
    let style = if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::Cyan)),
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(value, style),
        Span::styled(if focused { "_" } else { "" }, Style::default().fg(Color::Cyan)),
    ])
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" New Entry ");

    let status = if app.form.is_submitting() {
        Line::from(Span::styled(
            "Analyzing sentiment...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some((score, label)) = app.form.last_result() {
        Line::from(vec![
            Span::raw("Sentiment: "),
            Span::styled(
                format_score(score),
                Style::default()
                    .fg(label_color(label))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(label.to_string(), Style::default().fg(label_color(label))),
        ])
    } else {
        Line::from(Span::styled(
            "How was your day?",
            Style::default().fg(Color::DarkGray),
        ))
    };

    let lines = vec![
        field_line("Text", &app.form.text, app.form.focus == Focus::Text),
        field_line("Date", &app.form.date, app.form.focus == Focus::Date),
        status,
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.store.stats();
    let panels = [
        ("Total", stats.total_entries, Color::White),
        ("Positive", stats.positive_count, Color::Green),
        ("Negative", stats.negative_count, Color::Red),
        ("Neutral", stats.neutral_count, Color::Yellow),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value, color), chunk) in panels.into_iter().zip(chunks.iter()) {
        let widget = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(format!(" {label} ")));
        f.render_widget(widget, *chunk);
    }
}

fn render_entries(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Recent Entries ");

    let placeholder = match app.store.entries_state() {
        EntriesState::Loading => Some("Loading entries..."),
        EntriesState::Failed => Some("Unable to load entries. Please check if the server is running."),
        EntriesState::Loaded if app.store.is_empty() => {
            Some("No entries yet. Write your first journal entry!")
        }
        EntriesState::Loaded => None,
    };

    if let Some(text) = placeholder {
        let widget = Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray)))
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(widget, area);
        return;
    }

    let items: Vec<ListItem> = app
        .store
        .recent()
        .iter()
        .map(|entry| {
            let header = Line::from(vec![
                Span::styled(date_label(entry.date), Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(
                    format!(
                        "{} ({})",
                        entry.sentiment_label,
                        format_score(entry.sentiment)
                    ),
                    Style::default().fg(label_color(entry.sentiment_label)),
                ),
            ]);
            let body = Line::from(Span::raw(truncate_preview(&entry.text)));
            ListItem::new(vec![header, body])
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Mood Over Time ");

    let series = app.store.chart_series();
    if series.is_empty() {
        let widget = Paragraph::new(Span::styled(
            "No data to chart yet",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block)
        .alignment(Alignment::Center);
        f.render_widget(widget, area);
        return;
    }

    let points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, (_, sentiment))| (i as f64, *sentiment))
        .collect();

    let first = date_label(series[0].0);
    let last = date_label(series[series.len() - 1].0);
    let x_max = (points.len() as f64 - 1.0).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name("Sentiment Score")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::LightBlue))
            .data(&points),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(vec![Line::from(first), Line::from(last)]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds(SENTIMENT_BOUNDS)
                .labels(vec![
                    Line::from("Negative"),
                    Line::from("Neutral"),
                    Line::from("Positive"),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = app
        .notices
        .iter()
        .map(|notice| {
            let color = match notice.kind {
                NoticeKind::Success => Color::Green,
                NoticeKind::Error => Color::Red,
            };
            Line::from(Span::styled(notice.text.clone(), Style::default().fg(color)))
        })
        .collect();
    lines.push(Line::from(Span::styled(
        "Tab switch field \u{2022} Enter save \u{2022} Esc quit",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(Paragraph::new(lines), area);
}

/// First [`PREVIEW_LIMIT`] characters plus an ellipsis marker; shorter
/// text passes through unmodified.
pub fn truncate_preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_LIMIT {
        return text.to_string();
    }
    let mut preview: String = text.chars().take(PREVIEW_LIMIT).collect();
    preview.push_str("...");
    preview
}

/// Scores always display with exactly two decimal places.
pub fn format_score(score: f64) -> String {
    format!("{score:.2}")
}

/// Human-readable date for list rows and chart labels, e.g. "May 01".
pub fn date_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

fn label_color(label: SentimentLabel) -> Color {
    match label {
        SentimentLabel::Positive => Color::Green,
        SentimentLabel::Negative => Color::Red,
        SentimentLabel::Neutral => Color::Yellow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JournalEntry, Stats};
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn draw_app(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| draw(f, app)).expect("draw");
        buffer_text(&terminal)
    }

    fn entry(id: i64, date: &str, sentiment: f64, label: SentimentLabel, text: &str) -> JournalEntry {
        JournalEntry {
            id,
            text: text.to_string(),
            date: date.parse().unwrap(),
            sentiment,
            sentiment_label: label,
            created_at: None,
        }
    }

    #[test]
    fn short_text_is_untouched() {
        let text = "a".repeat(100);
        assert_eq!(truncate_preview(&text), text);
    }

    #[test]
    fn long_text_keeps_exactly_one_hundred_characters() {
        let text = "a".repeat(101);
        let preview = truncate_preview(&text);
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
        assert_eq!(&preview[..100], &text[..100]);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "\u{00e9}".repeat(150);
        let preview = truncate_preview(&text);
        assert_eq!(preview.chars().count(), 103);
    }

    #[test]
    fn scores_render_with_two_decimals() {
        assert_eq!(format_score(0.8), "0.80");
        assert_eq!(format_score(-1.0), "-1.00");
        assert_eq!(format_score(0.125), "0.12");
    }

    #[test]
    fn date_labels_are_human_readable() {
        assert_eq!(date_label("2024-05-01".parse().unwrap()), "May 01");
    }

    #[test]
    fn chart_domain_is_the_contractual_range() {
        assert_eq!(SENTIMENT_BOUNDS, [-1.0, 1.0]);
    }

    #[test]
    fn empty_store_renders_the_no_entries_placeholder() {
        let mut app = App::new();
        app.store.replace_entries(Vec::new());
        let screen = draw_app(&app);
        assert!(screen.contains("No entries yet"));
        assert!(screen.contains("No data to chart yet"));
    }

    #[test]
    fn failed_load_renders_a_distinct_placeholder() {
        let mut app = App::new();
        app.store.mark_entries_failed();
        let screen = draw_app(&app);
        assert!(screen.contains("Unable to load entries"));
        assert!(!screen.contains("No entries yet"));
    }

    #[test]
    fn loaded_entries_render_label_and_score() {
        let mut app = App::new();
        app.store.replace_entries(vec![entry(
            1,
            "2024-05-01",
            0.8,
            SentimentLabel::Positive,
            "Had a wonderful day!",
        )]);
        app.store.replace_stats(Stats {
            total_entries: 1,
            positive_count: 1,
            ..Stats::default()
        });
        let screen = draw_app(&app);
        assert!(screen.contains("Positive (0.80)"));
        assert!(screen.contains("Had a wonderful day!"));
        assert!(screen.contains("May 01"));
    }

    #[test]
    fn result_panel_shows_score_and_label() {
        let mut app = App::new();
        app.form.begin_submit();
        app.form.finish_submit(Some((0.8, SentimentLabel::Positive)));
        let screen = draw_app(&app);
        assert!(screen.contains("0.80"));
        assert!(screen.contains("Positive"));
    }

    #[test]
    fn submitting_state_shows_the_loading_indicator() {
        let mut app = App::new();
        app.form.begin_submit();
        let screen = draw_app(&app);
        assert!(screen.contains("Analyzing sentiment..."));
    }

    #[test]
    fn notices_appear_in_the_footer() {
        let mut app = App::new();
        app.notices
            .push_error("Failed to save entry", std::time::Instant::now());
        let screen = draw_app(&app);
        assert!(screen.contains("Failed to save entry"));
    }
}
