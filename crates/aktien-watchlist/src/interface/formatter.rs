//! Terminal rendering of engine views

use super::commands::Command;
use crate::engine::{DescriptionView, DetailView, Notice, RowStatus, Severity, View, WatchlistRow};
use crate::watchlist::StoreKind;
use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{Cell, ContentArrangement, Table};

const DESCRIPTION_WIDTH: usize = 76;

/// Renders a [`View`] as plain terminal text
#[derive(Debug, Clone)]
pub struct CliFormatter {
    preset: &'static str,
    symbols: bool,
}

impl Default for CliFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CliFormatter {
    /// Box-drawing table with status symbols
    pub fn new() -> Self {
        Self {
            preset: UTF8_FULL,
            symbols: true,
        }
    }

    /// ASCII-only output for terminals without Unicode support
    pub fn plain() -> Self {
        Self {
            preset: ASCII_FULL,
            symbols: false,
        }
    }

    pub fn format_view(&self, view: &View) -> String {
        let mut sections = Vec::new();

        if !view.notices.is_empty() {
            sections.push(
                view.notices
                    .iter()
                    .map(|n| self.format_notice(n))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }

        if let Some(rows) = &view.rows {
            sections.push(self.format_rows(rows, view.store_kind, view.capacity));
        }

        if let Some(detail) = &view.detail {
            sections.push(self.format_detail(detail));
        }

        if view.show_help {
            sections.push(self.format_help());
        }

        if view.exit {
            sections.push("Auf Wiedersehen!".to_string());
        }

        sections.join("\n\n")
    }

    pub fn format_notice(&self, notice: &Notice) -> String {
        let prefix = match (notice.severity(), self.symbols) {
            (Severity::Success, true) => "✅",
            (Severity::Info, true) => "ℹ️ ",
            (Severity::Warning, true) => "⚠️ ",
            (Severity::Error, true) => "❌",
            (Severity::Success, false) => "[ok]",
            (Severity::Info, false) => "[info]",
            (Severity::Warning, false) => "[warn]",
            (Severity::Error, false) => "[error]",
        };
        format!("{prefix} {}", notice.message())
    }

    pub fn format_error(&self, error: &str) -> String {
        self.format_notice(&Notice::CommandFailed(format!("Error: {error}")))
    }

    pub fn format_help(&self) -> String {
        Command::help_text().trim().to_string()
    }

    fn format_rows(
        &self,
        rows: &[WatchlistRow],
        kind: StoreKind,
        capacity: Option<usize>,
    ) -> String {
        let footer = match (kind, capacity) {
            (StoreKind::Memory, Some(cap)) => {
                format!("{} / {cap} Einträge (session only)", rows.len())
            }
            _ => format!("{} Einträge ({kind})", rows.len()),
        };

        if rows.is_empty() {
            return format!("Die Watchlist ist leer. Add a ticker with /add <ticker>.\n{footer}");
        }

        let mut table = Table::new();
        table
            .load_preset(self.preset)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["", "Ticker", "Unternehmen", "Preis", "Status"]);

        for row in rows {
            let marker = match (row.selected, self.symbols) {
                (true, true) => "▶",
                (true, false) => ">",
                (false, _) => "",
            };
            table.add_row(vec![
                Cell::new(marker),
                Cell::new(row.ticker.as_str()),
                Cell::new(row.display_name()),
                Cell::new(row.display_price()),
                Cell::new(status_label(&row.status)),
            ]);
        }

        format!("{table}\n{footer}")
    }

    fn format_detail(&self, detail: &DetailView) -> String {
        let row = &detail.row;
        let mut lines = vec![
            format!("{} · {}", row.ticker, row.display_name()),
            format!("Kurs: {}", row.display_price()),
            String::new(),
        ];

        match (&detail.chart, &detail.history_error) {
            (Some(chart), _) if !chart.is_empty() => {
                let range = match (chart.start, chart.end) {
                    (Some(start), Some(end)) => format!(" {start} – {end}"),
                    _ => String::new(),
                };
                lines.push(format!("Verlauf ({}){range}", detail.period));
                if self.symbols {
                    lines.push(chart.sparkline.clone());
                }
                if let Some(stats) = chart.stats {
                    lines.push(format!(
                        "Start {:.2}  Ende {:.2}  Min {:.2}  Max {:.2}  ({:+.2}%)",
                        stats.first,
                        stats.last,
                        stats.min,
                        stats.max,
                        stats.change_percent()
                    ));
                }
            }
            (_, Some(error)) => lines.push(format!("Verlauf nicht verfügbar: {error}")),
            _ => lines.push(format!("Keine Kursdaten für {}", detail.period)),
        }

        lines.push(String::new());
        match &detail.description {
            DescriptionView::Translated { text, language } => {
                lines.push(format!("Beschreibung ({language}):"));
                lines.extend(wrap(text, DESCRIPTION_WIDTH));
            }
            DescriptionView::Missing => lines.push("Keine Beschreibung verfügbar".to_string()),
            DescriptionView::Failed(reason) => {
                lines.push(format!("Beschreibung nicht verfügbar: {reason}"));
            }
        }

        lines.join("\n")
    }
}

fn status_label(status: &RowStatus) -> &'static str {
    match status {
        RowStatus::Complete => "ok",
        RowStatus::Partial => "unvollständig",
        RowStatus::Invalid => "unbekannt",
        RowStatus::Failed(_) => "Fehler",
    }
}

/// Greedy word wrap
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PriceChart;
    use crate::lookup::{HistoryPeriod, PriceHistory, PricePoint, QuoteSnapshot};
    use crate::ticker::Ticker;
    use crate::translate::Language;
    use chrono::NaiveDate;

    fn ticker(s: &str) -> Ticker {
        Ticker::parse(s).unwrap()
    }

    fn empty_view() -> View {
        View {
            notices: Vec::new(),
            rows: Some(Vec::new()),
            detail: None,
            store_kind: StoreKind::Memory,
            capacity: Some(10),
            show_help: false,
            exit: false,
        }
    }

    fn apple_row() -> WatchlistRow {
        let snapshot = QuoteSnapshot {
            company_name: Some("Apple Inc.".to_string()),
            current_price: Some(189.5),
            currency: Some("USD".to_string()),
            ..Default::default()
        };
        WatchlistRow::from_snapshot(ticker("AAPL"), &snapshot)
    }

    #[test]
    fn test_empty_watchlist_hint() {
        let out = CliFormatter::new().format_view(&empty_view());
        assert!(out.contains("Die Watchlist ist leer"));
        assert!(out.contains("0 / 10"));
    }

    #[test]
    fn test_table_rows_and_placeholders() {
        let mut view = empty_view();
        let mut selected = apple_row();
        selected.selected = true;
        view.rows = Some(vec![
            selected,
            WatchlistRow::placeholder(ticker("XXXX"), RowStatus::Invalid),
        ]);

        let out = CliFormatter::new().format_view(&view);
        assert!(out.contains("Apple Inc."));
        assert!(out.contains("189.50 USD"));
        assert!(out.contains("Unbekannt"));
        assert!(out.contains("—"));
        assert!(out.contains("▶"));
        assert!(out.contains("2 / 10"));
    }

    #[test]
    fn test_notice_prefixes() {
        let formatter = CliFormatter::plain();
        assert_eq!(
            formatter.format_notice(&Notice::Added(ticker("MSFT"))),
            "[ok] 'MSFT' added to the watchlist"
        );
        assert!(formatter
            .format_notice(&Notice::StorageFailed("locked".into()))
            .starts_with("[error]"));
        assert!(formatter.format_error("Unknown command: /x").contains("Unknown command"));
    }

    #[test]
    fn test_detail_panel() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let history = PriceHistory::new(vec![
            PricePoint { date: day(1), close: 100.0 },
            PricePoint { date: day(4), close: 110.0 },
        ]);
        let mut view = empty_view();
        view.detail = Some(DetailView {
            row: apple_row(),
            period: HistoryPeriod::OneMonth,
            chart: Some(PriceChart::from_history(&history, 20)),
            history_error: None,
            description: DescriptionView::Translated {
                text: "Apple entwickelt Smartphones.".to_string(),
                language: Language::German,
            },
        });

        let out = CliFormatter::new().format_view(&view);
        assert!(out.contains("Verlauf (1mo) 2024-03-01 – 2024-03-04"));
        assert!(out.contains("▁█"));
        assert!(out.contains("+10.00%"));
        assert!(out.contains("Beschreibung (German):"));
        assert!(out.contains("Apple entwickelt Smartphones."));
    }

    #[test]
    fn test_detail_translation_failure() {
        let mut view = empty_view();
        view.detail = Some(DetailView {
            row: apple_row(),
            period: HistoryPeriod::OneYear,
            chart: None,
            history_error: Some("no data".to_string()),
            description: DescriptionView::Failed("HTTP 429".to_string()),
        });

        let out = CliFormatter::plain().format_view(&view);
        assert!(out.contains("Verlauf nicht verfügbar: no data"));
        assert!(out.contains("Beschreibung nicht verfügbar: HTTP 429"));
    }

    #[test]
    fn test_help_view_has_no_table() {
        let mut view = empty_view();
        view.rows = None;
        view.show_help = true;
        let out = CliFormatter::new().format_view(&view);
        assert!(out.contains("/remove <ticker>"));
        assert!(!out.contains("Die Watchlist ist leer"));
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert!(wrap("", 10).is_empty());
    }
}
