//! Command handling
//!
//! [`handle`] applies one command to the session state, re-reads the
//! watchlist, resolves every ticker and builds the detail view for the
//! selected ticker. Failures never abort the call; they surface as notices
//! scoped to the row or panel they concern.

use super::state::{AppState, Services};
use super::view::{DescriptionView, DetailView, Notice, RowStatus, View, WatchlistRow};
use crate::chart::PriceChart;
use crate::interface::Command;
use crate::lookup::QuoteSnapshot;
use crate::ticker::Ticker;
use crate::translate::Language;
use chrono::Utc;
use tracing::{debug, info, warn};

/// Apply `command` to `state` and build the resulting view
pub async fn handle(
    mut state: AppState,
    command: Command,
    services: &Services<'_>,
) -> (AppState, View) {
    let mut view = View::bare(state.store.kind(), state.store.capacity());

    match command {
        Command::Help => {
            view.show_help = true;
            return (state, view);
        }
        Command::Exit => {
            view.exit = true;
            return (state, view);
        }
        Command::Add { input } => match state.store.add(&input).await {
            Ok(outcome) => {
                debug!(?outcome, "Add handled");
                view.notices.extend(Notice::from_add(outcome));
            }
            Err(e) => view.notices.push(Notice::StorageFailed(e.to_string())),
        },
        Command::Remove { input } => match state.store.remove(&input).await {
            Ok(outcome) => {
                if let Some(ticker) = outcome.ticker() {
                    if state.selected.as_ref() == Some(ticker) {
                        state.selected = None;
                    }
                    view.notices.push(Notice::Removed(ticker.clone()));
                }
            }
            Err(e) => view.notices.push(Notice::StorageFailed(e.to_string())),
        },
        Command::View { input } => select(&mut state, &input, &mut view).await,
        Command::Close => {
            if state.selected.take().is_some() {
                view.notices.push(Notice::SelectionClosed);
            }
        }
        Command::List => {}
        Command::Clear => match state.store.clear().await {
            Ok(()) => {
                state.selected = None;
                view.notices.push(Notice::Cleared);
            }
            Err(e) => view.notices.push(Notice::StorageFailed(e.to_string())),
        },
    }

    let resolved = refresh(&mut state, services, &mut view).await;

    if let Some(selected) = state.selected.clone() {
        match resolved.into_iter().find(|(row, _)| row.ticker == selected) {
            Some((row, snapshot)) => {
                view.detail = Some(build_detail(row, snapshot.as_ref(), services).await);
            }
            None => {
                debug!(%selected, "Selected ticker left the watchlist");
                state.selected = None;
            }
        }
    }

    if let Some(rows) = view.rows.as_mut() {
        for row in rows.iter_mut() {
            row.selected = state.selected.as_ref() == Some(&row.ticker);
        }
    }
    if let Some(detail) = view.detail.as_mut() {
        detail.row.selected = true;
    }

    (state, view)
}

async fn select(state: &mut AppState, input: &str, view: &mut View) {
    let Some(ticker) = Ticker::parse(input) else {
        return;
    };

    match state.store.list().await {
        Ok(tickers) if tickers.contains(&ticker) => {
            view.notices.push(Notice::Selected(ticker.clone()));
            state.selected = Some(ticker);
        }
        Ok(_) => view.notices.push(Notice::NotInWatchlist(ticker)),
        Err(e) => view.notices.push(Notice::StorageFailed(e.to_string())),
    }
}

/// Resolve every ticker on the watchlist, purging unknown ones when enabled
async fn refresh(
    state: &mut AppState,
    services: &Services<'_>,
    view: &mut View,
) -> Vec<(WatchlistRow, Option<QuoteSnapshot>)> {
    let tickers = match state.store.list().await {
        Ok(tickers) => tickers,
        Err(e) => {
            view.notices.push(Notice::StorageFailed(e.to_string()));
            view.rows = Some(Vec::new());
            return Vec::new();
        }
    };

    let mut resolved = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        match services.lookup.snapshot(&ticker).await {
            Ok(snapshot) => {
                let row = WatchlistRow::from_snapshot(ticker, &snapshot);
                resolved.push((row, Some(snapshot)));
            }
            Err(e) if e.is_unresolvable() && services.settings.purge_invalid => {
                match state.store.purge_invalid(&ticker).await {
                    Ok(_) => {
                        info!(%ticker, "Purged unknown ticker");
                        view.notices.push(Notice::Purged(ticker));
                    }
                    Err(store_err) => {
                        view.notices.push(Notice::StorageFailed(store_err.to_string()));
                        let row = WatchlistRow::placeholder(ticker, RowStatus::Invalid);
                        resolved.push((row, None));
                    }
                }
            }
            Err(e) if e.is_unresolvable() => {
                view.notices.push(Notice::LookupFailed {
                    ticker: ticker.clone(),
                    reason: e.to_string(),
                });
                resolved.push((WatchlistRow::placeholder(ticker, RowStatus::Invalid), None));
            }
            Err(e) => {
                warn!(%ticker, error = %e, "Quote lookup failed");
                view.notices.push(Notice::LookupFailed {
                    ticker: ticker.clone(),
                    reason: e.to_string(),
                });
                let status = RowStatus::Failed(e.to_string());
                resolved.push((WatchlistRow::placeholder(ticker, status), None));
            }
        }
    }

    view.rows = Some(resolved.iter().map(|(row, _)| row.clone()).collect());
    resolved
}

async fn build_detail(
    row: WatchlistRow,
    snapshot: Option<&QuoteSnapshot>,
    services: &Services<'_>,
) -> DetailView {
    let settings = services.settings;
    let mut detail = DetailView {
        row,
        period: settings.history_period,
        chart: None,
        history_error: None,
        description: DescriptionView::Missing,
    };

    if !detail.row.is_resolved() {
        detail.history_error = match &detail.row.status {
            RowStatus::Failed(reason) => Some(reason.clone()),
            _ => Some(format!("'{}' is unknown to the quote source", detail.row.ticker)),
        };
        return detail;
    }

    match services.lookup.history(&detail.row.ticker, settings.history_period).await {
        Ok(history) => {
            let today = Utc::now().date_naive();
            let window = history.within(settings.history_period, today);
            detail.chart = Some(PriceChart::from_history(&window, settings.chart_width));
        }
        Err(e) => {
            warn!(ticker = %detail.row.ticker, error = %e, "Price history unavailable");
            detail.history_error = Some(e.to_string());
        }
    }

    let description = snapshot
        .and_then(|s| s.description.as_deref())
        .filter(|text| !text.trim().is_empty());
    let fetch_error = snapshot.and_then(|s| s.description_error.as_deref());

    detail.description = match (description, fetch_error) {
        (Some(text), _) => match services
            .translator
            .translate(text, &Language::Auto, &settings.target_language)
            .await
        {
            Ok(translated) => DescriptionView::Translated {
                text: translated,
                language: settings.target_language.clone(),
            },
            Err(e) => {
                warn!(ticker = %detail.row.ticker, error = %e, "Translation failed");
                DescriptionView::Failed(e.to_string())
            }
        },
        (None, Some(reason)) => DescriptionView::Failed(reason.to_string()),
        (None, None) => DescriptionView::Missing,
    };

    detail
}
