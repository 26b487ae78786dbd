//! Session engine
//!
//! Each user command is handled by [`handle`], which takes the session
//! state by value and returns it together with the [`View`] to render.

mod handler;
mod state;
mod view;

pub use handler::handle;
pub use state::{AppState, EngineSettings, Services};
pub use view::{
    DescriptionView, DetailView, MISSING_PRICE, Notice, RowStatus, Severity, UNKNOWN_NAME, View,
    WatchlistRow,
};
