//! Dashboard module - HTTP surface of the dashboard

mod app;
mod control_panel;
mod page;

pub use app::{serve, AppState};
