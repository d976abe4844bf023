//! Charts module - per-interaction filtering and figure building

mod figure;
mod plotter;
mod selection;

pub use plotter::{ChartPlotter, Figures};
pub use selection::{Selection, NO_SELECTION};
