//! Terminal rendering of calculation outcomes and saved history.

pub mod card;
pub mod history_table;

pub use card::{format_brl, render_outcome, render_result};
pub use history_table::render_history;
