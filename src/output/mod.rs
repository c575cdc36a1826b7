pub mod console;

pub use console::{format_analysis, format_notes, format_rankings};
