//! Terminal display utilities for the text listing.
//!
//! Provides styled tables and diagnostic lines.

pub mod tables;
pub mod theme;

pub use tables::{TableBuilder, create_declaration_table, create_summary_table};
pub use theme::{THEME, Theme};
