//! Table formatting utilities for structured output.

use crate::indexing::FileListing;
use crate::types::{AccessLevel, DeclarationRecord};
use comfy_table::{Attribute, Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

/// Builder for creating formatted tables.
pub struct TableBuilder {
    table: Table,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    /// Create a new table builder.
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.apply_modifier(UTF8_ROUND_CORNERS);
        Self { table }
    }

    /// Set the table headers.
    pub fn set_headers(mut self, headers: Vec<&str>) -> Self {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect();
        self.table.set_header(header_cells);
        self
    }

    /// Add a row to the table.
    pub fn add_row(mut self, row: Vec<String>) -> Self {
        self.table.add_row(row);
        self
    }

    /// Add a row of prepared cells.
    pub fn add_cells(mut self, row: Vec<Cell>) -> Self {
        self.table.add_row(row);
        self
    }

    /// Build and return the formatted table.
    pub fn build(self) -> String {
        self.table.to_string()
    }
}

fn access_cell(access: AccessLevel, colors: bool) -> Cell {
    let cell = Cell::new(access);
    if !colors {
        return cell;
    }
    match access {
        AccessLevel::Public => cell.fg(Color::Green),
        AccessLevel::Protected => cell.fg(Color::Yellow),
        AccessLevel::Private => cell.fg(Color::Red),
        AccessLevel::Unspecified => cell,
    }
}

/// One row per declaration: position, kind, qualified name, access,
/// signature and modifiers.
pub fn create_declaration_table(records: &[DeclarationRecord], colors: bool) -> String {
    let mut builder =
        TableBuilder::new().set_headers(vec!["Line", "Kind", "Name", "Access", "Signature", "Modifiers"]);

    for record in records {
        let access = if record.access == AccessLevel::Unspecified {
            Cell::new("")
        } else {
            access_cell(record.access, colors)
        };
        let mut name = Cell::new(record.qualified_name());
        if colors {
            name = name.add_attribute(Attribute::Bold);
        }
        builder = builder.add_cells(vec![
            Cell::new(format!("{}:{}", record.line, record.column)),
            Cell::new(record.kind),
            name,
            access,
            Cell::new(record.signature()),
            Cell::new(record.modifiers.labels().join(" ")),
        ]);
    }

    builder.build()
}

/// Per-file counts with a total row, shown when more than one file is listed.
pub fn create_summary_table(listings: &[&FileListing]) -> String {
    let mut builder =
        TableBuilder::new().set_headers(vec!["File", "Declarations", "Errors", "Warnings"]);

    let (mut declarations, mut errors, mut warnings) = (0, 0, 0);
    for listing in listings {
        declarations += listing.declaration_count();
        errors += listing.error_count();
        warnings += listing.warning_count();
        builder = builder.add_row(vec![
            listing.path.display().to_string(),
            listing.declaration_count().to_string(),
            listing.error_count().to_string(),
            listing.warning_count().to_string(),
        ]);
    }

    builder
        .add_cells(vec![
            Cell::new("TOTAL").add_attribute(Attribute::Bold),
            Cell::new(declarations).add_attribute(Attribute::Bold),
            Cell::new(errors).add_attribute(Attribute::Bold),
            Cell::new(warnings).add_attribute(Attribute::Bold),
        ])
        .build()
}
