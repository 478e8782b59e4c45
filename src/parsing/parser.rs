//! Language parser trait
//!
//! This module defines the common interface a declaration parser exposes
//! to the batch layer and the CLI, plus the [`ParseOutput`] it returns.

use crate::parsing::diagnostic::{Diagnostic, Severity};
use crate::parsing::language::LanguageStandard;
use crate::types::{DeclarationKind, DeclarationRecord};
use serde::{Deserialize, Serialize};

/// Common interface for declaration parsers
pub trait LanguageParser: Send + Sync {
    /// Parse source code and extract declarations.
    ///
    /// Never fails: malformed input yields diagnostics next to whatever
    /// declarations could be recovered.
    fn parse(&mut self, code: &str) -> ParseOutput;

    /// Standard whose keyword table drives this parser
    fn standard(&self) -> LanguageStandard;
}

/// Declarations and diagnostics of one parse, both in source order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseOutput {
    pub declarations: Vec<DeclarationRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty() && self.diagnostics.is_empty()
    }

    /// Declarations of one kind, in source order
    pub fn of_kind(&self, kind: DeclarationKind) -> impl Iterator<Item = &DeclarationRecord> {
        self.declarations.iter().filter(move |d| d.kind == kind)
    }

    /// First declaration with the given unqualified name
    pub fn find(&self, name: &str) -> Option<&DeclarationRecord> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Keep only declarations of the given kinds; diagnostics are untouched
    pub fn retain_kinds(&mut self, kinds: &[DeclarationKind]) {
        if !kinds.is_empty() {
            self.declarations.retain(|d| kinds.contains(&d.kind));
        }
    }
}
