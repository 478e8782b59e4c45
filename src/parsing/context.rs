//! Scope tracking for the declaration parser
//!
//! [`ScopeContext`] is the stack of currently open scopes. Aggregate frames
//! (class, struct, union) carry their own access cursor; namespace and
//! linkage frames only contribute to the scope path. A context is owned by a
//! single parse and dropped with it.

use crate::types::{AccessLevel, DeclarationKind};

/// Kinds of scope the parser opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Class,
    Struct,
    Union,
    Namespace,
    /// `extern "C" { ... }`, transparent for names
    Linkage,
}

impl ScopeKind {
    /// Scope kind opened by the body of a declaration of this kind
    pub fn for_declaration(kind: DeclarationKind) -> Option<Self> {
        match kind {
            DeclarationKind::Class => Some(ScopeKind::Class),
            DeclarationKind::Struct => Some(ScopeKind::Struct),
            DeclarationKind::Union => Some(ScopeKind::Union),
            DeclarationKind::Namespace => Some(ScopeKind::Namespace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Class => "class",
            ScopeKind::Struct => "struct",
            ScopeKind::Union => "union",
            ScopeKind::Namespace => "namespace",
            ScopeKind::Linkage => "linkage block",
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, ScopeKind::Class | ScopeKind::Struct | ScopeKind::Union)
    }

    /// Access of members before any access specifier
    pub fn default_access(&self) -> AccessLevel {
        match self {
            ScopeKind::Class => AccessLevel::Private,
            ScopeKind::Struct | ScopeKind::Union => AccessLevel::Public,
            ScopeKind::Namespace | ScopeKind::Linkage => AccessLevel::Unspecified,
        }
    }
}

/// One open scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFrame {
    pub kind: ScopeKind,
    /// `None` for anonymous aggregates and namespaces
    pub name: Option<String>,
    /// Most recent access specifier seen in this body
    pub access: Option<AccessLevel>,
    /// Position of the opening brace
    pub line: u32,
    pub column: u32,
}

impl ScopeFrame {
    pub fn new(kind: ScopeKind, name: Option<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            name,
            access: None,
            line,
            column,
        }
    }

    /// Cursor value, falling back to the aggregate default
    pub fn resolved_access(&self) -> AccessLevel {
        self.access.unwrap_or_else(|| self.kind.default_access())
    }
}

/// Stack of open scopes, innermost last
#[derive(Debug, Clone, Default)]
pub struct ScopeContext {
    frames: Vec<ScopeFrame>,
}

impl ScopeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a new scope
    pub fn enter(&mut self, frame: ScopeFrame) {
        tracing::debug!(
            "enter {:?} scope {:?} at {}:{}",
            frame.kind,
            frame.name,
            frame.line,
            frame.column
        );
        self.frames.push(frame);
    }

    /// Exit the innermost scope
    pub fn exit(&mut self) -> Option<ScopeFrame> {
        let frame = self.frames.pop();
        if let Some(frame) = &frame {
            tracing::debug!("exit {:?} scope {:?}", frame.kind, frame.name);
        }
        frame
    }

    /// Update the access cursor of the innermost aggregate.
    ///
    /// Returns false when no aggregate is open.
    pub fn set_access(&mut self, access: AccessLevel) -> bool {
        match self.frames.last_mut() {
            Some(frame) if frame.kind.is_aggregate() => {
                frame.access = Some(access);
                true
            }
            _ => false,
        }
    }

    /// Access level for a member declared at the current position
    pub fn current_access(&self) -> AccessLevel {
        match self.frames.last() {
            Some(frame) => frame.resolved_access(),
            None => AccessLevel::Unspecified,
        }
    }

    /// Names of the open named scopes, outermost first.
    ///
    /// A frame named `A::B` (nested namespace, out-of-line class) contributes
    /// one segment per component.
    pub fn scope_path(&self) -> Vec<String> {
        self.frames
            .iter()
            .filter_map(|frame| frame.name.as_deref())
            .flat_map(|name| name.split("::"))
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Innermost frame, if it is an aggregate
    pub fn current_aggregate(&self) -> Option<&ScopeFrame> {
        self.frames.last().filter(|frame| frame.kind.is_aggregate())
    }

    /// Name of the innermost aggregate, used to spot constructors
    pub fn current_class_name(&self) -> Option<&str> {
        self.current_aggregate()
            .and_then(|frame| frame.name.as_deref())
    }

    /// Whether the innermost scope is a class, struct or union body
    pub fn is_in_aggregate(&self) -> bool {
        self.current_aggregate().is_some()
    }

    pub fn is_top_level(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Frames still open, outermost first
    pub fn unclosed(&self) -> &[ScopeFrame] {
        &self.frames
    }
}
