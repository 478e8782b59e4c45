//! Declaration records and the value types they carry.
//!
//! A [`DeclarationRecord`] is the structured summary of one declared entity.
//! Records are plain data: they name their enclosing scope by path and never
//! point at other records.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclarationKind {
    Class,
    Struct,
    Union,
    Enum,
    Namespace,
    Function,
    Variable,
    FriendDeclaration,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Namespace => "namespace",
            Self::Function => "function",
            Self::Variable => "variable",
            Self::FriendDeclaration => "friend",
        }
    }

    /// Whether this kind opens an aggregate scope with an access cursor.
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Self::Class | Self::Struct | Self::Union)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclarationKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "struct" => Ok(Self::Struct),
            "union" => Ok(Self::Union),
            "enum" => Ok(Self::Enum),
            "namespace" => Ok(Self::Namespace),
            "function" => Ok(Self::Function),
            "variable" => Ok(Self::Variable),
            "friend" | "friend-declaration" => Ok(Self::FriendDeclaration),
            _ => Err("Unknown declaration kind"),
        }
    }
}

/// Access level of a member.
///
/// `Unspecified` is used for declarations outside any class or struct body
/// and for friend declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessLevel {
    Public,
    Private,
    Protected,
    Unspecified,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Unspecified => "unspecified",
        }
    }

    /// Map an access-specifier keyword to its level.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "protected" => Some(Self::Protected),
            _ => None,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Declaration modifiers seen on a record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u32 {
        const VIRTUAL      = 1 << 0;
        const PURE_VIRTUAL = 1 << 1;
        const EXPLICIT     = 1 << 2;
        const STATIC       = 1 << 3;
        const INLINE       = 1 << 4;
        const FRIEND       = 1 << 5;
        const OVERRIDE     = 1 << 6;
        const FINAL        = 1 << 7;
        const CONST        = 1 << 8;
        const CONSTEXPR    = 1 << 9;
        const EXTERN       = 1 << 10;
        const MUTABLE      = 1 << 11;
        const NOEXCEPT     = 1 << 12;
        const TEMPLATE     = 1 << 13;
        const DEFAULTED    = 1 << 14;
        const DELETED      = 1 << 15;
    }
}

impl Modifiers {
    /// Map a leading decl-specifier keyword to its flag.
    pub fn from_specifier(word: &str) -> Option<Self> {
        match word {
            "virtual" => Some(Self::VIRTUAL),
            "explicit" => Some(Self::EXPLICIT),
            "static" => Some(Self::STATIC),
            "inline" => Some(Self::INLINE),
            "friend" => Some(Self::FRIEND),
            "constexpr" | "consteval" | "constinit" => Some(Self::CONSTEXPR),
            "extern" => Some(Self::EXTERN),
            "mutable" => Some(Self::MUTABLE),
            _ => None,
        }
    }

    /// Lowercase names of the set flags, in declaration order.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        for (name, _) in self.iter_names() {
            labels.push(match name {
                "VIRTUAL" => "virtual",
                "PURE_VIRTUAL" => "pure-virtual",
                "EXPLICIT" => "explicit",
                "STATIC" => "static",
                "INLINE" => "inline",
                "FRIEND" => "friend",
                "OVERRIDE" => "override",
                "FINAL" => "final",
                "CONST" => "const",
                "CONSTEXPR" => "constexpr",
                "EXTERN" => "extern",
                "MUTABLE" => "mutable",
                "NOEXCEPT" => "noexcept",
                "TEMPLATE" => "template",
                "DEFAULTED" => "default",
                "DELETED" => "delete",
                _ => "unknown",
            });
        }
        labels
    }
}

/// A type as written, with any top-level `&` or `&&` stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub text: String,
    pub is_reference: bool,
}

impl TypeRef {
    pub fn new(text: impl Into<String>, is_reference: bool) -> Self {
        Self {
            text: text.into(),
            is_reference,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reference {
            write!(f, "{}&", self.text)
        } else {
            f.write_str(&self.text)
        }
    }
}

/// One entry of a class base list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseClass {
    pub name: String,
    pub access: AccessLevel,
    pub is_virtual: bool,
}

impl fmt::Display for BaseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual {
            write!(f, "{} virtual {}", self.access, self.name)
        } else {
            write!(f, "{} {}", self.access, self.name)
        }
    }
}

/// One function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub type_text: String,
    pub is_reference: bool,
    pub name: Option<String>,
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_text)?;
        if self.is_reference {
            f.write_str("&")?;
        }
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        Ok(())
    }
}

/// Structured summary of one parsed declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRecord {
    pub kind: DeclarationKind,
    pub name: String,
    /// Names of the enclosing scopes, outermost first.
    pub scope: Vec<String>,
    pub access: AccessLevel,
    pub modifiers: Modifiers,
    pub bases: Vec<BaseClass>,
    pub parameters: Vec<Parameter>,
    /// `None` for constructors, destructors and conversion operators.
    pub return_type: Option<TypeRef>,
    /// Declared type of a variable.
    pub value_type: Option<TypeRef>,
    pub line: u32,
    pub column: u32,
    /// True for aggregates with a body and functions with an inline body.
    pub is_definition: bool,
}

impl DeclarationRecord {
    pub fn new(kind: DeclarationKind, name: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            scope: Vec::new(),
            access: AccessLevel::Unspecified,
            modifiers: Modifiers::empty(),
            bases: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            value_type: None,
            line,
            column,
            is_definition: false,
        }
    }

    pub fn with_scope(mut self, scope: Vec<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_access(mut self, access: AccessLevel) -> Self {
        self.access = access;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_virtual(&self) -> bool {
        self.modifiers.contains(Modifiers::VIRTUAL)
    }

    pub fn is_pure_virtual(&self) -> bool {
        self.modifiers.contains(Modifiers::PURE_VIRTUAL)
    }

    /// Fully qualified name, e.g. `ns::Outer::member`.
    pub fn qualified_name(&self) -> String {
        if self.scope.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.scope.join("::"), self.name)
        }
    }

    /// Human-readable signature used by the text listing.
    pub fn signature(&self) -> String {
        match self.kind {
            DeclarationKind::Function | DeclarationKind::FriendDeclaration
                if !self.parameters.is_empty() || self.return_type.is_some() =>
            {
                let params = self
                    .parameters
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                match &self.return_type {
                    Some(ret) => format!("{ret} {}({params})", self.name),
                    None => format!("{}({params})", self.name),
                }
            }
            DeclarationKind::Function => format!("{}()", self.name),
            DeclarationKind::Variable => match &self.value_type {
                Some(ty) => format!("{ty} {}", self.name),
                None => self.name.clone(),
            },
            DeclarationKind::Class | DeclarationKind::Struct if !self.bases.is_empty() => {
                let bases = self
                    .bases
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{} {} : {bases}", self.kind, self.name)
            }
            _ => format!("{} {}", self.kind, self.name),
        }
    }
}

impl fmt::Display for DeclarationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.line, self.column, self.signature())?;
        if self.access != AccessLevel::Unspecified {
            write!(f, " [{}]", self.access)?;
        }
        let labels = self.modifiers.labels();
        if !labels.is_empty() {
            write!(f, " {{{}}}", labels.join(", "))?;
        }
        Ok(())
    }
}
