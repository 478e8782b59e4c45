//! Language standards and their keyword tables
//!
//! The set of reserved words depends on the selected standard: under C,
//! `class` and `public` are ordinary identifiers; `override` and `final`
//! only become keywords from C++11 on.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Supported C and C++ language standards
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageStandard {
    C89,
    C99,
    C11,
    C17,
    Cxx98,
    Cxx03,
    Cxx11,
    Cxx14,
    #[default]
    Cxx17,
    Cxx20,
    Cxx23,
}

impl LanguageStandard {
    /// All standards, oldest first within each language
    pub const ALL: [LanguageStandard; 11] = [
        LanguageStandard::C89,
        LanguageStandard::C99,
        LanguageStandard::C11,
        LanguageStandard::C17,
        LanguageStandard::Cxx98,
        LanguageStandard::Cxx03,
        LanguageStandard::Cxx11,
        LanguageStandard::Cxx14,
        LanguageStandard::Cxx17,
        LanguageStandard::Cxx20,
        LanguageStandard::Cxx23,
    ];

    /// Canonical `-std=` spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageStandard::C89 => "c89",
            LanguageStandard::C99 => "c99",
            LanguageStandard::C11 => "c11",
            LanguageStandard::C17 => "c17",
            LanguageStandard::Cxx98 => "c++98",
            LanguageStandard::Cxx03 => "c++03",
            LanguageStandard::Cxx11 => "c++11",
            LanguageStandard::Cxx14 => "c++14",
            LanguageStandard::Cxx17 => "c++17",
            LanguageStandard::Cxx20 => "c++20",
            LanguageStandard::Cxx23 => "c++23",
        }
    }

    pub fn is_cpp(&self) -> bool {
        *self >= LanguageStandard::Cxx98
    }

    /// Keyword table for this standard
    pub fn keywords(&self) -> KeywordTable {
        KeywordTable::for_standard(*self)
    }
}

impl fmt::Display for LanguageStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageStandard {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let bare = lower.strip_prefix("-std=").unwrap_or(lower.as_str());
        let normalized = bare.replace("cxx", "c++");
        let normalized = normalized
            .strip_prefix("gnu")
            .map(|rest| format!("c{rest}"))
            .unwrap_or(normalized);

        match normalized.as_str() {
            "c89" | "c90" | "ansi" => Ok(LanguageStandard::C89),
            "c99" => Ok(LanguageStandard::C99),
            "c11" => Ok(LanguageStandard::C11),
            "c17" | "c18" => Ok(LanguageStandard::C17),
            "c++98" => Ok(LanguageStandard::Cxx98),
            "c++03" => Ok(LanguageStandard::Cxx03),
            "c++11" | "c++0x" => Ok(LanguageStandard::Cxx11),
            "c++14" | "c++1y" => Ok(LanguageStandard::Cxx14),
            "c++17" | "c++1z" => Ok(LanguageStandard::Cxx17),
            "c++20" | "c++2a" => Ok(LanguageStandard::Cxx20),
            "c++23" | "c++2b" => Ok(LanguageStandard::Cxx23),
            _ => Err(format!(
                "unknown language standard '{s}' (expected one of: {})",
                LanguageStandard::ALL
                    .iter()
                    .map(|std| std.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl TryFrom<String> for LanguageStandard {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageStandard> for String {
    fn from(value: LanguageStandard) -> Self {
        value.as_str().to_string()
    }
}

const C89_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "int", "long", "register", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void",
    "volatile", "while",
];

const C99_KEYWORDS: &[&str] = &["inline", "restrict", "_Bool", "_Complex", "_Imaginary"];

const C11_KEYWORDS: &[&str] = &[
    "_Alignas",
    "_Alignof",
    "_Atomic",
    "_Generic",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
];

const CXX98_KEYWORDS: &[&str] = &[
    "asm",
    "bool",
    "catch",
    "class",
    "const_cast",
    "delete",
    "dynamic_cast",
    "explicit",
    "export",
    "false",
    "friend",
    "inline",
    "mutable",
    "namespace",
    "new",
    "operator",
    "private",
    "protected",
    "public",
    "reinterpret_cast",
    "static_cast",
    "template",
    "this",
    "throw",
    "true",
    "try",
    "typeid",
    "typename",
    "using",
    "virtual",
    "wchar_t",
];

const CXX11_KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "char16_t",
    "char32_t",
    "constexpr",
    "decltype",
    "noexcept",
    "nullptr",
    "static_assert",
    "thread_local",
    "override",
    "final",
];

const CXX20_KEYWORDS: &[&str] = &[
    "char8_t",
    "concept",
    "consteval",
    "constinit",
    "co_await",
    "co_return",
    "co_yield",
    "requires",
];

/// Set of words the lexer classifies as keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    standard: LanguageStandard,
    words: HashSet<String>,
    /// Words added on top of the standard's own set
    extra: HashSet<String>,
}

impl KeywordTable {
    /// Build the keyword table for a standard
    pub fn for_standard(standard: LanguageStandard) -> Self {
        let mut groups: Vec<&[&str]> = vec![C89_KEYWORDS];
        match standard {
            LanguageStandard::C89 => {}
            LanguageStandard::C99 => groups.push(C99_KEYWORDS),
            LanguageStandard::C11 | LanguageStandard::C17 => {
                groups.extend([C99_KEYWORDS, C11_KEYWORDS]);
            }
            LanguageStandard::Cxx98 | LanguageStandard::Cxx03 => groups.push(CXX98_KEYWORDS),
            LanguageStandard::Cxx11 | LanguageStandard::Cxx14 | LanguageStandard::Cxx17 => {
                groups.extend([CXX98_KEYWORDS, CXX11_KEYWORDS]);
            }
            LanguageStandard::Cxx20 | LanguageStandard::Cxx23 => {
                groups.extend([CXX98_KEYWORDS, CXX11_KEYWORDS, CXX20_KEYWORDS]);
            }
        }

        let words = groups
            .into_iter()
            .flatten()
            .map(|word| (*word).to_string())
            .collect();
        Self {
            standard,
            words,
            extra: HashSet::new(),
        }
    }

    /// Add extra reserved words (e.g. vendor extensions)
    pub fn extend<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for word in extra {
            let word = word.into();
            if !self.words.contains(&word) {
                self.extra.insert(word.clone());
                self.words.insert(word);
            }
        }
    }

    /// Builder-style variant of [`KeywordTable::extend`]
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extend(extra);
        self
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Whether `word` is a configured extra keyword rather than one of the
    /// standard's reserved words
    pub fn is_extra(&self, word: &str) -> bool {
        self.extra.contains(word)
    }

    pub fn standard(&self) -> LanguageStandard {
        self.standard
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::for_standard(LanguageStandard::default())
    }
}
