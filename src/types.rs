//! Core value types shared across the store, updater and query engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, never-recycled identifier assigned to a distinct blob hash the first
/// time it is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlobId(pub u64);

impl BlobId {
    pub fn new(value: u64) -> Self {
        BlobId(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BlobId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BlobId(s.parse()?))
    }
}

/// File family: which lexer and which index tables a path contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    /// C-like source (.c, .h, .cpp, ...)
    C,
    /// Kconfig
    K,
    /// Device-tree source
    D,
    /// Makefile
    M,
    /// DT-binding documentation
    B,
}

impl Family {
    /// Single-letter code used in packed records.
    pub fn code(self) -> char {
        match self {
            Family::C => 'C',
            Family::K => 'K',
            Family::D => 'D',
            Family::M => 'M',
            Family::B => 'B',
        }
    }

    pub fn from_code(c: char) -> Option<Family> {
        match c {
            'C' => Some(Family::C),
            'K' => Some(Family::K),
            'D' => Some(Family::D),
            'M' => Some(Family::M),
            'B' => Some(Family::B),
            _ => None,
        }
    }

    /// `true` for a query family selector meaning "all families" (`A`).
    pub fn matches_selector(self, selector: FamilySelector) -> bool {
        match selector {
            FamilySelector::All => true,
            FamilySelector::One(f) => f == self,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What a query asked for: one specific family, or `A` meaning "all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilySelector {
    One(Family),
    All,
}

impl FamilySelector {
    pub fn parse(s: &str) -> Option<FamilySelector> {
        if s == "A" {
            return Some(FamilySelector::All);
        }
        let c = s.chars().next()?;
        if s.len() == 1 {
            Family::from_code(c).map(FamilySelector::One)
        } else {
            None
        }
    }
}

/// Closed set of definition kinds, one letter each in the packed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefType {
    Config,
    Define,
    Enum,
    Enumerator,
    Function,
    Label,
    Macro,
    Member,
    Prototype,
    Struct,
    Typedef,
    Union,
    Variable,
    Externvar,
}

impl DefType {
    pub fn code(self) -> char {
        match self {
            DefType::Config => 'c',
            DefType::Define => 'd',
            DefType::Enum => 'e',
            DefType::Enumerator => 'E',
            DefType::Function => 'f',
            DefType::Label => 'l',
            DefType::Macro => 'M',
            DefType::Member => 'm',
            DefType::Prototype => 'p',
            DefType::Struct => 's',
            DefType::Typedef => 't',
            DefType::Union => 'u',
            DefType::Variable => 'v',
            DefType::Externvar => 'x',
        }
    }

    pub fn from_code(c: char) -> Option<DefType> {
        Some(match c {
            'c' => DefType::Config,
            'd' => DefType::Define,
            'e' => DefType::Enum,
            'E' => DefType::Enumerator,
            'f' => DefType::Function,
            'l' => DefType::Label,
            'M' => DefType::Macro,
            'm' => DefType::Member,
            'p' => DefType::Prototype,
            's' => DefType::Struct,
            't' => DefType::Typedef,
            'u' => DefType::Union,
            'v' => DefType::Variable,
            'x' => DefType::Externvar,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            DefType::Config => "config",
            DefType::Define => "define",
            DefType::Enum => "enum",
            DefType::Enumerator => "enumerator",
            DefType::Function => "function",
            DefType::Label => "label",
            DefType::Macro => "macro",
            DefType::Member => "member",
            DefType::Prototype => "prototype",
            DefType::Struct => "struct",
            DefType::Typedef => "typedef",
            DefType::Union => "union",
            DefType::Variable => "variable",
            DefType::Externvar => "externvar",
        }
    }
}

impl fmt::Display for DefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Validates a candidate token as an indexable identifier.
///
/// Matches `[A-Za-z0-9_$.%?-]+`, at least 2 bytes, not purely numeric.
pub fn is_ident(candidate: &[u8]) -> bool {
    if candidate.len() < 2 {
        return false;
    }
    if !candidate
        .iter()
        .all(|&b| is_ident_byte(b))
    {
        return false;
    }
    !candidate.iter().all(|b| b.is_ascii_digit())
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.' | b'%' | b'?' | b'-')
}

/// One hit returned by the `ident` query: a def, ref, or doc-comment occurrence
/// joined against a tag's manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInstance {
    /// For definitions, the `DefType` name; for refs/docs, a fixed descriptive tag.
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    /// Either a single line number (defs) or a comma-joined ascending list (refs/docs).
    pub line: String,
}

impl SymbolInstance {
    pub fn new(kind: impl Into<String>, path: impl Into<String>, line: impl Into<String>) -> Self {
        SymbolInstance {
            kind: kind.into(),
            path: path.into(),
            line: line.into(),
        }
    }
}
