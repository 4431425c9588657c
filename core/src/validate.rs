//! Flag catalog validation.
//!
//! Validates structural invariants of a [`FlagCatalog`] before any token is
//! scanned: every flag has a name and at least one spelling, every spelling is
//! syntactically valid, and no name or spelling is used twice.
//!
//! # Examples
//!
//! ```
//! use argtally_core::*;
//!
//! let catalog = FlagCatalog::new()
//!     .with_flag(FlagDefinition::switch("verbose", ["-v", "--verbose"]));
//! assert!(validate_catalog(&catalog).is_empty());
//!
//! // Invalid: spelling missing its leading hyphen
//! let bad = FlagCatalog::new().with_flag(FlagDefinition::switch("verbose", ["v"]));
//! assert!(!validate_catalog(&bad).is_empty());
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use thiserror::Error;

use crate::{FlagCatalog, FlagDefinition};

/// Catalog validation errors.
///
/// Each variant names the offending definition and the rule it breaks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A definition has an empty or whitespace-only name.
    #[error("flag name cannot be empty")]
    EmptyFlagName,
    /// Two definitions share a logical name.
    #[error("duplicate flag name: {0}")]
    DuplicateFlagName(String),
    /// A definition lists no spellings.
    #[error("flag {0} must define at least one spelling")]
    MissingSpellings(String),
    /// A spelling is not a valid short or long flag.
    #[error("invalid spelling {spelling:?} for flag {flag}: {defect}")]
    InvalidSpelling {
        /// Owning definition name.
        flag: String,
        /// The rejected spelling.
        spelling: String,
        /// The rule that failed.
        defect: SpellingDefect,
    },
    /// A spelling is claimed twice, either by two definitions or twice within
    /// one definition (then `first == second`).
    #[error("duplicate spelling {spelling:?} (defined by {first} and {second})")]
    DuplicateSpelling {
        /// The clashing spelling.
        spelling: String,
        /// Definition that claimed it first.
        first: String,
        /// Definition that claimed it again.
        second: String,
    },
}

/// Why a spelling was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellingDefect {
    /// Does not start with `-`.
    MissingHyphen,
    /// Starts with three or more hyphens, so the name does not start with a
    /// letter or digit.
    TooManyHyphens,
    /// A short spelling must be `-` plus exactly one character.
    ShortNotSingleCharacter,
    /// A long spelling needs at least two characters after `--`.
    LongTooShort,
    /// Contains a character other than letters, digits and internal hyphens.
    InvalidCharacter(char),
}

impl fmt::Display for SpellingDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellingDefect::MissingHyphen => write!(f, "must start with '-' or '--'"),
            SpellingDefect::TooManyHyphens => write!(f, "more than two leading hyphens"),
            SpellingDefect::ShortNotSingleCharacter => {
                write!(f, "short flag must be a single character after '-'")
            }
            SpellingDefect::LongTooShort => {
                write!(f, "long flag needs at least two characters after '--'")
            }
            SpellingDefect::InvalidCharacter(c) => write!(f, "invalid character {c:?}"),
        }
    }
}

/// Syntactic class of a valid spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellingKind {
    /// `-` followed by one alphanumeric character.
    Short(char),
    /// `--` followed by two or more characters.
    Long,
}

/// Classifies a flag spelling, or explains why it is invalid.
///
/// # Examples
///
/// ```
/// use argtally_core::{SpellingDefect, SpellingKind, classify_spelling};
///
/// assert_eq!(classify_spelling("-v"), Ok(SpellingKind::Short('v')));
/// assert_eq!(classify_spelling("--dry-run"), Ok(SpellingKind::Long));
/// assert_eq!(classify_spelling("--x"), Err(SpellingDefect::LongTooShort));
/// assert_eq!(
///     classify_spelling("--out=file"),
///     Err(SpellingDefect::InvalidCharacter('='))
/// );
/// ```
pub fn classify_spelling(spelling: &str) -> Result<SpellingKind, SpellingDefect> {
    if spelling.starts_with("---") {
        return Err(SpellingDefect::TooManyHyphens);
    }

    if let Some(name) = spelling.strip_prefix("--") {
        if let Some(bad) = name.chars().find(|&c| !is_word_char(c)) {
            return Err(SpellingDefect::InvalidCharacter(bad));
        }
        if name.chars().count() < 2 {
            return Err(SpellingDefect::LongTooShort);
        }
        return Ok(SpellingKind::Long);
    }

    if let Some(name) = spelling.strip_prefix('-') {
        let mut chars = name.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => Ok(SpellingKind::Short(c)),
            (Some(c), None) => Err(SpellingDefect::InvalidCharacter(c)),
            _ => Err(SpellingDefect::ShortNotSingleCharacter),
        };
    }

    Err(SpellingDefect::MissingHyphen)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Validates a flag catalog.
///
/// Checks for empty names, missing spellings, invalid spellings, and duplicate
/// names or spellings. Validation stops at the first problem, so the returned
/// list holds at most one error; an empty list means the catalog is usable.
/// The outcome depends only on the catalog, never on any input.
///
/// # Examples
///
/// ```
/// use argtally_core::*;
///
/// let catalog = FlagCatalog::new()
///     .with_flag(FlagDefinition::switch("verbose", ["-v"]))
///     .with_flag(FlagDefinition::switch("version", ["-v", "--version"]));
/// let errors = validate_catalog(&catalog);
/// assert!(matches!(errors[0], ValidationError::DuplicateSpelling { .. }));
/// ```
pub fn validate_catalog(catalog: &FlagCatalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut names: HashSet<&str> = HashSet::new();
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for flag in catalog {
        let name = flag.name.trim();
        if name.is_empty() {
            errors.push(ValidationError::EmptyFlagName);
            return errors;
        }
        if !names.insert(flag.name.as_str()) {
            errors.push(ValidationError::DuplicateFlagName(flag.name.clone()));
            return errors;
        }

        errors.extend(validate_spellings(flag, &mut owners));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

fn validate_spellings<'c>(
    flag: &'c FlagDefinition,
    owners: &mut HashMap<&'c str, &'c str>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if flag.spellings.is_empty() {
        errors.push(ValidationError::MissingSpellings(flag.name.clone()));
        return errors;
    }

    for spelling in &flag.spellings {
        if let Err(defect) = classify_spelling(spelling) {
            errors.push(ValidationError::InvalidSpelling {
                flag: flag.name.clone(),
                spelling: spelling.clone(),
                defect,
            });
            return errors;
        }
        if let Some(first) = owners.insert(spelling.as_str(), flag.name.as_str()) {
            errors.push(ValidationError::DuplicateSpelling {
                spelling: spelling.clone(),
                first: first.to_string(),
                second: flag.name.clone(),
            });
            return errors;
        }
    }

    errors
}
