//! Flag catalog type definitions.
//!
//! A [`FlagCatalog`] is an ordered list of [`FlagDefinition`]s. Each
//! definition names a logical flag, lists the literal spellings that
//! activate it, and carries an [`Arity`] policy describing how many trailing
//! tokens an occurrence of the flag consumes. The types are designed for
//! serialization with [`serde`] so catalogs can be kept in JSON or YAML files.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::parse::Parser;
use crate::{ParseError, ParseResult, ValidationError, validate_catalog};

/// How many argument tokens an occurrence of a flag consumes.
///
/// # Examples
///
/// ```
/// use argtally_core::Arity;
///
/// assert_eq!(Arity::default(), Arity::None);
/// assert!(!Arity::None.takes_arguments());
///
/// let pair = Arity::exactly(2).unwrap();
/// assert_eq!(pair.min_values(), 2);
/// assert_eq!(pair.max_values(), Some(2));
/// assert!(Arity::exactly(0).is_none());
///
/// assert_eq!(Arity::ZeroOrMore.max_values(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// A switch; never takes an argument (the default).
    #[default]
    None,
    /// Exactly one argument is required.
    One,
    /// Zero or one argument.
    Optional,
    /// Exactly `n` arguments are required.
    Exactly(NonZeroUsize),
    /// Any number of arguments, including none.
    ZeroOrMore,
    /// At least one argument.
    OneOrMore,
}

impl Arity {
    /// Builds an [`Arity::Exactly`], returning `None` for a count of zero.
    pub fn exactly(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(Arity::Exactly)
    }

    /// Returns `true` if an occurrence can carry at least one argument.
    pub fn takes_arguments(self) -> bool {
        !matches!(self, Arity::None)
    }

    /// Minimum number of argument tokens an occurrence must receive.
    pub fn min_values(self) -> usize {
        match self {
            Arity::None | Arity::Optional | Arity::ZeroOrMore => 0,
            Arity::One | Arity::OneOrMore => 1,
            Arity::Exactly(n) => n.get(),
        }
    }

    /// Maximum number of argument tokens, `None` when unbounded.
    pub fn max_values(self) -> Option<usize> {
        match self {
            Arity::None => Some(0),
            Arity::One | Arity::Optional => Some(1),
            Arity::Exactly(n) => Some(n.get()),
            Arity::ZeroOrMore | Arity::OneOrMore => None,
        }
    }
}

/// Definition of a single logical flag.
///
/// The `name` keys the flag in a [`ParseResult`]; the `spellings` are the
/// literal tokens (`-v`, `--verbose`) that activate it. `help` is opaque to
/// the parser and only used when rendering help text.
///
/// # Examples
///
/// ```
/// use argtally_core::{Arity, FlagDefinition};
///
/// let output = FlagDefinition::new("output", ["-o", "--output"], Arity::One)
///     .with_help("output filename");
/// assert!(output.matches("-o"));
/// assert!(output.matches("--output"));
/// assert!(!output.matches("--out"));
/// assert_eq!(output.help, "output filename");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagDefinition {
    /// Logical name, unique within a catalog
    pub name: String,
    /// Literal tokens that activate this flag
    pub spellings: Vec<String>,
    /// Help text for rendering
    #[serde(default)]
    pub help: String,
    /// Argument policy
    #[serde(default)]
    pub arity: Arity,
}

impl FlagDefinition {
    /// Creates a definition with empty help text.
    pub fn new<I, S>(name: impl Into<String>, spellings: I, arity: Arity) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            spellings: spellings.into_iter().map(Into::into).collect(),
            help: String::new(),
            arity,
        }
    }

    /// Creates a flag that never takes arguments.
    pub fn switch<I, S>(name: impl Into<String>, spellings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, spellings, Arity::None)
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Checks if `token` is exactly one of this flag's spellings.
    pub fn matches(&self, token: &str) -> bool {
        self.spellings.iter().any(|s| s == token)
    }
}

/// An ordered collection of flag definitions.
///
/// Definitions keep their insertion order; parse results list flags in the
/// same order. A catalog must pass [`validate`](FlagCatalog::validate) before
/// it can be used for parsing, which every parse entry point checks.
///
/// # Examples
///
/// ```
/// use argtally_core::{Arity, FlagCatalog, FlagDefinition};
///
/// let catalog = FlagCatalog::new()
///     .with_flag(FlagDefinition::switch("verbose", ["-v", "--verbose"]))
///     .with_flag(FlagDefinition::new("output", ["-o", "--output"], Arity::One));
///
/// assert!(catalog.validate().is_empty());
/// assert_eq!(catalog.find_spelling("-o").unwrap().name, "output");
///
/// let result = catalog.parse(["prog", "-v", "--output=out.txt", "input"]).unwrap();
/// assert!(result.has_flag("verbose"));
/// assert_eq!(result.occurrences("output")[0].value(), Some("out.txt"));
/// assert_eq!(result.positionals, vec!["input"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagCatalog {
    /// Flag definitions in declaration order
    #[serde(default)]
    pub flags: Vec<FlagDefinition>,
}

impl FlagCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a definition, builder style.
    pub fn with_flag(mut self, definition: FlagDefinition) -> Self {
        self.flags.push(definition);
        self
    }

    /// Appends a definition.
    pub fn push(&mut self, definition: FlagDefinition) {
        self.flags.push(definition);
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns `true` if the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Iterates definitions in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FlagDefinition> {
        self.flags.iter()
    }

    /// Finds a definition by logical name.
    pub fn find(&self, name: &str) -> Option<&FlagDefinition> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Finds the definition owning an exact spelling.
    pub fn find_spelling(&self, spelling: &str) -> Option<&FlagDefinition> {
        self.flags.iter().find(|f| f.matches(spelling))
    }

    /// Validates the catalog, see [`validate_catalog`].
    pub fn validate(&self) -> Vec<ValidationError> {
        validate_catalog(self)
    }

    /// Validates the catalog and parses a full argument vector.
    ///
    /// The first element is the program name. Use [`Parser`] directly to
    /// validate once and parse many vectors.
    ///
    /// # Errors
    ///
    /// See [`ParseError`].
    pub fn parse<I, S>(&self, args: I) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Parser::new(self)?.parse(args)
    }
}

impl FromIterator<FlagDefinition> for FlagCatalog {
    fn from_iter<T: IntoIterator<Item = FlagDefinition>>(iter: T) -> Self {
        Self {
            flags: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FlagCatalog {
    type Item = &'a FlagDefinition;
    type IntoIter = std::slice::Iter<'a, FlagDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.flags.iter()
    }
}
