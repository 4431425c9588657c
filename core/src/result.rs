//! Parse results: flag occurrences and positional arguments.
//!
//! The parser only ever stores raw string tokens. Typed access goes through
//! [`FromStr`], which is the conversion hook callers plug their own types
//! into; the `*_or` accessors fall back to a caller supplied default when the
//! token is absent or does not convert.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConversionError;

/// One appearance of a flag on the command line.
///
/// # Examples
///
/// ```
/// use argtally_core::FlagOccurrence;
///
/// let occurrence = FlagOccurrence::with_values(["42"]);
/// assert_eq!(occurrence.value(), Some("42"));
/// assert_eq!(occurrence.value_as::<i32>().unwrap(), 42);
///
/// let bare = FlagOccurrence::default();
/// assert!(!bare.has_value());
/// assert_eq!(bare.value_or(7), 7);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagOccurrence {
    /// Raw argument tokens consumed by this occurrence, in order
    pub values: Vec<String>,
}

impl FlagOccurrence {
    /// Creates an occurrence carrying the given raw values.
    pub fn with_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// First argument, if any.
    pub fn value(&self) -> Option<&str> {
        self.values.first().map(String::as_str)
    }

    /// Returns `true` if at least one argument was consumed.
    pub fn has_value(&self) -> bool {
        !self.values.is_empty()
    }

    /// Converts the first argument.
    ///
    /// # Errors
    ///
    /// [`ConversionError::EmptyOccurrence`] if there is no argument, or
    /// [`ConversionError::InvalidValue`] if conversion fails.
    pub fn value_as<T>(&self) -> Result<T, ConversionError>
    where
        T: FromStr,
        T::Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        match self.value() {
            Some(value) => convert(value),
            None => Err(ConversionError::EmptyOccurrence),
        }
    }

    /// Converts the first argument, or returns `default`.
    pub fn value_or<T: FromStr>(&self, default: T) -> T {
        self.value()
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }

    /// Converts every argument.
    ///
    /// # Errors
    ///
    /// [`ConversionError::InvalidValue`] for the first token that fails.
    pub fn values_as<T>(&self) -> Result<Vec<T>, ConversionError>
    where
        T: FromStr,
        T::Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.values.iter().map(|value| convert(value)).collect()
    }
}

/// All occurrences of one flag definition.
///
/// Exists for every definition in the catalog, even when the flag never
/// appeared; `all` is empty then. When read as a single value the LAST
/// occurrence wins (`-n 1 -n 2` reads as `2`).
///
/// # Examples
///
/// ```
/// use argtally_core::{Arity, FlagCatalog, FlagDefinition};
///
/// let catalog = FlagCatalog::new()
///     .with_flag(FlagDefinition::new("number", ["-n"], Arity::One));
/// let result = catalog.parse(["prog", "-n", "1", "-n", "2"]).unwrap();
///
/// let number = result.flag("number").unwrap();
/// assert_eq!(number.count(), 2);
/// assert_eq!(number.last_as::<i32>().unwrap(), 2);
/// assert_eq!(number.values().collect::<Vec<_>>(), vec!["1", "2"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagOccurrences {
    /// Definition name
    pub name: String,
    /// Occurrences in the order they were encountered
    pub all: Vec<FlagOccurrence>,
}

impl FlagOccurrences {
    /// Creates an empty entry for a definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            all: Vec::new(),
        }
    }

    /// Number of times the flag appeared.
    pub fn count(&self) -> usize {
        self.all.len()
    }

    /// Returns `true` if the flag appeared at least once.
    pub fn is_present(&self) -> bool {
        !self.all.is_empty()
    }

    /// Gets an occurrence by index.
    pub fn get(&self, index: usize) -> Option<&FlagOccurrence> {
        self.all.get(index)
    }

    /// The most recent occurrence.
    pub fn last(&self) -> Option<&FlagOccurrence> {
        self.all.last()
    }

    /// Iterates occurrences in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FlagOccurrence> {
        self.all.iter()
    }

    /// All argument tokens of all occurrences, flattened in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.all
            .iter()
            .flat_map(|occurrence| occurrence.values.iter().map(String::as_str))
    }

    /// Converts the first argument of the last occurrence.
    ///
    /// # Errors
    ///
    /// [`ConversionError::NoOccurrences`] if the flag never appeared,
    /// [`ConversionError::MissingValue`] if the last occurrence has no
    /// argument, or [`ConversionError::InvalidValue`] if conversion fails.
    pub fn last_as<T>(&self) -> Result<T, ConversionError>
    where
        T: FromStr,
        T::Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        let last = self
            .last()
            .ok_or_else(|| ConversionError::NoOccurrences(self.name.clone()))?;
        match last.value() {
            Some(value) => convert(value),
            None => Err(ConversionError::MissingValue(self.name.clone())),
        }
    }

    /// Converts the first argument of the last occurrence, or returns
    /// `default` if there is none or it does not convert.
    pub fn last_or<T: FromStr>(&self, default: T) -> T {
        match self.last() {
            Some(last) => last.value_or(default),
            None => default,
        }
    }
}

impl<'a> IntoIterator for &'a FlagOccurrences {
    type Item = &'a FlagOccurrence;
    type IntoIter = std::slice::Iter<'a, FlagOccurrence>;

    fn into_iter(self) -> Self::IntoIter {
        self.all.iter()
    }
}

/// Output of a successful parse.
///
/// Every token after the program name ends up in exactly one place: as a
/// matched flag spelling, inside some occurrence's `values`, or in
/// `positionals`. A bare `--` stop marker is the one token that is consumed
/// without being stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// First token of the input (the invoked program), never scanned
    pub program: Option<String>,
    /// One entry per catalog definition, in catalog order
    pub flags: Vec<FlagOccurrences>,
    /// Tokens that were neither flags nor flag arguments
    pub positionals: Vec<String>,
}

impl ParseResult {
    /// File name portion of the program token.
    ///
    /// Returns an empty string when there was no program token or it has no
    /// file name.
    pub fn program_name(&self) -> &str {
        self.program
            .as_deref()
            .map(Path::new)
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// Returns `true` if the named flag appeared at least once.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flag(name).is_some_and(FlagOccurrences::is_present)
    }

    /// Occurrences of a flag, `None` if the name is not in the catalog.
    pub fn flag(&self, name: &str) -> Option<&FlagOccurrences> {
        self.flags.iter().find(|entry| entry.name == name)
    }

    /// Occurrences of a flag, empty for unknown names.
    pub fn occurrences(&self, name: &str) -> &[FlagOccurrence] {
        self.flag(name)
            .map(|entry| entry.all.as_slice())
            .unwrap_or_default()
    }

    /// Number of positional arguments.
    pub fn count(&self) -> usize {
        self.positionals.len()
    }

    /// Gets a positional argument by index.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positionals.get(index).map(String::as_str)
    }

    /// Converts a positional argument.
    ///
    /// # Errors
    ///
    /// [`ConversionError::MissingPositional`] if the index is out of range,
    /// or [`ConversionError::InvalidValue`] if conversion fails.
    pub fn positional_as<T>(&self, index: usize) -> Result<T, ConversionError>
    where
        T: FromStr,
        T::Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        let value = self
            .positional(index)
            .ok_or(ConversionError::MissingPositional(index))?;
        convert(value)
    }

    /// Converts every positional argument.
    ///
    /// # Errors
    ///
    /// [`ConversionError::InvalidValue`] for the first token that fails.
    pub fn positionals_as<T>(&self) -> Result<Vec<T>, ConversionError>
    where
        T: FromStr,
        T::Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.positionals.iter().map(|value| convert(value)).collect()
    }
}

fn convert<T>(value: &str) -> Result<T, ConversionError>
where
    T: FromStr,
    T::Err: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
{
    value
        .parse::<T>()
        .map_err(|err| ConversionError::InvalidValue {
            value: value.to_string(),
            source: err.into(),
        })
}

/// A list of strings parsed from a single comma-separated token.
///
/// Empty components are kept, so `a,,b` yields three items and an empty
/// token yields one empty item.
///
/// # Examples
///
/// ```
/// use argtally_core::CommaSeparated;
///
/// let list: CommaSeparated = "json,yaml,,toml".parse().unwrap();
/// assert_eq!(list.0, vec!["json", "yaml", "", "toml"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommaSeparated(pub Vec<String>);

impl FromStr for CommaSeparated {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.split(',').map(String::from).collect()))
    }
}
