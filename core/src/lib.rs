//! Flag catalogs and a deterministic argument vector classifier.
//!
//! This crate splits a process's raw argument vector into recognized flag
//! occurrences and positional arguments:
//!
//! - [`FlagCatalog`]: an ordered set of [`FlagDefinition`]s, each with a
//!   logical name, the spellings that activate it (`-v`, `--verbose`) and an
//!   [`Arity`] policy.
//! - [`Parser`]: a validated, indexed catalog that scans argument vectors.
//! - [`ParseResult`]: per-flag [`FlagOccurrences`] plus positionals, with
//!   typed accessors built on [`FromStr`](std::str::FromStr).
//!
//! Validation ([`validate_catalog`]) catches malformed or clashing spellings
//! before any token is scanned. Scanning fails with a [`ParseError`] on
//! unknown flags, inline values given to switches, and flags that did not
//! receive their required arguments.
//!
//! # Example
//!
//! ```
//! use argtally_core::*;
//!
//! let catalog = FlagCatalog::new()
//!     .with_flag(FlagDefinition::switch("verbose", ["-v", "--verbose"]).with_help("be verbose"))
//!     .with_flag(FlagDefinition::new("number", ["-n", "--number"], Arity::ZeroOrMore));
//!
//! let result = catalog.parse(["prog", "-v", "-n", "1", "2", "--", "-v"]).unwrap();
//! assert_eq!(result.program_name(), "prog");
//! assert_eq!(result.flag("verbose").unwrap().count(), 1);
//! assert_eq!(result.occurrences("number")[0].values_as::<i32>().unwrap(), vec![1, 2]);
//! assert_eq!(result.positionals, vec!["-v"]);
//!
//! let err = catalog.parse(["prog", "--verbose=yes"]).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::UnexpectedArgument);
//! ```

mod error;
mod help;
mod parse;
mod result;
mod types;
mod validate;

pub use error::{ConversionError, ErrorKind, ParseError};
pub use parse::{Parser, parse};
pub use result::{CommaSeparated, FlagOccurrence, FlagOccurrences, ParseResult};
pub use types::*;
pub use validate::{
    SpellingDefect, SpellingKind, ValidationError, classify_spelling, validate_catalog,
};
