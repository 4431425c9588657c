//! Error types for parsing argument vectors and converting their tokens.

use thiserror::Error;

use crate::ValidationError;

/// Errors that abort a parse.
///
/// Every error is terminal for the parse call that produced it; no partial
/// result is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The catalog failed validation before any token was scanned.
    #[error("invalid flag definition: {0}")]
    InvalidFlagDefinition(#[from] ValidationError),

    /// A token looks like a flag but matches no definition.
    #[error("found unexpected flag: {token}")]
    UnexpectedFlag {
        /// The offending token, verbatim.
        token: String,
    },

    /// An inline `=value` was given to a flag that takes no arguments.
    #[error("flag {spelling} does not take an argument but was given {value:?}")]
    UnexpectedArgument {
        /// Name of the definition.
        flag: String,
        /// Spelling used on the command line.
        spelling: String,
        /// The inline value.
        value: String,
    },

    /// A flag did not receive the arguments its arity requires.
    #[error("{}", lacks_argument_message(.spelling, .interrupted_by.as_deref()))]
    OptionLacksArgument {
        /// Name of the definition.
        flag: String,
        /// Spelling used on the command line.
        spelling: String,
        /// The recognized flag token that cut the arguments short, or `None`
        /// when the input ran out.
        interrupted_by: Option<String>,
    },
}

/// Fieldless classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ParseError::InvalidFlagDefinition`].
    InvalidFlagDefinition,
    /// See [`ParseError::UnexpectedFlag`].
    UnexpectedFlag,
    /// See [`ParseError::UnexpectedArgument`].
    UnexpectedArgument,
    /// See [`ParseError::OptionLacksArgument`].
    OptionLacksArgument,
}

impl ParseError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::InvalidFlagDefinition(_) => ErrorKind::InvalidFlagDefinition,
            ParseError::UnexpectedFlag { .. } => ErrorKind::UnexpectedFlag,
            ParseError::UnexpectedArgument { .. } => ErrorKind::UnexpectedArgument,
            ParseError::OptionLacksArgument { .. } => ErrorKind::OptionLacksArgument,
        }
    }

    /// Name of the flag definition the error concerns, if any.
    pub fn flag(&self) -> Option<&str> {
        match self {
            ParseError::UnexpectedArgument { flag, .. }
            | ParseError::OptionLacksArgument { flag, .. } => Some(flag),
            ParseError::InvalidFlagDefinition(_) | ParseError::UnexpectedFlag { .. } => None,
        }
    }
}

fn lacks_argument_message(spelling: &str, interrupted_by: Option<&str>) -> String {
    match interrupted_by {
        Some(token) => format!(
            "option \"{spelling}\" expects an argument but got another option (\"{token}\") instead"
        ),
        None => format!(
            "last option \"{spelling}\" expects an argument but the parser ran out of command line arguments to parse"
        ),
    }
}

/// Errors from converting raw tokens into typed values.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The occurrence carries no argument.
    #[error("occurrence has no argument")]
    EmptyOccurrence,

    /// The last occurrence of the flag carries no argument.
    #[error("flag {0} has no argument")]
    MissingValue(String),

    /// The flag never appeared.
    #[error("flag {0} was not given")]
    NoOccurrences(String),

    /// There is no positional argument at this index.
    #[error("no positional argument at index {0}")]
    MissingPositional(usize),

    /// The conversion function rejected the token.
    #[error("invalid value {value:?}: {source}")]
    InvalidValue {
        /// The raw token.
        value: String,
        /// Underlying parse failure.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lacks_argument_messages() {
        let interrupted = ParseError::OptionLacksArgument {
            flag: "number".to_string(),
            spelling: "-n".to_string(),
            interrupted_by: Some("-v".to_string()),
        };
        assert_eq!(
            interrupted.to_string(),
            "option \"-n\" expects an argument but got another option (\"-v\") instead"
        );

        let exhausted = ParseError::OptionLacksArgument {
            flag: "number".to_string(),
            spelling: "--number".to_string(),
            interrupted_by: None,
        };
        assert!(exhausted.to_string().starts_with("last option \"--number\""));
        assert_eq!(exhausted.kind(), ErrorKind::OptionLacksArgument);
        assert_eq!(exhausted.flag(), Some("number"));
    }

    #[test]
    fn test_unexpected_flag_message() {
        let err = ParseError::UnexpectedFlag {
            token: "-h".to_string(),
        };
        assert_eq!(err.to_string(), "found unexpected flag: -h");
        assert_eq!(err.flag(), None);
    }

    #[test]
    fn test_validation_error_converts() {
        let err: ParseError = ValidationError::EmptyFlagName.into();
        assert_eq!(err.kind(), ErrorKind::InvalidFlagDefinition);
        assert_eq!(
            err.to_string(),
            "invalid flag definition: flag name cannot be empty"
        );
    }
}
