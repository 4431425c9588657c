//! The parse engine.
//!
//! A [`Parser`] walks an argument vector once, left to right. Each token is
//! classified against the catalog's spellings and then either opens a flag
//! occurrence, feeds the occurrence that is still waiting for arguments, or
//! becomes a positional argument. A bare `--` stops flag recognition for the
//! rest of the vector.
//!
//! # Token rules
//!
//! * `--` switches to positional-only mode and is not stored, unless an open
//!   occurrence is still waiting for a token: it has not received any
//!   argument yet, or it still has a required slot. That occurrence takes the
//!   `--` as its argument, so `-d -- x` gives `d` the value `--`.
//! * An exact spelling match, or `--long=value` for a known long spelling,
//!   is a recognized flag. The inline value is the occurrence's only value.
//! * `-abc` is a cluster when every character is a known short flag. The
//!   first character whose flag takes arguments ends the cluster and the rest
//!   of the token (if any) is that flag's only value, so `-ofile` reads as
//!   `-o file`.
//! * Any other token starting with `-` (except a lone `-`) is an unknown
//!   flag and always an error, even while an occurrence waits for arguments
//!   (`-n -5` is rejected; use `--number=-5` or `-n-5`).
//! * Everything else is a plain token: an argument for the open occurrence if
//!   it still accepts one, a positional otherwise.
//!
//! A recognized flag always interrupts argument collection. If the
//! interrupted occurrence still needed arguments the parse fails.
//!
//! # Example
//!
//! ```
//! use argtally_core::*;
//!
//! let catalog = FlagCatalog::new()
//!     .with_flag(FlagDefinition::switch("all", ["-a"]))
//!     .with_flag(FlagDefinition::switch("brief", ["-b"]))
//!     .with_flag(FlagDefinition::new("output", ["-o", "--output"], Arity::One));
//! let parser = Parser::new(&catalog).unwrap();
//!
//! let result = parser.parse(["prog", "-abo", "out.txt", "in.txt"]).unwrap();
//! assert!(result.has_flag("all") && result.has_flag("brief"));
//! assert_eq!(result.occurrences("output")[0].value(), Some("out.txt"));
//! assert_eq!(result.positionals, vec!["in.txt"]);
//!
//! let err = parser.parse(["prog", "-o"]).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::OptionLacksArgument);
//! ```

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::validate::{SpellingKind, classify_spelling};
use crate::{
    Arity, FlagCatalog, FlagOccurrence, FlagOccurrences, ParseError, ParseResult, ValidationError,
    validate_catalog,
};

/// Validates `catalog` and parses a full argument vector with it.
///
/// The first element of `args` is the program name and is not scanned.
///
/// # Errors
///
/// See [`ParseError`].
pub fn parse<I, S>(catalog: &FlagCatalog, args: I) -> Result<ParseResult, ParseError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Parser::new(catalog)?.parse(args)
}

/// A validated catalog, indexed for scanning.
///
/// Building a parser validates the catalog once; afterwards it is read-only
/// and [`parse`](Parser::parse) can be called any number of times, from any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Parser<'c> {
    catalog: &'c FlagCatalog,
    spellings: HashMap<&'c str, usize>,
    shorts: HashMap<char, usize>,
}

impl<'c> Parser<'c> {
    /// Validates the catalog and builds the spelling index.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in the catalog.
    pub fn new(catalog: &'c FlagCatalog) -> Result<Self, ValidationError> {
        if let Some(err) = validate_catalog(catalog).into_iter().next() {
            debug!(error = %err, "Rejected flag catalog");
            return Err(err);
        }

        let mut spellings = HashMap::new();
        let mut shorts = HashMap::new();
        for (index, flag) in catalog.iter().enumerate() {
            for spelling in &flag.spellings {
                spellings.insert(spelling.as_str(), index);
                if let Ok(SpellingKind::Short(c)) = classify_spelling(spelling) {
                    shorts.insert(c, index);
                }
            }
        }

        Ok(Self {
            catalog,
            spellings,
            shorts,
        })
    }

    /// The catalog this parser was built from.
    pub fn catalog(&self) -> &'c FlagCatalog {
        self.catalog
    }

    /// Parses a full argument vector whose first element is the program name.
    ///
    /// # Errors
    ///
    /// [`ParseError::UnexpectedFlag`], [`ParseError::UnexpectedArgument`] or
    /// [`ParseError::OptionLacksArgument`]; the first violation aborts the
    /// scan.
    pub fn parse<I, S>(&self, args: I) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program = args.next();
        let tokens: Vec<String> = args.collect();
        debug!(
            program = ?program,
            tokens = tokens.len(),
            definitions = self.catalog.len(),
            "Scanning argument vector"
        );

        let outcome = Scan::new(self, program).run(tokens);
        if let Err(err) = &outcome {
            debug!(error = %err, "Scan aborted");
        }
        outcome
    }

    fn classify(&self, token: &str) -> Class {
        if token == "--" {
            return Class::Stop;
        }

        if let Some(&flag) = self.spellings.get(token) {
            return Class::Flag(Recognized {
                flags: vec![flag],
                spelling: token.to_string(),
                inline: None,
            });
        }

        if token.starts_with("--") {
            return match token.split_once('=') {
                Some((name, value)) => match self.spellings.get(name) {
                    Some(&flag) => Class::Flag(Recognized {
                        flags: vec![flag],
                        spelling: name.to_string(),
                        inline: Some(value.to_string()),
                    }),
                    None => Class::Unknown,
                },
                None => Class::Unknown,
            };
        }

        match token.strip_prefix('-') {
            Some("") | None => Class::Plain,
            Some(cluster) => self.cluster(cluster).map_or(Class::Unknown, Class::Flag),
        }
    }

    /// Resolves `abc` of `-abc` into short flags, stopping at the first one
    /// that takes arguments.
    fn cluster(&self, chars: &str) -> Option<Recognized> {
        let mut flags = Vec::new();
        for (offset, c) in chars.char_indices() {
            let flag = *self.shorts.get(&c)?;
            flags.push(flag);
            if self.catalog.flags[flag].arity.takes_arguments() {
                let rest = &chars[offset + c.len_utf8()..];
                return Some(Recognized {
                    flags,
                    spelling: format!("-{c}"),
                    inline: (!rest.is_empty()).then(|| rest.to_string()),
                });
            }
        }

        let last = chars.chars().last()?;
        Some(Recognized {
            flags,
            spelling: format!("-{last}"),
            inline: None,
        })
    }
}

#[derive(Debug)]
enum Class {
    Stop,
    Flag(Recognized),
    Unknown,
    Plain,
}

/// One token's worth of recognized flags. Only the last flag may take
/// arguments; `spelling` and `inline` belong to it.
#[derive(Debug)]
struct Recognized {
    flags: Vec<usize>,
    spelling: String,
    inline: Option<String>,
}

/// Index of an occurrence inside [`ParseResult::flags`].
#[derive(Debug, Clone, Copy)]
struct Slot {
    flag: usize,
    occurrence: usize,
}

/// Remaining argument capacity of an open occurrence.
#[derive(Debug, Clone, Copy)]
struct Demand {
    required: usize,
    /// Extra tokens accepted after the required ones; `None` is unbounded.
    optional: Option<usize>,
}

impl Demand {
    fn for_arity(arity: Arity) -> Option<Self> {
        let required = arity.min_values();
        let demand = Demand {
            required,
            optional: arity.max_values().map(|max| max - required),
        };
        (!demand.is_exhausted()).then_some(demand)
    }

    fn accept(&mut self) {
        if self.required > 0 {
            self.required -= 1;
        } else if let Some(optional) = self.optional.as_mut() {
            *optional = optional.saturating_sub(1);
        }
    }

    fn is_exhausted(&self) -> bool {
        self.required == 0 && self.optional == Some(0)
    }
}

#[derive(Debug)]
struct Pending {
    slot: Slot,
    spelling: String,
    demand: Demand,
}

/// Scan-local engine state.
struct Scan<'p, 'c> {
    parser: &'p Parser<'c>,
    result: ParseResult,
    pending: Option<Pending>,
    stopped: bool,
}

impl<'p, 'c> Scan<'p, 'c> {
    fn new(parser: &'p Parser<'c>, program: Option<String>) -> Self {
        let flags = parser
            .catalog
            .iter()
            .map(|flag| FlagOccurrences::new(&flag.name))
            .collect();
        Self {
            parser,
            result: ParseResult {
                program,
                flags,
                positionals: Vec::new(),
            },
            pending: None,
            stopped: false,
        }
    }

    fn run(mut self, tokens: Vec<String>) -> Result<ParseResult, ParseError> {
        for token in tokens {
            self.feed(token)?;
        }
        self.finish()
    }

    fn feed(&mut self, token: String) -> Result<(), ParseError> {
        if self.stopped {
            trace!(token = %token, "Positional after stop marker");
            self.result.positionals.push(token);
            return Ok(());
        }

        let class = self.parser.classify(&token);
        trace!(token = %token, class = ?class, "Classified token");
        match class {
            Class::Flag(recognized) => self.open(&token, recognized),
            Class::Stop if self.awaits_token() => {
                self.absorb(token);
                Ok(())
            }
            Class::Stop => {
                self.pending = None;
                self.stopped = true;
                Ok(())
            }
            Class::Unknown => Err(ParseError::UnexpectedFlag { token }),
            Class::Plain => {
                self.absorb(token);
                Ok(())
            }
        }
    }

    /// Whether the open occurrence is still waiting for a token: nothing
    /// received yet, or a required slot left.
    fn awaits_token(&self) -> bool {
        self.pending.as_ref().is_some_and(|pending| {
            let Slot { flag, occurrence } = pending.slot;
            pending.demand.required > 0
                || self.result.flags[flag].all[occurrence].values.is_empty()
        })
    }

    /// Gives `token` to the open occurrence, or makes it a positional.
    fn absorb(&mut self, token: String) {
        let Some(pending) = self.pending.as_mut() else {
            self.result.positionals.push(token);
            return;
        };

        let Slot { flag, occurrence } = pending.slot;
        self.result.flags[flag].all[occurrence].values.push(token);
        pending.demand.accept();
        if pending.demand.is_exhausted() {
            self.pending = None;
        }
    }

    fn open(&mut self, token: &str, recognized: Recognized) -> Result<(), ParseError> {
        self.interrupt(token)?;

        let Recognized {
            flags,
            spelling,
            inline,
        } = recognized;
        let Some((&last, switches)) = flags.split_last() else {
            return Ok(());
        };
        for &flag in switches {
            self.record(flag);
        }
        let slot = self.record(last);

        let catalog = self.parser.catalog;
        let definition = &catalog.flags[last];
        match inline {
            Some(value) if !definition.arity.takes_arguments() => {
                Err(ParseError::UnexpectedArgument {
                    flag: definition.name.clone(),
                    spelling,
                    value,
                })
            }
            Some(value) => {
                self.result.flags[last].all[slot.occurrence]
                    .values
                    .push(value);
                if definition.arity.min_values() > 1 {
                    return Err(ParseError::OptionLacksArgument {
                        flag: definition.name.clone(),
                        spelling,
                        interrupted_by: None,
                    });
                }
                Ok(())
            }
            None => {
                self.pending = Demand::for_arity(definition.arity).map(|demand| Pending {
                    slot,
                    spelling,
                    demand,
                });
                Ok(())
            }
        }
    }

    /// Closes the open occurrence because `token` is a recognized flag.
    fn interrupt(&mut self, token: &str) -> Result<(), ParseError> {
        match self.pending.take() {
            Some(pending) if pending.demand.required > 0 => Err(self.lacking(pending, Some(token))),
            _ => Ok(()),
        }
    }

    fn record(&mut self, flag: usize) -> Slot {
        let all = &mut self.result.flags[flag].all;
        all.push(FlagOccurrence::default());
        Slot {
            flag,
            occurrence: all.len() - 1,
        }
    }

    fn lacking(&self, pending: Pending, interrupted_by: Option<&str>) -> ParseError {
        ParseError::OptionLacksArgument {
            flag: self.parser.catalog.flags[pending.slot.flag].name.clone(),
            spelling: pending.spelling,
            interrupted_by: interrupted_by.map(str::to_string),
        }
    }

    fn finish(mut self) -> Result<ParseResult, ParseError> {
        if let Some(pending) = self.pending.take() {
            if pending.demand.required > 0 {
                return Err(self.lacking(pending, None));
            }
        }
        Ok(self.result)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Arity, ErrorKind, FlagDefinition};

    use super::*;

    fn catalog() -> FlagCatalog {
        FlagCatalog::new()
            .with_flag(FlagDefinition::switch("verbose", ["-v", "--verbose"]))
            .with_flag(FlagDefinition::switch("all", ["-a"]))
            .with_flag(FlagDefinition::new("output", ["-o", "--output"], Arity::One))
            .with_flag(FlagDefinition::new("delim", ["-d"], Arity::Optional))
    }

    #[test]
    fn test_classify_stop_marker() {
        let catalog = catalog();
        let parser = Parser::new(&catalog).unwrap();
        assert!(matches!(parser.classify("--"), Class::Stop));
    }

    #[test]
    fn test_classify_plain_tokens() {
        let catalog = catalog();
        let parser = Parser::new(&catalog).unwrap();
        assert!(matches!(parser.classify("-"), Class::Plain));
        assert!(matches!(parser.classify(""), Class::Plain));
        assert!(matches!(parser.classify("file.txt"), Class::Plain));
    }

    #[test]
    fn test_classify_unknown_tokens() {
        let catalog = catalog();
        let parser = Parser::new(&catalog).unwrap();
        assert!(matches!(parser.classify("-x"), Class::Unknown));
        assert!(matches!(parser.classify("-5"), Class::Unknown));
        assert!(matches!(parser.classify("--nope"), Class::Unknown));
        assert!(matches!(parser.classify("--nope=1"), Class::Unknown));
        assert!(matches!(parser.classify("-vx"), Class::Unknown));
        assert!(matches!(parser.classify("---"), Class::Unknown));
    }

    #[test]
    fn test_classify_long_inline_value() {
        let catalog = catalog();
        let parser = Parser::new(&catalog).unwrap();
        let Class::Flag(recognized) = parser.classify("--output=a=b") else {
            panic!("expected a flag");
        };
        assert_eq!(recognized.flags, vec![2]);
        assert_eq!(recognized.spelling, "--output");
        assert_eq!(recognized.inline.as_deref(), Some("a=b"));
    }

    #[test]
    fn test_classify_cluster_stops_at_argument_flag() {
        let catalog = catalog();
        let parser = Parser::new(&catalog).unwrap();
        let Class::Flag(recognized) = parser.classify("-vaofile") else {
            panic!("expected a flag");
        };
        assert_eq!(recognized.flags, vec![0, 1, 2]);
        assert_eq!(recognized.spelling, "-o");
        assert_eq!(recognized.inline.as_deref(), Some("file"));

        let Class::Flag(recognized) = parser.classify("-ov") else {
            panic!("expected a flag");
        };
        assert_eq!(recognized.flags, vec![2]);
        assert_eq!(recognized.inline.as_deref(), Some("v"));
    }

    #[test]
    fn test_classify_switch_cluster() {
        let catalog = catalog();
        let parser = Parser::new(&catalog).unwrap();
        let Class::Flag(recognized) = parser.classify("-vav") else {
            panic!("expected a flag");
        };
        assert_eq!(recognized.flags, vec![0, 1, 0]);
        assert_eq!(recognized.spelling, "-v");
        assert!(recognized.inline.is_none());
    }

    #[test]
    fn test_demand_for_arity() {
        assert!(Demand::for_arity(Arity::None).is_none());

        let mut one = Demand::for_arity(Arity::One).unwrap();
        assert_eq!(one.required, 1);
        one.accept();
        assert!(one.is_exhausted());

        let mut optional = Demand::for_arity(Arity::Optional).unwrap();
        assert_eq!(optional.required, 0);
        optional.accept();
        assert!(optional.is_exhausted());

        let mut many = Demand::for_arity(Arity::OneOrMore).unwrap();
        many.accept();
        many.accept();
        assert_eq!(many.required, 0);
        assert!(!many.is_exhausted());
    }

    #[test]
    fn test_invalid_catalog_fails_on_empty_input() {
        let bad = FlagCatalog::new().with_flag(FlagDefinition::switch("verbose", ["verbose"]));
        let err = parse(&bad, Vec::<String>::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFlagDefinition);
    }

    #[test]
    fn test_empty_input_has_no_program() {
        let result = parse(&catalog(), Vec::<String>::new()).unwrap();
        assert!(result.program.is_none());
        assert_eq!(result.flags.len(), 4);
        assert!(result.positionals.is_empty());
    }

    #[test]
    fn test_parser_reports_catalog() {
        let catalog = catalog();
        let parser = Parser::new(&catalog).unwrap();
        assert_eq!(parser.catalog().len(), 4);
    }
}
