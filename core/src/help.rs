//! Help text rendering for flag catalogs.

use std::fmt;

use crate::FlagCatalog;

/// Writes one entry per definition: the spellings joined with `, ` on an
/// indented line, then the help text indented one level further.
///
/// ```
/// use argtally_core::{Arity, FlagCatalog, FlagDefinition};
///
/// let catalog = FlagCatalog::new()
///     .with_flag(FlagDefinition::switch("help", ["-h", "--help"]).with_help("print help"))
///     .with_flag(
///         FlagDefinition::new("output", ["-o", "--output"], Arity::One)
///             .with_help("output filename"),
///     );
///
/// assert_eq!(
///     catalog.to_string(),
///     "    -h, --help\n        print help\n    -o, --output\n        output filename\n"
/// );
/// ```
impl fmt::Display for FlagCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in self {
            writeln!(f, "    {}", flag.spellings.join(", "))?;
            writeln!(f, "        {}", flag.help)?;
        }
        Ok(())
    }
}
