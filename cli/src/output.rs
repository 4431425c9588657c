//! Output formatting for parse results.

use std::fmt::Write;

use argtally_core::ParseResult;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Text,
}

/// Formats a parse result in the requested output format.
pub fn format_result(result: &ParseResult, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(result).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Text => Ok(result_to_text(result)),
    }
}

/// One line per present flag with its occurrence count, one indented line
/// per occurrence that carries values, then the positionals. Values and
/// positionals are quoted so spaces and empty strings stay visible.
fn result_to_text(result: &ParseResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "program: {}", result.program.as_deref().unwrap_or(""));

    for entry in result.flags.iter().filter(|entry| entry.is_present()) {
        let _ = writeln!(out, "{}: {}", entry.name, entry.count());
        for (index, occurrence) in entry.iter().enumerate() {
            if occurrence.has_value() {
                let _ = write!(out, "  [{index}]");
                for value in &occurrence.values {
                    let _ = write!(out, " {value:?}");
                }
                out.push('\n');
            }
        }
    }

    if !result.positionals.is_empty() {
        out.push_str("positionals:\n");
        for positional in &result.positionals {
            let _ = writeln!(out, "  {positional:?}");
        }
    }

    out
}
