use std::path::PathBuf;

use argtally_core::{ParseError, Parser as FlagParser, ValidationError};
use clap::{ArgAction, Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod loader;
mod output;

use loader::{LoadError, load_catalog};
use output::{OutputFormat, format_result};

#[derive(Debug, Parser)]
#[command(name = "argtally", version, disable_help_subcommand = true)]
#[command(about = "Validate flag catalogs and classify argument vectors")]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Classify an argument vector against a catalog.
    Parse(ParseArgs),
    /// Validate one or more catalog files.
    Validate(ValidateArgs),
    /// Print help text rendered from a catalog.
    Help(HelpArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Catalog file (YAML by .yaml/.yml extension, JSON otherwise).
    #[arg(long)]
    catalog: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Argument vector to classify; the first element is the program name.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Catalog files to validate.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct HelpArgs {
    /// Catalog file (YAML by .yaml/.yml extension, JSON otherwise).
    #[arg(long)]
    catalog: PathBuf,
    /// Usage line printed above the flag list.
    #[arg(long)]
    usage: Option<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("{}: {source}", path.display())]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Rejected argument vectors exit with 2, everything else with 1.
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse(err) if !matches!(err, ParseError::InvalidFlagDefinition(_)) => 2,
            _ => 1,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Validate(args) => run_validate(args),
        Command::Help(args) => run_help(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), CliError> {
    let catalog = load_catalog(&args.catalog)?;
    let parser = FlagParser::new(&catalog).map_err(|source| CliError::Invalid {
        path: args.catalog.clone(),
        source,
    })?;

    let result = parser.parse(args.argv)?;
    info!(
        flags = result.flags.iter().filter(|entry| entry.is_present()).count(),
        positionals = result.positionals.len(),
        "Classified argument vector"
    );

    let rendered = format_result(&result, args.format).map_err(CliError::Other)?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let mut failures = 0usize;
    for path in &args.inputs {
        let catalog = match load_catalog(path) {
            Ok(catalog) => catalog,
            Err(err) => {
                eprintln!("error: {err}");
                failures += 1;
                continue;
            }
        };

        match catalog.validate().into_iter().next() {
            Some(err) => {
                eprintln!("error: {}: {err}", path.display());
                failures += 1;
            }
            None => {
                debug!(path = %path.display(), "Catalog is valid");
                println!("{}: {} flag(s) ok", path.display(), catalog.len());
            }
        }
    }

    if failures > 0 {
        return Err(CliError::Other(format!(
            "{failures} of {} catalog file(s) failed validation",
            args.inputs.len()
        )));
    }

    println!("Validated {} catalog file(s).", args.inputs.len());
    Ok(())
}

fn run_help(args: HelpArgs) -> Result<(), CliError> {
    let catalog = load_catalog(&args.catalog)?;
    if let Some(err) = catalog.validate().into_iter().next() {
        return Err(CliError::Invalid {
            path: args.catalog,
            source: err,
        });
    }

    if let Some(usage) = args.usage {
        println!("{usage}");
        println!();
    }
    print!("{catalog}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_args_keep_hyphens() {
        let cli = Cli::try_parse_from([
            "argtally", "-vv", "parse", "--catalog", "c.yaml", "--", "prog", "-x", "--", "y",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Parse(args) = cli.command else {
            panic!("expected parse");
        };
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.argv, vec!["prog", "-x", "--", "y"]);
    }

    #[test]
    fn test_exit_codes() {
        let rejected = CliError::Parse(ParseError::UnexpectedFlag {
            token: "-x".to_string(),
        });
        assert_eq!(rejected.exit_code(), 2);

        let invalid = CliError::Parse(ValidationError::EmptyFlagName.into());
        assert_eq!(invalid.exit_code(), 1);
        assert_eq!(CliError::Other("boom".to_string()).exit_code(), 1);
    }
}
