use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "journal-batch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Load and extract journals against a consolidation application")]
#[command(
    long_about = "journal-batch loads journal files into a consolidation application and \
                  extracts journals back out to text files, writing one log file per data file."
)]
#[command(after_help = "EXAMPLES:\n  \
    journal-batch load 'journals/*.jlf' --log-dir logs\n  \
    journal-batch load q1.jlf -O Delimiter='|' --fail-fast\n  \
    journal-batch extract out/q1.jlf --scenario Actual --year 2024 --period January\n  \
    journal-batch options extract")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load journals from one or more text files
    Load(LoadArgs),
    /// Extract journals to a text file
    Extract(ExtractArgs),
    /// List the options an operation accepts
    Options {
        #[arg(value_enum)]
        operation: Option<Operation>,
    },
    /// Write a sample configuration file
    GenerateConfig {
        /// Destination (defaults to journal-batch.toml)
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Path to the source journal file(s); use wildcards in the file name to
    /// load several files from one directory
    #[arg(value_name = "JOURNAL_FILES")]
    pub journal_files: String,

    /// Folder for log files (defaults to the folder of each journal file)
    #[arg(short, long)]
    pub log_dir: Option<PathBuf>,

    /// Load option assignment, e.g. -O Delimiter=';'
    #[arg(short = 'O', long = "option", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub options: Vec<(String, String)>,

    /// Stop at the first journal file that fails
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Path to the generated journal extract file
    #[arg(value_name = "JOURNAL_FILE")]
    pub journal_file: PathBuf,

    /// Path to the extract log file (defaults to the journal file with a .log extension)
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// The scenario to include in the extract
    #[arg(long)]
    pub scenario: String,

    /// The year to include in the extract
    #[arg(long)]
    pub year: String,

    /// The period to include in the extract
    #[arg(long)]
    pub period: String,

    /// Extract option assignment, e.g. -O Regular=true
    #[arg(short = 'O', long = "option", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub options: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    Load,
    Extract,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        match &self.command {
            Command::Load(args) => CliOverrides::new()
                .with_log_dir(args.log_dir.clone())
                .with_fail_fast(args.fail_fast)
                .with_load_options(args.options.clone()),
            Command::Extract(args) => {
                CliOverrides::new().with_extract_options(args.options.clone())
            }
            _ => CliOverrides::new(),
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Parses a `NAME=VALUE` option assignment. The value may be empty.
pub fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected NAME=VALUE but got '{}'", s))?;

    let name = name.trim();
    if name.is_empty() {
        return Err("Option name must not be empty".to_string());
    }

    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("Delimiter=;").unwrap(),
            ("Delimiter".to_string(), ";".to_string())
        );
        assert_eq!(
            parse_assignment("Delimiter=a=b").unwrap(),
            ("Delimiter".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment(" Regular =true").unwrap(),
            ("Regular".to_string(), "true".to_string())
        );
        assert!(parse_assignment("Delimiter").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_parse_load_command() {
        let cli = Cli::try_parse_from([
            "journal-batch",
            "load",
            "journals/*.jlf",
            "--log-dir",
            "logs",
            "-O",
            "Delimiter=|",
            "--fail-fast",
        ])
        .unwrap();

        match &cli.command {
            Command::Load(args) => {
                assert_eq!(args.journal_files, "journals/*.jlf");
                assert_eq!(args.log_dir, Some(PathBuf::from("logs")));
                assert_eq!(args.options, vec![("Delimiter".to_string(), "|".to_string())]);
                assert!(args.fail_fast);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let overrides = cli.create_cli_overrides();
        assert!(overrides.fail_fast);
        assert!(overrides.extract_options.is_empty());
    }

    #[test]
    fn test_parse_extract_command() {
        let cli = Cli::try_parse_from([
            "journal-batch",
            "extract",
            "out/q1.jlf",
            "--scenario",
            "Actual",
            "--year",
            "2024",
            "--period",
            "January",
            "-O",
            "Regular=true",
            "--output-format",
            "json",
        ])
        .unwrap();

        match &cli.command {
            Command::Extract(args) => {
                assert_eq!(args.journal_file, PathBuf::from("out/q1.jlf"));
                assert!(args.log_file.is_none());
                assert_eq!(args.period, "January");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(matches!(cli.output_format, OutputFormat::Json));
    }

    #[test]
    fn test_extract_requires_selection() {
        let result = Cli::try_parse_from(["journal-batch", "extract", "out/q1.jlf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::try_parse_from(["journal-batch", "-vv", "options"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);

        let cli = Cli::try_parse_from(["journal-batch", "-q", "options"]).unwrap();
        assert_eq!(cli.verbosity_level(), 0);
    }
}
