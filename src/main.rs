use clap::Parser;
use journal_batch::cli::{ExtractArgs, LoadArgs, Operation};
use journal_batch::options::{JournalExtractOption, JournalLoadOption};
use journal_batch::{
    Cli, Command, ExtractRequest, JournalBatch, JournalError, OfflineEngine, OutputFormatter,
    OutputMode, UserFriendlyError,
};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "journal-batch.toml";

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level(), cli.quiet);

    let exit_code = run(&cli);
    process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    match &cli.command {
        Command::GenerateConfig { path } => handle_generate_config(path.as_deref()),
        Command::Options { operation } => handle_options(cli, *operation),
        Command::Load(args) => match JournalBatch::from_cli(cli) {
            Ok(app) => handle_load(&app, args),
            Err(e) => {
                print_startup_error(&e);
                exit_code(&e)
            }
        },
        Command::Extract(args) => match JournalBatch::from_cli(cli) {
            Ok(app) => handle_extract(&app, args),
            Err(e) => {
                print_startup_error(&e);
                exit_code(&e)
            }
        },
    }
}

fn handle_load(app: &JournalBatch, args: &LoadArgs) -> i32 {
    let mut engine = OfflineEngine::new();

    match app.load_journals(&mut engine, &args.journal_files) {
        Ok(report) => {
            app.output_formatter().print_load_report(&report);
            if report.is_success() {
                0
            } else {
                2 // Some journal files failed
            }
        }
        Err(e) => {
            app.handle_error(&e);
            exit_code(&e)
        }
    }
}

fn handle_extract(app: &JournalBatch, args: &ExtractArgs) -> i32 {
    let mut engine = OfflineEngine::new();
    let request = ExtractRequest {
        journal_file: args.journal_file.clone(),
        log_file: args.log_file.clone(),
        scenario: args.scenario.clone(),
        year: args.year.clone(),
        period: args.period.clone(),
    };

    match app.extract_journals(&mut engine, &request, &app.config().metadata) {
        Ok(report) => {
            app.output_formatter().print_extract_report(&report);
            0
        }
        Err(e) => {
            app.handle_error(&e);
            exit_code(&e)
        }
    }
}

fn handle_options(cli: &Cli, operation: Option<Operation>) -> i32 {
    let formatter = formatter_for(cli);

    if operation != Some(Operation::Extract) {
        formatter.print_settings::<JournalLoadOption>();
    }
    if operation != Some(Operation::Load) {
        formatter.print_settings::<JournalExtractOption>();
    }
    0
}

fn handle_generate_config(path: Option<&Path>) -> i32 {
    let config_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));

    match JournalBatch::generate_sample_config(config_path) {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                config_path.display()
            );
            println!("\nTo use this configuration:");
            println!(
                "  journal-batch --config {} load <JOURNAL_FILES>",
                config_path.display()
            );
            println!("\nEdit the [metadata] tables to map member labels to identifiers.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn exit_code(error: &JournalError) -> i32 {
    match error {
        JournalError::UnknownOption { .. } | JournalError::InvalidOptionValue { .. } => 3,
        JournalError::FileNotFound { .. } | JournalError::InvalidPattern { .. } => 4,
        JournalError::PathNotWritable { .. } => 5,
        JournalError::LookupFailure { .. } => 6,
        JournalError::OperationFailure { .. } => 7,
        _ => 1, // General error
    }
}

fn formatter_for(cli: &Cli) -> OutputFormatter {
    let mode = match cli.output_format {
        journal_batch::OutputFormat::Human => OutputMode::Human,
        journal_batch::OutputFormat::Json => OutputMode::Json,
        journal_batch::OutputFormat::Plain => OutputMode::Plain,
    };
    OutputFormatter::new(mode, cli.verbose, cli.quiet)
}

fn print_startup_error(error: &JournalError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(verbosity: u8, quiet: bool) {
    let level = match (quiet, verbosity) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("journal_batch={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
