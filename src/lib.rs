pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsutil;
pub mod journal;
pub mod options;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, Command, OutputFormat};
pub use config::{CliOverrides, Config, ExtractConfig, LoadConfig, MetadataConfig};
pub use error::{JournalError, Result, UserFriendlyError};

// Core functionality re-exports
pub use engine::{
    try_operation, Dimension, EngineError, JournalEngine, MetadataResolver, OfflineEngine,
    OptionContainer,
};
pub use fsutil::{FileResolver, GlobResolver};
pub use journal::{
    ExtractReport, ExtractRequest, FailurePolicy, JournalSession, LoadReport, LoadRequest,
};
pub use options::{ExtractOptions, LoadOptions, OptionKey, OptionSet, OptionValue};
pub use ui::{BatchProgress, OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Command-level entry point: applies configured options and runs journal
/// operations with terminal progress and output.
pub struct JournalBatch {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl JournalBatch {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create JournalBatch instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet))
    }

    /// Load the journal files matching `journal_files` into the engine.
    pub fn load_journals<E: JournalEngine + ?Sized>(
        &self,
        engine: &mut E,
        journal_files: &str,
    ) -> Result<LoadReport> {
        self.output_formatter.start_operation("Loading journals");

        let mut session = JournalSession::new(engine);
        session.load_options().apply(
            self.config
                .load
                .options
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )?;
        self.show_options(&session.load_options())?;

        let request = LoadRequest::new(journal_files)
            .with_log_dir(self.config.load.log_dir.clone())
            .with_policy(self.config.load.failure_policy());

        let progress = BatchProgress::new(&self.progress_manager);
        session.load_journals(&request, &progress, &progress)
    }

    /// Extract one scenario/year/period of journals from the engine.
    pub fn extract_journals<E: JournalEngine + ?Sized>(
        &self,
        engine: &mut E,
        request: &ExtractRequest,
        metadata: &dyn MetadataResolver,
    ) -> Result<ExtractReport> {
        self.output_formatter.start_operation("Extracting journals");

        let mut session = JournalSession::new(engine);
        session.extract_options().apply(
            self.config
                .extract
                .options
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )?;
        self.show_options(&session.extract_options())?;

        let spinner = self.progress_manager.create_spinner("Extracting journals...");
        let result = session.extract_journals(request, metadata);
        spinner.finish_and_clear();
        result
    }

    /// Reads back the option settings the engine will use and prints them at
    /// `-v` and above.
    fn show_options<K: OptionKey>(&self, options: &OptionSet<'_, K>) -> Result<()> {
        if !self.output_formatter.shows_details() {
            return Ok(());
        }

        for (name, value) in options.snapshot()? {
            self.output_formatter
                .info(&format!("{} option {}: {}", K::OPTION_SET, name, value));
        }
        Ok(())
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &JournalError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
