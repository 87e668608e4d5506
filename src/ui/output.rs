use crate::error::{JournalError, UserFriendlyError};
use crate::journal::{ExtractReport, LoadReport};
use crate::options::OptionKey;
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// True when `info` messages are shown (`-v` and above).
    pub fn shows_details(&self) -> bool {
        self.should_show_message(1)
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &JournalError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Summary and reporting
    pub fn print_load_report(&self, report: &LoadReport) {
        match self.mode {
            OutputMode::Human => self.print_human_load_report(report),
            OutputMode::Json => self.print_json_object(&load_report_json(report)),
            OutputMode::Plain => self.print_plain_load_report(report),
        }
    }

    pub fn print_extract_report(&self, report: &ExtractReport) {
        match self.mode {
            OutputMode::Human => {
                if self.quiet {
                    return;
                }
                self.success(&format!(
                    "Extracted journals to {} in {}",
                    report.request.journal_file.display(),
                    format_duration(report.elapsed)
                ));
                println!("  Log file: {}", report.request.log_file.display());
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "extract_report",
                    "request": report.request,
                    "duration_ms": report.elapsed.as_millis() as u64,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }));
            }
            OutputMode::Plain => {
                println!("REPORT: Journal extract completed");
                println!("Journal file: {}", report.request.journal_file.display());
                println!("Log file: {}", report.request.log_file.display());
                println!("Duration: {:?}", report.elapsed);
            }
        }
    }

    /// Lists the user-facing settings of one option set.
    pub fn print_settings<K: OptionKey>(&self) {
        match self.mode {
            OutputMode::Json => {
                let settings: Vec<_> = K::SETTINGS
                    .iter()
                    .map(|setting| {
                        serde_json::json!({
                            "name": setting.name(),
                            "type": setting.value_type(),
                            "description": setting.description,
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "options",
                    "operation": K::OPTION_SET,
                    "settings": settings
                }));
            }
            _ => {
                self.print_header(&format!("{} options", K::OPTION_SET));
                for setting in K::SETTINGS {
                    let name = if self.use_colors {
                        style(format!("{:<10}", setting.name())).cyan().bold().to_string()
                    } else {
                        format!("{:<10}", setting.name())
                    };
                    println!(
                        "  {} {:<10} {}",
                        name,
                        setting.value_type().label(),
                        setting.description
                    );
                }
            }
        }
    }

    // Specialized output methods
    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{}{}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_load_report(&self, report: &LoadReport) {
        if !self.quiet {
            println!();
            self.print_separator();

            for outcome in &report.outcomes {
                match outcome.error {
                    None => println!(
                        "  {}{}  (log: {})",
                        CHECKMARK,
                        outcome.item.display_name(),
                        outcome.item.log_file.display()
                    ),
                    Some(ref error) => println!(
                        "  {}{}  {}",
                        CROSS,
                        outcome.item.display_name(),
                        if self.use_colors {
                            style(error.user_message()).red().to_string()
                        } else {
                            error.user_message()
                        }
                    ),
                }
            }
            if !report.outcomes.is_empty() {
                println!();
            }

            println!("  Files matched:   {}", report.total_files);
            println!("  Loaded:          {}", report.succeeded());
            println!("  Failed:          {}", report.failed());
            if report.aborted {
                println!("  Not attempted:   {}", report.skipped());
            }
            println!("  Time taken:      {}", format_duration(report.elapsed));
            self.print_separator();
        }

        if report.total_files == 0 {
            self.warning("No journal files matched the given path");
        } else if report.is_success() {
            self.success(&format!("Loaded {} journal files", report.succeeded()));
        } else if report.aborted {
            self.error("Journal load stopped after the first failure");
        } else {
            self.error(&format!(
                "{} of {} journal files failed to load",
                report.failed(),
                report.total_files
            ));
        }
    }

    fn print_plain_load_report(&self, report: &LoadReport) {
        println!("REPORT: Journal load completed");
        for outcome in &report.outcomes {
            match outcome.error {
                None => println!("OK: {}", outcome.item.source.display()),
                Some(ref error) => println!("FAILED: {}: {}", outcome.item.source.display(), error),
            }
        }
        println!("Files: {}", report.total_files);
        println!("Loaded: {}", report.succeeded());
        println!("Failed: {}", report.failed());
        if report.aborted {
            println!("Not attempted: {}", report.skipped());
        }
        println!("Duration: {:?}", report.elapsed);
    }
}

fn load_report_json(report: &LoadReport) -> serde_json::Value {
    let files: Vec<_> = report
        .outcomes
        .iter()
        .map(|outcome| {
            serde_json::json!({
                "journal_file": outcome.item.source,
                "log_file": outcome.item.log_file,
                "status": if outcome.is_success() { "loaded" } else { "failed" },
                "error": outcome.error.as_ref().map(|e| e.to_string()),
            })
        })
        .collect();

    serde_json::json!({
        "type": "load_report",
        "files": files,
        "total_files": report.total_files,
        "loaded": report.succeeded(),
        "failed": report.failed(),
        "aborted": report.aborted,
        "duration_ms": report.elapsed.as_millis() as u64,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}
