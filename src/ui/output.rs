use crate::error::{DocExtractError, UserFriendlyError};
use crate::extractor::{BatchReport, BatchStatus, ExtractionOutcome};
use crate::ui::progress::format_duration;
use console::{style, Emoji, Term};
use std::path::Path;
use std::time::Duration;

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

/// Console reporting for a run. Created once from the CLI flags and handed to
/// whatever needs to talk to the user.
pub struct OutputFormatter {
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
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

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(1) {
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
    pub fn print_user_friendly_error(&self, error: &DocExtractError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
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

    /// Report a single-file run. `print_text` echoes the extracted text to
    /// stdout; it is printed even in quiet mode since it is the result itself.
    pub fn print_single_outcome(
        &self,
        path: &Path,
        outcome: &ExtractionOutcome,
        destination: Option<&Path>,
        print_text: bool,
    ) {
        if self.mode == OutputMode::Json {
            let mut value = serde_json::json!({
                "type": "result",
                "path": path.display().to_string(),
                "status": if outcome.is_success() { "extracted" } else { "failed" },
                "character_count": outcome.character_count(),
                "word_count": outcome.word_count(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            });
            if let Some(error) = outcome.error_message() {
                value["error_message"] = error.into();
            }
            if let (Some(dest), true) = (destination, outcome.is_success()) {
                value["output_path"] = dest.display().to_string().into();
            }
            if let (Some(text), true) = (outcome.text(), print_text) {
                value["text"] = text.into();
            }
            self.print_json_object(&value);
            return;
        }

        match outcome {
            ExtractionOutcome::Extracted {
                text,
                character_count,
                word_count,
            } => {
                if print_text {
                    println!("{}", text);
                }
                self.success(&format!(
                    "Extracted {} ({} characters, {} words)",
                    path.display(),
                    character_count,
                    word_count
                ));
                if let Some(dest) = destination {
                    self.info(&format!("Saved to {}", dest.display()));
                }
            }
            ExtractionOutcome::Failed { error_message } => {
                self.error(&format!("Failed to extract {}: {}", path.display(), error_message));
            }
        }
    }

    pub fn print_batch_report(&self, report: &BatchReport, elapsed: Duration) {
        match self.mode {
            OutputMode::Json => {
                for warning in batch_warnings(report) {
                    self.warning(&warning);
                }
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => self.error(&format!("Failed to serialize report: {}", e)),
                }
            }
            OutputMode::Human => self.print_human_report(report, elapsed),
            OutputMode::Plain => self.print_plain_report(report, elapsed),
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
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
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
            OutputMode::Json => {} // No separator in JSON mode
        }
    }

    /// One line per entry, used by dry runs.
    pub fn print_list_item(&self, item: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "item",
                "value": item
            })),
            _ => println!("  {}", item),
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

    fn highlight(&self, value: impl ToString) -> String {
        if self.use_colors {
            style(value.to_string()).cyan().bold().to_string()
        } else {
            value.to_string()
        }
    }

    fn print_human_report(&self, report: &BatchReport, elapsed: Duration) {
        if report.status() == BatchStatus::NothingFound {
            self.warning(&format!(
                "No supported files found in {}",
                report.root.display()
            ));
            return;
        }

        if self.quiet {
            for record in report.failures() {
                eprintln!(
                    "✗ {}: {}",
                    record.source_path.display(),
                    record.error_message.as_deref().unwrap_or("unknown error")
                );
            }
            return;
        }

        println!();
        self.print_separator();

        let headline = match (report.cancelled, report.status()) {
            (true, _) => "Extraction cancelled",
            (false, BatchStatus::AllSucceeded) => "Extraction completed!",
            _ => "Extraction completed with errors",
        };
        if self.use_colors {
            let styled = if report.status() == BatchStatus::AllSucceeded && !report.cancelled {
                style(headline).green().bold()
            } else {
                style(headline).yellow().bold()
            };
            println!("{}", styled);
        } else {
            println!("{}", headline);
        }

        println!();
        println!("  Files extracted: {}", self.highlight(report.processed_count));
        println!("  Files failed:    {}", self.highlight(report.error_count));
        println!("  Characters:      {}", self.highlight(report.total_characters()));
        println!("  Words:           {}", self.highlight(report.total_words()));
        println!("  Time taken:      {}", self.highlight(format_duration(elapsed)));

        if report.error_count > 0 {
            println!();
            println!("Failures:");
            for record in report.failures() {
                println!(
                    "  - {}: {}",
                    record.source_path.display(),
                    record.error_message.as_deref().unwrap_or("unknown error")
                );
            }
        }

        if self.verbose_level >= 2 {
            println!();
            println!("Files:");
            for record in &report.file_records {
                println!(
                    "  {} {} ({} chars, {} words)",
                    if record.success { "✓" } else { "✗" },
                    record.source_path.display(),
                    record.character_count,
                    record.word_count
                );
            }
        }

        self.print_separator();
        self.term.flush().ok();
    }

    fn print_plain_report(&self, report: &BatchReport, elapsed: Duration) {
        if report.status() == BatchStatus::NothingFound {
            self.warning(&format!(
                "No supported files found in {}",
                report.root.display()
            ));
            return;
        }

        println!(
            "{}: Extraction",
            if report.cancelled { "CANCELLED" } else { "COMPLETED" }
        );
        println!("Processed: {}", report.processed_count);
        println!("Errors: {}", report.error_count);
        println!("Duration: {:?}", elapsed);
        for record in report.failures() {
            println!(
                "FAILED: {}: {}",
                record.source_path.display(),
                record.error_message.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

/// Warning lines for a finished batch: an empty walk, or one per failed file.
fn batch_warnings(report: &BatchReport) -> Vec<String> {
    if report.status() == BatchStatus::NothingFound {
        return vec![format!(
            "No supported files found in {}",
            report.root.display()
        )];
    }

    report
        .failures()
        .map(|record| {
            format!(
                "Failed to extract {}: {}",
                record.source_path.display(),
                record.error_message.as_deref().unwrap_or("unknown error")
            )
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
