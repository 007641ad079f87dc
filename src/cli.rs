use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docextract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract plain text from PDF, HWP, HWPX, Excel, Word and ZIP documents")]
#[command(
    long_about = "DocExtract pulls the text out of a single document or every supported \
                  document under a directory, printing it, writing it next to each source, \
                  or mirroring the directory tree into an output folder."
)]
#[command(after_help = "EXAMPLES:\n  \
    docextract document.pdf                  # Extract and print to console\n  \
    docextract document.pdf -o output.txt    # Extract and save to file\n  \
    docextract ./docs/ -o ./output/          # Process an entire directory\n  \
    docextract ./docs/ --formats hwp,hwpx    # Only Hangul documents\n  \
    docextract document.hwp -v               # Extract with verbose logging")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input file or directory to process
    #[arg(required_unless_present = "generate_config")]
    pub input: Option<PathBuf>,

    /// Output file (single input) or directory (directory input)
    #[arg(short, long, conflicts_with = "sibling")]
    pub output: Option<PathBuf>,

    /// Write <name>.txt next to each source document
    #[arg(long)]
    pub sibling: bool,

    /// File formats to extract (comma-separated)
    #[arg(short, long, help = "File extensions to extract (e.g., pdf,hwp,docx)")]
    pub formats: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Print the extracted text even when writing it to a file
    #[arg(long)]
    pub print_text: bool,

    /// Write the directory report as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Worker threads for directory runs (0 = one per CPU)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Follow symbolic links while walking directories
    #[arg(long)]
    pub follow_links: bool,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "List the files that would be extracted without extracting them")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
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
        CliOverrides::new()
            .with_formats(self.formats.clone())
            .with_jobs(self.jobs)
            .with_follow_links(self.follow_links.then_some(true))
    }

    /// Text goes to stdout when asked for, or when there is nowhere else for
    /// it to go.
    pub fn should_print_text(&self) -> bool {
        self.print_text || (self.output.is_none() && !self.sibling)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("docextract").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_single_file_arguments() {
        let cli = parse(&["report.docx", "-o", "out/report.txt"]);
        assert_eq!(cli.input, Some(PathBuf::from("report.docx")));
        assert_eq!(cli.output, Some(PathBuf::from("out/report.txt")));
        assert!(!cli.should_print_text());
    }

    #[test]
    fn test_prints_text_without_output() {
        let cli = parse(&["report.pdf"]);
        assert!(cli.should_print_text());

        let cli = parse(&["report.pdf", "--sibling"]);
        assert!(!cli.should_print_text());

        let cli = parse(&["report.pdf", "-o", "x.txt", "--print-text"]);
        assert!(cli.should_print_text());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["docextract", "docs", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_conflicts_with_sibling() {
        let result = Cli::try_parse_from(["docextract", "docs", "-o", "out", "--sibling"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_config_needs_no_input() {
        let cli = parse(&["--generate-config"]);
        assert!(cli.generate_config);
        assert!(cli.input.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = parse(&["docs", "-f", "PDF,.hwp", "-j", "4", "--follow-links"]);
        let overrides = cli.create_cli_overrides();

        assert_eq!(overrides.formats.as_deref(), Some("PDF,.hwp"));
        assert_eq!(overrides.jobs, Some(4));
        assert_eq!(overrides.follow_links, Some(true));

        let mut config = Config::default();
        config.merge_with_cli_args(&overrides);
        assert_eq!(config.extraction.extensions, vec!["pdf", "hwp"]);
    }

    #[test]
    fn test_verbosity_level() {
        assert_eq!(parse(&["docs", "-vv"]).verbosity_level(), 2);
        assert_eq!(parse(&["docs", "-q"]).verbosity_level(), 0);
    }
}
