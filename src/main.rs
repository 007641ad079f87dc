use clap::Parser;
use docextract::{
    Cli, DocExtract, DocExtractError, OutputFormatter, OutputMode, RunOptions, RunOutcome,
    UserFriendlyError,
};
use std::path::Path;
use std::process;
use tokio::task;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();
    setup_logging(cli.verbosity_level(), cli.quiet);

    // Extraction is blocking file and parser work
    let exit_code = match task::spawn_blocking(move || run(cli)).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Extraction task failed: {}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn run(cli: Cli) -> i32 {
    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let docextract = match DocExtract::from_cli(&cli) {
        Ok(docextract) => docextract,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    let Some(input) = cli.input.as_deref() else {
        docextract
            .output_formatter()
            .error("No input file or directory given");
        return 1;
    };

    if cli.dry_run {
        return handle_dry_run(&docextract, input);
    }

    let options = RunOptions {
        output: cli.output.clone(),
        sibling: cli.sibling,
        print_text: cli.should_print_text(),
    };

    match docextract.run(input, &options) {
        Ok(outcome) => {
            if let (RunOutcome::Batch(report), Some(report_path)) = (&outcome, cli.report.as_ref()) {
                if let Err(e) = report.save_json(report_path) {
                    docextract.handle_error(&e);
                    return 1;
                }
                docextract
                    .output_formatter()
                    .info(&format!("Report written to {}", report_path.display()));
            }
            outcome.exit_code()
        }
        Err(e) => {
            docextract.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "docextract.toml".to_string());

    match DocExtract::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  docextract <input> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(docextract: &DocExtract, input: &Path) -> i32 {
    let formatter = docextract.output_formatter();

    formatter.print_header("Dry run: no files will be extracted");

    let config = docextract.config();
    formatter.print_list_item(&format!(
        "Extensions: {}",
        docextract.extensions().to_vec().join(", ")
    ));
    formatter.print_list_item(&format!("Follow links: {}", config.extraction.follow_links));
    formatter.print_list_item(&format!("Jobs: {}", config.effective_jobs()));
    formatter.print_list_item(&format!("Atomic writes: {}", config.output.atomic_writes));
    formatter.print_separator();

    let files = match docextract.plan(input) {
        Ok(files) => files,
        Err(e) => {
            docextract.handle_error(&e);
            return 1;
        }
    };

    if files.is_empty() {
        formatter.warning(&format!("No supported files found in {}", input.display()));
        return 0;
    }

    for file in &files {
        formatter.print_list_item(&file.source_path.display().to_string());
    }
    formatter.print_separator();
    formatter.info(docextract.plan_statistics(&files).display_summary().trim_end());
    formatter.success(&format!("{} file(s) would be extracted", files.len()));

    0
}

fn print_startup_error(error: &DocExtractError) {
    // Create a basic formatter for startup errors
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

    // RUST_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docextract={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
