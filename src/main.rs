//! chatlog-pdf - render chat entries into a paginated PDF report

use chatlog_pdf::config::{load_config, ReportConfig};
use chatlog_pdf::icons::write_default_icons;
use chatlog_pdf::{dry_run, generate, load_entries, sample_entries, ReportError};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// Render timestamped chat entries into a paginated PDF with inline icons
#[derive(Parser, Debug)]
#[command(name = "chatlog-pdf")]
#[command(version)]
#[command(about = "Render timestamped chat entries into a paginated PDF report")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JSON file with the entries to render (built-in samples if not provided)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Where to write the PDF (defaults to the configured output, chat_log.pdf)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stamp every footer with the current time
    #[arg(long)]
    pub generated_at: bool,

    /// Lay the report out and print a summary without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Write the built-in icon set as PNG files
    Icons {
        /// Directory to write the icons into
        #[arg(long, default_value = "images")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(err) = chatlog_pdf::logging::init(args.verbose) {
        eprintln!("warning: {err}");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ReportError> {
    if let Some(Command::Icons { dir }) = &args.command {
        for path in write_default_icons(dir)? {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReportConfig::default(),
    };
    if args.generated_at {
        config.footer.generated_at = Some(Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
    }
    debug!(?config, "configuration loaded");

    let output = args.output.unwrap_or_else(|| config.output.clone());
    let entries = match &args.input {
        Some(path) => load_entries(path)?,
        None => sample_entries(Local::now().fixed_offset()),
    };
    let icons = config.icon_registry();

    if args.dry_run {
        let finished = dry_run(&config, &icons, &entries, &output)?;
        println!(
            "{} entries laid out on {} pages ({} draw commands), nothing written",
            entries.len(),
            finished.pages,
            finished.sink.commands().len()
        );
    } else {
        let pages = generate(&config, &icons, &entries, &output)?;
        println!("wrote {} ({} pages)", output.display(), pages);
    }
    Ok(())
}
