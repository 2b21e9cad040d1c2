//! slidetime CLI - PPTX slide transition duration extraction tool
//!
//! Reads a PowerPoint presentation and reports each slide's transition
//! duration as an .xlsx spreadsheet or JSON.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use slidetime::{ExtractConfig, JsonFormat};

/// Default output filename for the spreadsheet report.
const DEFAULT_OUTPUT: &str = "slide_durations.xlsx";

/// PPTX slide transition duration extraction
#[derive(Parser)]
#[command(
    name = "slidetime",
    version,
    about = "Extract slide transition durations from PPTX presentations",
    long_about = "slidetime - PPTX slide transition duration extraction tool.\n\n\
                  Reads each slide of a presentation, collects its transition's\n\
                  advance time in seconds, and writes an ordered two-column report."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract durations to an .xlsx spreadsheet
    #[command(visible_alias = "x")]
    Extract {
        /// Input presentation path
        input: PathBuf,

        /// Output spreadsheet path
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// Extract durations as JSON
    Json {
        /// Input presentation path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Extract { input, output } => {
            let pb = create_spinner("Scanning slides...");

            let config = ExtractConfig::new(&input, &output);
            slidetime::run(&config)?;

            pb.finish_and_clear();
            println!(
                "{} Slide durations exported: {}",
                "✓".green().bold(),
                output.display()
            );
            println!("Done");
        }

        Commands::Json {
            input,
            output,
            compact,
        } => {
            let pb = create_spinner("Scanning slides...");

            let report = slidetime::extract_file(&input)?;
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = report.to_json(format)?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!(
                    "{} Slide durations exported: {}",
                    "✓".green().bold(),
                    path.display()
                );
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "slidetime".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("PPTX slide transition duration extraction");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
