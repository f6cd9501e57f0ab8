//! PDF Mixer CLI tool
//!
//! A command-line tool for interleaving the pages of two PDFs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use pdf_mixer::job::{InputDocument, MixJob};
use pdf_mixer::pdf::extract_metadata_from_path;

/// PDF Mixer - Interleave the pages of two PDFs
#[derive(Parser)]
#[command(name = "pdf-mixer")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Alternate pages: 1st of odd.pdf, 1st of even.pdf, 2nd of odd.pdf, ...
    pdf-mixer mix odd.pdf even.pdf

    # Merge a duplex scan whose back sides were scanned last-to-first
    pdf-mixer mix fronts.pdf backs.pdf --reverse

    # Show the page order without writing anything
    pdf-mixer mix fronts.pdf backs.pdf --reverse --dry-run

    # Write into a specific file and open it
    pdf-mixer mix a.pdf b.pdf -o merged.pdf --open")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interleave the pages of PDF 1 and PDF 2
    Mix {
        /// PDF 1, contributes the first page of each pair
        first: Option<PathBuf>,

        /// PDF 2, contributes the second page of each pair
        second: Option<PathBuf>,

        /// Reverse the page order of PDF 2 before interleaving
        #[arg(short, long)]
        reverse: bool,

        /// Output PDF file path (default: <pdf1>_mixed_<pdf2>[_reversed].pdf in --output-dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the generated output name
        #[arg(long, env = "PDF_MIXER_OUTPUT_DIR", default_value = ".")]
        output_dir: PathBuf,

        /// Print the page order and exit without writing
        #[arg(long)]
        dry_run: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Mix {
            first, second, reverse, output, output_dir, dry_run, open,
        } => cmd_mix(first, second, reverse, output, output_dir, dry_run, open),
        Commands::Info { input } => cmd_info(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Install the stderr subscriber; `RUST_LOG` takes precedence over `-v`
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

fn load_input(path: Option<PathBuf>) -> Result<Option<InputDocument>> {
    path.map(|p| {
        InputDocument::from_path(&p).with_context(|| format!("Failed to read {}", p.display()))
    })
    .transpose()
}

/// Interleave two PDFs
fn cmd_mix(
    first: Option<PathBuf>,
    second: Option<PathBuf>,
    reverse: bool,
    output: Option<PathBuf>,
    output_dir: PathBuf,
    dry_run: bool,
    open: bool,
) -> Result<()> {
    let job = MixJob {
        first: load_input(first)?,
        second: load_input(second)?,
        reverse_b: reverse,
    };

    eprintln!("{}", job.status());

    if dry_run {
        let plan = job.plan()?;
        println!("{plan}");
        return Ok(());
    }

    let mixed = job.run()?;
    debug!(order = %mixed.plan, "page order");

    let output_path = output.unwrap_or_else(|| output_dir.join(&mixed.file_name));
    std::fs::write(&output_path, &mixed.bytes)
        .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

    println!(
        "Mixed {} pages into: {}",
        mixed.plan.len(),
        output_path.display()
    );

    if open {
        open_file(&output_path)?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: &Path) -> Result<()> {
    let metadata = extract_metadata_from_path(input)
        .with_context(|| format!("Failed to inspect {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(declared) = metadata.declared_page_count {
        if declared != metadata.page_count {
            println!("Declared pages: {}", declared);
        }
    }
    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    Ok(())
}
