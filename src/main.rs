// adr-checklist-pdf: Generate ADR chart checklist PDFs

mod filename;
mod layout;
mod persist;
mod record;

use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use persist::{SaveDestination, SavePrefs};

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to read record file: {0}")]
    RecordError(String),
    #[error("Invalid date format: {0}")]
    DateError(String),
    #[error("Failed to store preferences: {0}")]
    PrefsError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// ============================================================================
// CLI
// ============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate ADR chart checklist PDFs")]
struct Args {
    /// Checklist record file (JSON)
    #[arg(short, long)]
    input: String,

    /// Save directory for this run (overrides the remembered one)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Remember the save directory for future runs
    #[arg(long, requires = "dir")]
    remember: bool,

    /// Date used in the output filename (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    date: Option<String>,

    /// Directory used when the save directory is unavailable
    #[arg(long)]
    downloads: Option<PathBuf>,

    /// Preference file holding the remembered save directory
    #[arg(long)]
    config: Option<PathBuf>,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    // Filename date (defaults to today)
    let date = parse_date(&args.date)?;

    // Gather the record and render it
    let record = record::load_record(&args.input)?;
    let output_file = filename::build_filename(&record.patient_name, date);
    let doc = layout::render_checklist(&record)?;

    // Resolve destinations: explicit flag beats the remembered preference
    let prefs_path = args.config.clone().or_else(persist::default_prefs_path);
    let prefs = prefs_path
        .as_deref()
        .map(SavePrefs::load)
        .unwrap_or_default();
    let preferred = args.dir.clone().or_else(|| prefs.save_dir.clone());
    let downloads = args
        .downloads
        .clone()
        .unwrap_or_else(persist::default_downloads_dir);

    let destination =
        persist::save_checklist(&doc, &output_file, preferred.as_deref(), &downloads)?;

    if args.remember {
        if let (Some(dir), Some(path)) = (args.dir.as_ref(), prefs_path.as_deref()) {
            SavePrefs {
                save_dir: Some(dir.clone()),
            }
            .store(path)?;
        }
    }

    match &destination {
        SaveDestination::Directory(path) => println!("✓ Saved to {}", path.display()),
        SaveDestination::Download(path) => println!("✓ Downloaded {}", path.display()),
    }
    println!(
        "  Patient: {}",
        if record.patient_name.is_empty() {
            "(none)"
        } else {
            record.patient_name.as_str()
        }
    );
    println!("  Pages: {}", doc.page_count());

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_date(date_str: &Option<String>) -> Result<NaiveDate, AppError> {
    match date_str {
        Some(s) => {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| AppError::DateError(s.clone()))
        }
        None => Ok(Local::now().date_naive()),
    }
}
