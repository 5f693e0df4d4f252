// Batch processing of a directory of saved listing pages into one summary CSV

use crate::{
    clock::Clock,
    extract,
    models::ListingType,
    normalize,
    writer::{OpenMode, RowWriter},
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::{
    fs,
    path::{Path, PathBuf},
};

const HTML_EXTENSION: &str = ".html";
const SUMMARY_SUFFIX: &str = "_summary.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub files_processed: usize,
    pub files_failed: usize,
    pub rows_written: usize,
}

// <dir>/<dirname>_summary.csv
pub fn output_path_for(directory: &Path) -> PathBuf {
    let dir_name = directory
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    directory.join(format!("{}{}", dir_name, SUMMARY_SUFFIX))
}

// Saved pages carry the scrape date as YY_MM_DD in their file name
pub fn date_token(today: NaiveDate) -> String {
    today.format("%y_%m_%d").to_string()
}

pub fn is_input_file(file_name: &str, token: &str) -> bool {
    file_name.ends_with(HTML_EXTENSION) && file_name.contains(token)
}

// Today's saved pages in the directory, sorted by file name
fn input_files(directory: &Path, token: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(directory)
        .with_context(|| format!("Failed to read directory {}", directory.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", directory.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_input_file(name, token) && entry.path().is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

// Processes every page saved today in `directory`, appending all rows to
// `<dirname>_summary.csv`. A page that cannot be read or parsed is logged and
// skipped; only an unreadable directory fails the run.
pub fn process_directory(directory: &Path, debug: bool, clock: &dyn Clock) -> Result<RunSummary> {
    let today = clock.today();
    let token = date_token(today);
    let output_path = output_path_for(directory);

    let files = input_files(directory, &token)?;
    tracing::info!(
        directory = %directory.display(),
        date_token = %token,
        "Found {} page(s) to process",
        files.len()
    );

    let mut summary = RunSummary {
        output_path: output_path.clone(),
        files_processed: 0,
        files_failed: 0,
        rows_written: 0,
    };
    let mut inspect_pending = debug;

    for file_path in &files {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tracing::info!("Processing {}...", file_name);

        match process_file(file_path, &output_path, today, &mut inspect_pending) {
            Ok(rows) => {
                summary.files_processed += 1;
                summary.rows_written += rows;
            }
            Err(e) => {
                summary.files_failed += 1;
                tracing::error!("Error processing {}: {:#}", file_name, e);
            }
        }
    }

    tracing::info!(
        files_processed = summary.files_processed,
        files_failed = summary.files_failed,
        rows_written = summary.rows_written,
        "Output saved to: {}",
        output_path.display()
    );
    Ok(summary)
}

fn process_file(
    file_path: &Path,
    output_path: &Path,
    today: NaiveDate,
    inspect_pending: &mut bool,
) -> Result<usize> {
    let html_content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    let listings = extract::extract_listings(&html_content)?;

    let mut rows = 0;
    for listing_type in ListingType::ALL {
        let records = listings.category(listing_type);
        if records.is_empty() {
            continue;
        }

        // Only the first non-empty category of the run gets inspected
        let verbose = std::mem::take(inspect_pending);
        if verbose {
            normalize::log_record_shape(listing_type, &records[0]);
        }

        let mut writer = RowWriter::open(output_path, OpenMode::for_path(output_path))?;
        rows += normalize::process_listings(records, listing_type, today, &mut writer, verbose)?;
        writer.finish()?;
    }
    Ok(rows)
}
