// CSV output for normalized rows

use crate::models::{CSV_HEADERS, NormalizedRow};
use anyhow::{Context, Result};
use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    // Truncate and write the header row
    Create,
    // Add rows after whatever the file already holds
    Append,
}

impl OpenMode {
    // Append when a previous category or file already created the output
    pub fn for_path(path: &Path) -> Self {
        if path.exists() {
            OpenMode::Append
        } else {
            OpenMode::Create
        }
    }
}

pub struct RowWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl RowWriter<File> {
    pub fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        let file = match mode {
            OpenMode::Create => File::create(path),
            OpenMode::Append => OpenOptions::new().append(true).open(path),
        }
        .with_context(|| format!("Failed to open output file {}", path.display()))?;

        RowWriter::from_writer(file, mode == OpenMode::Create)
    }
}

impl<W: Write> RowWriter<W> {
    // The header is written explicitly so that a category with no valid rows
    // still leaves a well-formed file behind
    pub fn from_writer(inner: W, write_header: bool) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        if write_header {
            writer
                .write_record(CSV_HEADERS)
                .context("Failed to write CSV header")?;
        }
        Ok(RowWriter { writer })
    }

    pub fn write_row(&mut self, row: &NormalizedRow) -> Result<()> {
        self.writer
            .serialize(row)
            .with_context(|| format!("Failed to write row for ad {}", row.ad_number))
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV output")
    }

    #[cfg(test)]
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
    }
}
