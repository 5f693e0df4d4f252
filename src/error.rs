// Error types for the extraction pipeline
// File-level failures are caught by the driver, record-level ones by the normalizer.

use thiserror::Error;

// Failures that make a single HTML file unusable
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not find __NEXT_DATA__ script tag in HTML")]
    MissingDataBlock,

    #[error("embedded data block is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    // The fixed path props.pageProps.dehydratedState.queries[0].state.data is missing
    #[error("listings payload not found: {0}")]
    Navigation(String),
}

// Failures while turning one listing into a row (FieldAccessFailure)
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing or malformed field: {0}")]
    FieldAccess(#[from] serde_json::Error),

    #[error("invalid production date {year}-{month:02}")]
    InvalidProductionDate { year: i32, month: u32 },
}

pub type RecordResult<T> = Result<T, RecordError>;
