use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that stop value ingestion
///
/// A malformed line is not an error, it is reported through
/// [`Ingested::skipped`](crate::ingest::Ingested) instead.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The input file could not be opened.
    #[error("failed to open value file: {}", path.display())]
    Open {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// Reading from the input failed part way through.
    #[error("failed to read line {line}")]
    Read {
        /// 1-based number of the line being read.
        line: usize,
        /// The underlying error.
        #[source]
        source: io::Error,
    },
}
