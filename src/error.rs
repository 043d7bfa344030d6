use std::collections::TryReserveError;
use std::io;
use std::str::Utf8Error;

use crate::record::ParseRecordError;

/// Errors surfaced while building or configuring an [`Index`](crate::Index).
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        source: ParseRecordError,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
    #[error("could not grow county table of {state:?}: {source}")]
    Capacity {
        state: String,
        source: TryReserveError,
    },
    #[error("county table of {state:?} would need {buckets} buckets, over the limit of {limit}")]
    TableLimit {
        state: String,
        buckets: usize,
        limit: usize,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
}
