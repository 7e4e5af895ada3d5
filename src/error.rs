// src/error.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error type shared by configuration, rendering and output

use std::io;
use std::path::PathBuf;

/// Errors raised while configuring or running a generator
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Format identifier is not one of the supported formats
    #[error("{0} is not a valid format")]
    UnknownFormat(String),

    /// Output kind identifier is not one of stdout/log/gz
    #[error("{0} is not a valid log type")]
    UnknownOutputKind(String),

    /// A numeric option was given a negative value
    #[error("{name} can not be negative")]
    Negative { name: &'static str },

    /// Duration string could not be parsed
    #[error("invalid duration {input:?}: {reason}")]
    Duration { input: String, reason: String },

    /// Base output file exists and overwriting was not requested
    #[error("{} already exists (use --overwrite to replace it)", .0.display())]
    OutputExists(PathBuf),

    /// Output file could not be created
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A line could not be written to the active sink
    #[error("failed to write to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Flushing or finalizing a sink failed
    #[error("failed to close {}: {source}", .path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the completion notice failed
    #[error("failed to write completion notice: {0}")]
    Notice(#[source] io::Error),

    /// The thread pool for filler generation could not be created
    #[error("failed to build filler pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Logical clock interval does not fit a timestamp delta
    #[error("interval {0:?} is out of range for the logical clock")]
    Interval(std::time::Duration),
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, Error>;
