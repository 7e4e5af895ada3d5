// src/lib.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fake log generator for common log formats
//!
//! This library provides:
//! - Renderers for app, Apache access/error, syslog (RFC3164/RFC5424) and JSON logs
//! - Exact line lengths for open-message formats via precomputed filler text
//! - Console, plain file and gzip output
//! - Line-count, byte-budget and rate-paced forever modes on a logical clock
//! - Output splitting by line or byte thresholds

// Core modules
pub mod config;
pub mod constants;
pub mod error;
pub mod fields;
pub mod format;
pub mod generator;
pub mod sink;
pub mod split;

// Re-export main API
pub use config::{GenerationConfig, Mode, OutputKind};
pub use error::{Error, Result};
pub use fields::{FieldProvider, FillerPool};
pub use format::LogFormat;
pub use generator::{GenerationSummary, LogGenerator, LogicalClock};
pub use sink::Sink;
pub use split::{split_file_name, SplitPolicy, SplitState, SplitUnit};
