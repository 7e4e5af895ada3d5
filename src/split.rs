// src/split.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output splitting: when to rotate and what the next file is called
//!
//! Thresholds are checked as multiples of the split size against the running
//! totals of the whole run. Line splits fire once `lines > split * index`;
//! byte splits once `bytes > split * index + 1`. So the first file of a
//! line-split run holds `split + 1` lines. These rules are kept as-is so
//! output matches earlier releases.

use std::path::{Path, PathBuf};

use crate::config::OutputKind;

/// What the split threshold counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitUnit {
    Lines,
    Bytes,
}

/// Immutable split settings for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPolicy {
    threshold: u64,
    unit: SplitUnit,
}

impl SplitPolicy {
    /// Policy for `output`; `None` when splitting is inactive
    ///
    /// Console output never splits, and neither does a threshold of 0.
    pub fn new(output: OutputKind, threshold: u64, unit: SplitUnit) -> Option<Self> {
        if !output.is_file() || threshold == 0 {
            return None;
        }
        Some(Self { threshold, unit })
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn unit(&self) -> SplitUnit {
        self.unit
    }

    /// True when the totals in `state` cross the next rotation point
    pub fn should_split(&self, state: &SplitState) -> bool {
        let boundary = self.threshold.saturating_mul(state.index);
        match self.unit {
            SplitUnit::Lines => state.lines > boundary,
            SplitUnit::Bytes => state.bytes > boundary.saturating_add(1),
        }
    }
}

/// Running totals and the 1-based index of the next split file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitState {
    /// Suffix of the next split file; also the multiplier for the threshold
    pub index: u64,
    /// Lines emitted so far in this run
    pub lines: u64,
    /// Rendered bytes (without newlines) emitted so far in this run
    pub bytes: u64,
}

impl Default for SplitState {
    fn default() -> Self {
        Self {
            index: 1,
            lines: 0,
            bytes: 0,
        }
    }
}

impl SplitState {
    /// Account for one emitted line of `len` bytes
    pub fn record(&mut self, len: usize) {
        self.lines += 1;
        self.bytes += len as u64;
    }

    /// Name for the next file and advance the index
    pub fn advance(&mut self, base: &Path) -> PathBuf {
        let next = split_file_name(base, self.index);
        self.index += 1;
        next
    }
}

/// Insert `count` before the extension of the last path component
///
/// `generated.log` → `generated3.log`; `out` → `out2`; a leading-dot name
/// such as `.log` is treated entirely as extension (`3.log`).
pub fn split_file_name(path: &Path, count: u64) -> PathBuf {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        let mut raw = path.as_os_str().to_owned();
        raw.push(count.to_string());
        return PathBuf::from(raw);
    };
    let renamed = match name.rfind('.') {
        Some(dot) => format!("{}{}{}", &name[..dot], count, &name[dot..]),
        None => format!("{name}{count}"),
    };
    path.with_file_name(renamed)
}
