// src/config.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run configuration and the validation applied before generation starts

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::format::LogFormat;

/// Where generated lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Standard output, never closed
    #[default]
    Stdout,
    /// Plain file at the output path
    Log,
    /// Gzip-compressed file at the output path
    Gz,
}

impl OutputKind {
    pub fn name(self) -> &'static str {
        match self {
            OutputKind::Stdout => "stdout",
            OutputKind::Log => "log",
            OutputKind::Gz => "gz",
        }
    }

    pub fn is_file(self) -> bool {
        self != OutputKind::Stdout
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "stdout" => Ok(OutputKind::Stdout),
            "log" => Ok(OutputKind::Log),
            "gz" => Ok(OutputKind::Gz),
            other => Err(Error::UnknownOutputKind(other.to_string())),
        }
    }
}

/// How a run decides when to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `rate` lines per second until the process is killed
    Forever,
    /// Until this many rendered bytes have been emitted
    ByteBudget(u64),
    /// Until this many lines have been emitted
    LineCount(u64),
}

/// Configuration for a generation run
///
/// Built once at startup; the generator never mutates it.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Log format to render
    pub format: LogFormat,
    /// Output destination kind
    pub output: OutputKind,
    /// Base output path; its extension is kept when naming split files
    pub path: PathBuf,
    /// Lines to emit in line-count mode
    pub line_count: u64,
    /// Target length of each line for open-message formats (0 = prefix only)
    pub line_bytes: usize,
    /// Total rendered bytes to emit; non-zero selects byte-budget mode
    pub byte_budget: u64,
    /// Logical clock step per record (does not sleep)
    pub interval: Duration,
    /// Real wall-clock pause after each record in bounded modes
    pub delay: Duration,
    /// Lines per second in forever mode
    pub rate: u64,
    /// Lines (line-count mode) or bytes (byte-budget mode) per file, 0 = no split
    pub split_by: u64,
    /// Run until killed
    pub forever: bool,
    /// Replace the tail of filler-terminated lines with ` log_seq:<n>`
    pub sequence: bool,
    /// Allow replacing an existing output file
    pub overwrite: bool,
    /// RNG seed (None = time + urandom)
    pub seed: Option<u64>,
    /// Entries in the precomputed filler pool (0 = generate per line)
    pub filler_pool_size: usize,
    /// Threads used to build the filler pool (None = all cores)
    pub max_threads: Option<usize>,
    /// First logical timestamp (None = now, local offset)
    pub start_time: Option<DateTime<FixedOffset>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::AppLog,
            output: OutputKind::Stdout,
            path: PathBuf::from(DEFAULT_OUTPUT),
            line_count: DEFAULT_LINE_COUNT,
            line_bytes: DEFAULT_LINE_BYTES,
            byte_budget: 0,
            interval: Duration::ZERO,
            delay: Duration::ZERO,
            rate: DEFAULT_RATE,
            split_by: 0,
            forever: false,
            sequence: false,
            overwrite: false,
            seed: None,
            filler_pool_size: FILLER_POOL_SIZE,
            max_threads: None,
            start_time: None,
        }
    }
}

impl GenerationConfig {
    /// Mode selected by this configuration
    pub fn mode(&self) -> Mode {
        if self.forever {
            Mode::Forever
        } else if self.byte_budget > 0 {
            Mode::ByteBudget(self.byte_budget)
        } else {
            Mode::LineCount(self.line_count)
        }
    }

    /// Check settings that cannot be expressed by the field types
    pub fn validate(&self) -> Result<()> {
        if chrono::TimeDelta::from_std(self.interval).is_err() {
            return Err(Error::Interval(self.interval));
        }
        Ok(())
    }

    /// Refuse to clobber the base output file unless overwriting is allowed
    pub fn check_output_path(&self) -> Result<()> {
        if self.output.is_file() && !self.overwrite && self.path.exists() {
            return Err(Error::OutputExists(self.path.clone()));
        }
        Ok(())
    }
}

/// Reject negative values for option `name`
pub fn non_negative(name: &'static str, value: i64) -> Result<u64> {
    u64::try_from(value).map_err(|_| Error::Negative { name })
}

/// Parse an interval such as `10`, `0.5`, `20ms`, `5s` or `1m30s`
///
/// A bare number is seconds. Otherwise the string is a sequence of
/// `<number><unit>` pairs with units `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let s = input.trim();
    let invalid = |reason: &str| Error::Duration {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if s.is_empty() {
        return Err(invalid("empty duration"));
    }
    if s.starts_with('-') {
        return Err(invalid("sleep time must be positive"));
    }

    if let Ok(secs) = s.parse::<f64>() {
        return Duration::try_from_secs_f64(secs).map_err(|e| invalid(&e.to_string()));
    }

    let mut total = Duration::ZERO;
    let mut rest = s;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| invalid("missing unit"))?;
        if digits == 0 {
            return Err(invalid("expected a number"));
        }
        let value: f64 = rest[..digits]
            .parse()
            .map_err(|_| invalid("malformed number"))?;
        rest = &rest[digits..];

        let (unit_secs, len) = [
            ("ns", 1e-9),
            ("us", 1e-6),
            ("µs", 1e-6),
            ("ms", 1e-3),
            ("s", 1.0),
            ("m", 60.0),
            ("h", 3600.0),
        ]
        .into_iter()
        .find(|(unit, _)| rest.starts_with(*unit))
        .map(|(unit, secs)| (secs, unit.len()))
        .ok_or_else(|| invalid("unknown unit"))?;
        rest = &rest[len..];

        total += Duration::try_from_secs_f64(value * unit_secs).map_err(|e| invalid(&e.to_string()))?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.format, LogFormat::AppLog);
        assert_eq!(config.output, OutputKind::Stdout);
        assert_eq!(config.path, PathBuf::from("generated.log"));
        assert_eq!(config.line_bytes, 512);
        assert_eq!(config.mode(), Mode::LineCount(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mode_selection() {
        let mut config = GenerationConfig {
            byte_budget: 4096,
            ..Default::default()
        };
        assert_eq!(config.mode(), Mode::ByteBudget(4096));
        config.forever = true;
        assert_eq!(config.mode(), Mode::Forever);
    }

    #[test]
    fn test_output_kind_parse() {
        assert_eq!("stdout".parse::<OutputKind>().unwrap(), OutputKind::Stdout);
        assert_eq!("log".parse::<OutputKind>().unwrap(), OutputKind::Log);
        assert_eq!("gz".parse::<OutputKind>().unwrap(), OutputKind::Gz);
        let err = "zip".parse::<OutputKind>().unwrap_err();
        assert_eq!(err.to_string(), "zip is not a valid log type");
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative("lines", 5).unwrap(), 5);
        let err = non_negative("lines", -1).unwrap_err();
        assert_eq!(err.to_string(), "lines can not be negative");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("0.5").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("20ms").unwrap(), Duration::from_millis(20));
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("250us").unwrap(), Duration::from_micros(250));
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_rejects() {
        for bad in ["", "-1", "-5s", "abc", "5x", "ms", "1.2.3s"] {
            assert!(parse_duration(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_check_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("existing.log");
        std::fs::write(&path, "old\n").unwrap();

        let mut config = GenerationConfig {
            output: OutputKind::Log,
            path: path.clone(),
            ..Default::default()
        };
        assert!(matches!(config.check_output_path(), Err(Error::OutputExists(_))));

        config.overwrite = true;
        assert!(config.check_output_path().is_ok());

        config.overwrite = false;
        config.output = OutputKind::Stdout;
        assert!(config.check_output_path().is_ok());
    }
}
