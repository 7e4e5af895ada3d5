// src/constants.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Default number of precomputed filler phrases
/// Sampling from the pool avoids generating random text for every line
pub const FILLER_POOL_SIZE: usize = 10_000;

/// Default per-line target length in bytes
pub const DEFAULT_LINE_BYTES: usize = 512;

/// Default number of lines in line-count mode
pub const DEFAULT_LINE_COUNT: u64 = 1000;

/// Default lines per second in forever mode
pub const DEFAULT_RATE: u64 = 1000;

/// Default output path for file sinks
pub const DEFAULT_OUTPUT: &str = "generated.log";

/// Length of one forever-mode pacing cycle
pub const CYCLE: std::time::Duration = std::time::Duration::from_secs(1);

// Timestamp layouts (chrono strftime)

/// `Jan  2 15:04:05` (syslog RFC3164 and app log)
pub const RFC3164_TIME: &str = "%b %e %H:%M:%S";

/// `02/Jan/2006:15:04:05 -0700` (Apache access and common log)
pub const APACHE_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// `Mon Jan 02 15:04:05 2006` (Apache error log)
pub const APACHE_ERROR_TIME: &str = "%a %b %d %H:%M:%S %Y";
