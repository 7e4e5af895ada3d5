// src/main.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line front end for logsynth
//!
//! ```bash
//! # 1000 app_log lines of 512 bytes to stdout
//! logsynth
//!
//! # 5000 Apache combined lines, a new file every 1000 lines
//! logsynth -f apache_combined -t log -o access.log -n 5000 -p 1000
//!
//! # 10 MB of gzip-compressed RFC5424 syslog, one second apart
//! logsynth -f rfc5424 -t gz -o syslog.gz -S 10000000 -s 1s
//!
//! # 50 lines per second until killed
//! logsynth -l -r 50
//! ```

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use logsynth::config::{non_negative, parse_duration};
use logsynth::constants::{DEFAULT_OUTPUT, FILLER_POOL_SIZE};
use logsynth::{GenerationConfig, LogFormat, LogGenerator, OutputKind};

#[derive(Parser, Debug)]
#[command(name = "logsynth", version)]
#[command(about = "A fake log generator for common log formats")]
struct Cli {
    /// Log format: app_log, apache_common, apache_combined, apache_error,
    /// rfc3164, rfc5424, common_log, json
    #[arg(short, long, default_value = "app_log")]
    format: String,

    /// Output filename; path-like is allowed
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: String,

    /// Output type: stdout, log, gz
    #[arg(short = 't', long = "type", default_value = "stdout")]
    output_type: String,

    /// Number of lines to generate
    #[arg(short, long, default_value_t = 1000, allow_negative_numbers = true)]
    number: i64,

    /// Length of each log line in bytes (open-message formats)
    #[arg(short, long, default_value_t = 512, allow_negative_numbers = true)]
    bytes: i64,

    /// Total bytes to generate; switches to byte-budget mode
    #[arg(short = 'S', long, default_value_t = 0, allow_negative_numbers = true)]
    total_bytes: i64,

    /// Logical time step between logs (default unit seconds, e.g. 10, 20ms, 1m);
    /// does not actually sleep
    #[arg(short, long, default_value = "0s", allow_hyphen_values = true)]
    sleep: String,

    /// Real pause after each log in bounded modes
    #[arg(short, long, default_value = "0s", allow_hyphen_values = true)]
    delay: String,

    /// Logs per second in loop mode
    #[arg(short, long, default_value_t = 1000, allow_negative_numbers = true)]
    rate: i64,

    /// Maximum lines (or bytes with --total-bytes) per file before splitting
    #[arg(short = 'p', long = "split", default_value_t = 0, allow_negative_numbers = true)]
    split_by: i64,

    /// Overwrite existing log files
    #[arg(short = 'w', long)]
    overwrite: bool,

    /// Loop output forever until killed
    #[arg(short = 'l', long = "loop")]
    forever: bool,

    /// Add sequence numbers to logs
    #[arg(short = 'q', long)]
    seq: bool,

    /// RNG seed for repeatable output
    #[arg(long)]
    seed: Option<u64>,

    /// Precomputed filler phrases (0 generates filler per line)
    #[arg(long, default_value_t = FILLER_POOL_SIZE)]
    pool_size: usize,

    /// Threads for building the filler pool (default: all cores)
    #[arg(long)]
    threads: Option<usize>,
}

impl Cli {
    fn into_config(self) -> logsynth::Result<GenerationConfig> {
        Ok(GenerationConfig {
            format: self.format.parse::<LogFormat>()?,
            output: self.output_type.parse::<OutputKind>()?,
            path: self.output.into(),
            line_count: non_negative("lines", self.number)?,
            line_bytes: non_negative("bytes", self.bytes)? as usize,
            byte_budget: non_negative("total bytes", self.total_bytes)?,
            interval: parse_duration(&self.sleep)?,
            delay: parse_duration(&self.delay)?,
            rate: non_negative("rate", self.rate)?,
            split_by: non_negative("split-by", self.split_by)?,
            forever: self.forever,
            sequence: self.seq,
            overwrite: self.overwrite,
            seed: self.seed,
            filler_pool_size: self.pool_size,
            max_threads: self.threads,
            start_time: None,
        })
    }
}

fn main() -> anyhow::Result<()> {
    // Diagnostics go to stderr so generated lines on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse()
        .into_config()
        .context("invalid options")?;
    config.check_output_path()?;

    let mut generator = LogGenerator::new(config).context("failed to set up generator")?;
    let summary = generator.run().context("log generation failed")?;
    tracing::debug!(
        "Wrote {} lines ({} bytes) to {} file(s)",
        summary.lines,
        summary.bytes,
        summary.files.len()
    );
    Ok(())
}
