// src/generator.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Production loop: render, write, pace and split
//!
//! A [`LogGenerator`] owns everything mutable in a run (RNG, logical clock,
//! split counters, active sink), so there is no shared state and no locking.

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, Local, TimeDelta};

use crate::config::{GenerationConfig, Mode};
use crate::constants::CYCLE;
use crate::error::{Error, Result};
use crate::fields::{generate_call_entropy, FieldProvider, FillerPool};
use crate::format::apply_sequence;
use crate::sink::Sink;
use crate::split::{SplitPolicy, SplitState, SplitUnit};

/// Simulated timestamp that advances a fixed step per record
///
/// Independent of how long generation actually takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalClock {
    now: DateTime<FixedOffset>,
    step: TimeDelta,
}

impl LogicalClock {
    pub fn new(start: DateTime<FixedOffset>, interval: Duration) -> Result<Self> {
        let step = TimeDelta::from_std(interval).map_err(|_| Error::Interval(interval))?;
        Ok(Self { now: start, step })
    }

    pub fn now(&self) -> &DateTime<FixedOffset> {
        &self.now
    }

    pub fn advance(&mut self) {
        if let Some(next) = self.now.checked_add_signed(self.step) {
            self.now = next;
        }
    }
}

/// Totals for a completed bounded run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Lines written
    pub lines: u64,
    /// Rendered bytes written, excluding newlines
    pub bytes: u64,
    /// Files closed, in creation order (empty for console output)
    pub files: Vec<PathBuf>,
}

/// Drives rendering and output for one configuration
pub struct LogGenerator {
    config: GenerationConfig,
    fields: FieldProvider,
    clock: LogicalClock,
    sequence: u64,
    notices: Box<dyn Write + Send>,
}

impl LogGenerator {
    /// Validate `config` and prepare the field provider and filler pool
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(generate_call_entropy);
        tracing::info!(
            "Creating LogGenerator: format={}, output={}, mode={:?}, line_bytes={}",
            config.format,
            config.output,
            config.mode(),
            config.line_bytes
        );

        let pool = if config.format.is_open_message() {
            FillerPool::build(
                config.line_bytes,
                config.filler_pool_size,
                seed,
                config.max_threads,
            )?
        } else {
            FillerPool::default()
        };
        // derive the line RNG from a different stream than the pool entries
        let fields = FieldProvider::new(Some(seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15))
            .with_pool(pool);

        let start = config
            .start_time
            .unwrap_or_else(|| Local::now().fixed_offset());
        let clock = LogicalClock::new(start, config.interval)?;

        Ok(Self {
            config,
            fields,
            clock,
            sequence: 0,
            notices: Box::new(io::stdout()),
        })
    }

    /// Send "<file> is created." notices somewhere other than stdout
    pub fn with_notices(mut self, notices: impl Write + Send + 'static) -> Self {
        self.notices = Box::new(notices);
        self
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Current logical timestamp
    pub fn clock(&self) -> &LogicalClock {
        &self.clock
    }

    /// Render the next line at the current logical time
    ///
    /// Applies the sequence marker when enabled; does not advance the clock.
    pub fn next_line(&mut self) -> String {
        let format = self.config.format;
        let line = format.render(&mut self.fields, self.clock.now(), self.config.line_bytes);
        if self.config.sequence && format.ends_with_filler() {
            self.sequence += 1;
            apply_sequence(line, self.sequence)
        } else {
            line
        }
    }

    /// Run to completion
    ///
    /// Forever mode only returns on error.
    pub fn run(&mut self) -> Result<GenerationSummary> {
        match self.config.mode() {
            Mode::Forever => {
                self.run_cycles(None)?;
                Ok(GenerationSummary::default())
            }
            Mode::ByteBudget(budget) => {
                self.run_bounded(SplitUnit::Bytes, |state| state.bytes < budget)
            }
            Mode::LineCount(count) => {
                self.run_bounded(SplitUnit::Lines, |state| state.lines < count)
            }
        }
    }

    /// Emit `rate` lines per cycle, sleeping out the rest of each second
    ///
    /// `cycles = None` never stops. No splitting in this mode. The sink is
    /// flushed at the end of every cycle, since the run normally ends by
    /// being killed.
    pub(crate) fn run_cycles(&mut self, cycles: Option<u64>) -> Result<u64> {
        let rate = self.config.rate;
        let mut sink = Sink::open(self.config.output, &self.config.path)?;
        tracing::info!("Forever mode: {} lines per second", rate);

        let mut emitted = 0u64;
        let mut cycle = 0u64;
        while cycles.map_or(true, |limit| cycle < limit) {
            let start = Instant::now();
            for _ in 0..rate {
                let line = self.next_line();
                sink.write_line(&line)?;
                self.clock.advance();
                emitted += 1;
            }
            sink.flush()?;
            let elapsed = start.elapsed();
            let pause = CYCLE.saturating_sub(elapsed);
            tracing::debug!(
                "Cycle {}: {} lines in {:?}, sleeping {:?}",
                cycle,
                rate,
                elapsed,
                pause
            );
            thread::sleep(pause);
            cycle += 1;
        }

        sink.close()?;
        Ok(emitted)
    }

    fn run_bounded(
        &mut self,
        unit: SplitUnit,
        keep_going: impl Fn(&SplitState) -> bool,
    ) -> Result<GenerationSummary> {
        let policy = SplitPolicy::new(self.config.output, self.config.split_by, unit);
        if let Some(policy) = &policy {
            tracing::info!(
                "Splitting output every {} {:?}",
                policy.threshold(),
                policy.unit()
            );
        }

        let mut sink = Sink::open(self.config.output, &self.config.path)?;
        let mut state = SplitState::default();
        let mut files = Vec::new();

        while keep_going(&state) {
            let line = self.next_line();
            sink.write_line(&line)?;
            state.record(line.len());
            tracing::trace!("Line {}: {} bytes", state.lines, line.len());

            if let Some(policy) = &policy {
                if policy.should_split(&state) {
                    let next = state.advance(&self.config.path);
                    tracing::debug!(
                        "Rotating after {} lines / {} bytes to {}",
                        state.lines,
                        state.bytes,
                        next.display()
                    );
                    files.push(self.finish(sink)?);
                    sink = Sink::open(self.config.output, &next)?;
                }
            }

            self.clock.advance();
            if !self.config.delay.is_zero() {
                thread::sleep(self.config.delay);
            }
        }

        if self.config.output.is_file() {
            files.push(self.finish(sink)?);
        } else {
            sink.close()?;
        }

        tracing::info!(
            "Generation complete: {} lines, {} bytes, {} file(s)",
            state.lines,
            state.bytes,
            files.len()
        );
        Ok(GenerationSummary {
            lines: state.lines,
            bytes: state.bytes,
            files,
        })
    }

    /// Close a file sink and announce it
    fn finish(&mut self, sink: Sink) -> Result<PathBuf> {
        let path = sink.path().to_path_buf();
        sink.close()?;
        writeln!(self.notices, "{} is created.", path.display()).map_err(Error::Notice)?;
        tracing::info!("{} is created", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputKind;
    use crate::format::LogFormat;
    use chrono::TimeZone;
    use std::sync::{Arc, Mutex};

    fn init_tracing() {
        use tracing_subscriber::{fmt, EnvFilter};
        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    /// Notice writer whose contents the test can read back
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn start() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
            .unwrap()
    }

    fn base_config(dir: &std::path::Path) -> GenerationConfig {
        GenerationConfig {
            output: OutputKind::Log,
            path: dir.join("generated.log"),
            seed: Some(11),
            filler_pool_size: 256,
            max_threads: Some(2),
            start_time: Some(start()),
            ..Default::default()
        }
    }

    #[test]
    fn test_clock_advances_by_interval() {
        let mut clock = LogicalClock::new(start(), Duration::from_millis(1500)).unwrap();
        clock.advance();
        clock.advance();
        assert_eq!(*clock.now(), start() + TimeDelta::seconds(3));
    }

    #[test]
    fn test_clock_zero_interval_stands_still() {
        let mut clock = LogicalClock::new(start(), Duration::ZERO).unwrap();
        clock.advance();
        assert_eq!(*clock.now(), start());
    }

    #[test]
    fn test_sequence_counts_from_one() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let mut generator = LogGenerator::new(GenerationConfig {
            sequence: true,
            line_bytes: 200,
            ..base_config(dir.path())
        })
        .unwrap();
        for n in 1..=20u64 {
            let line = generator.next_line();
            assert_eq!(line.len(), 199);
            assert!(line.ends_with(&format!(" log_seq:{n}")), "{line}");
        }
    }

    #[test]
    fn test_sequence_skips_closed_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = LogGenerator::new(GenerationConfig {
            format: LogFormat::ApacheCommon,
            sequence: true,
            ..base_config(dir.path())
        })
        .unwrap();
        assert!(!generator.next_line().contains("log_seq:"));
    }

    #[test]
    fn test_line_count_run_without_split() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let notices = Captured::default();
        let config = GenerationConfig {
            line_count: 50,
            line_bytes: 300,
            ..base_config(dir.path())
        };
        let path = config.path.clone();
        let summary = LogGenerator::new(config)
            .unwrap()
            .with_notices(notices.clone())
            .run()
            .unwrap();

        assert_eq!(summary.lines, 50);
        assert_eq!(summary.bytes, 50 * 299);
        assert_eq!(summary.files, vec![path.clone()]);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 50);
        assert!(text.lines().all(|l| l.len() == 299));
        assert_eq!(notices.text(), format!("{} is created.\n", path.display()));
    }

    #[test]
    fn test_byte_budget_run_with_split() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig {
            line_bytes: 201,
            byte_budget: 2000,
            split_by: 600,
            ..base_config(dir.path())
        };
        let summary = LogGenerator::new(config)
            .unwrap()
            .with_notices(io::sink())
            .run()
            .unwrap();

        // 200-byte lines: stop once 2000 bytes are reached
        assert_eq!(summary.lines, 10);
        assert_eq!(summary.bytes, 2000);
        // rotations after totals 800 (>601), 1400 (>1201) and 2000 (>1801)
        let names: Vec<String> = summary
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["generated.log", "generated1.log", "generated2.log", "generated3.log"]
        );
        let counts: Vec<usize> = summary
            .files
            .iter()
            .map(|p| std::fs::read_to_string(p).unwrap().lines().count())
            .collect();
        assert_eq!(counts, vec![4, 3, 3, 0]);
    }

    #[test]
    fn test_timestamps_follow_interval() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig {
            format: LogFormat::Json,
            line_count: 3,
            line_bytes: 600,
            interval: Duration::from_secs(60),
            ..base_config(dir.path())
        };
        let path = config.path.clone();
        LogGenerator::new(config)
            .unwrap()
            .with_notices(io::sink())
            .run()
            .unwrap();

        let stamps: Vec<String> = std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).unwrap();
                v["datetime"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(
            stamps,
            vec![
                "15/Jan/2024:10:30:00 +0000",
                "15/Jan/2024:10:31:00 +0000",
                "15/Jan/2024:10:32:00 +0000"
            ]
        );
    }

    #[test]
    fn test_failed_rotation_closes_current_file() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        // a directory where the first split file should go
        std::fs::create_dir(dir.path().join("generated1.log")).unwrap();
        let notices = Captured::default();
        let config = GenerationConfig {
            line_count: 10,
            line_bytes: 200,
            split_by: 4,
            ..base_config(dir.path())
        };
        let path = config.path.clone();

        let err = LogGenerator::new(config)
            .unwrap()
            .with_notices(notices.clone())
            .run()
            .err()
            .unwrap();
        assert!(matches!(err, Error::Open { .. }), "{err}");

        // the file being rotated away from was closed and announced first
        assert_eq!(notices.text(), format!("{} is created.\n", path.display()));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_delay_follows_each_line() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig {
            line_count: 3,
            line_bytes: 200,
            delay: Duration::from_millis(50),
            ..base_config(dir.path())
        };
        let started = Instant::now();
        let summary = LogGenerator::new(config)
            .unwrap()
            .with_notices(io::sink())
            .run()
            .unwrap();
        assert_eq!(summary.lines, 3);
        assert!(started.elapsed() >= Duration::from_millis(150));
    }

    #[test]
    fn test_forever_output_visible_while_running() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig {
            forever: true,
            rate: 5,
            line_bytes: 200,
            ..base_config(dir.path())
        };
        let path = config.path.clone();
        let mut generator = LogGenerator::new(config).unwrap();

        let worker = thread::spawn(move || generator.run_cycles(Some(4)));
        thread::sleep(Duration::from_millis(2500));

        // three cycles have completed and been flushed by now
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.lines().count() >= 10, "{} lines", text.lines().count());
        assert!(text.ends_with('\n'));
        assert!(text.lines().all(|l| l.len() == 199));

        assert_eq!(worker.join().unwrap().unwrap(), 20);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 20);
    }

    #[test]
    fn test_forever_cycles_pace_to_rate() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig {
            forever: true,
            rate: 50,
            line_bytes: 100,
            interval: Duration::from_secs(1),
            ..base_config(dir.path())
        };
        let path = config.path.clone();
        let mut generator = LogGenerator::new(config).unwrap();

        let started = Instant::now();
        let emitted = generator.run_cycles(Some(2)).unwrap();
        let elapsed = started.elapsed();

        assert_eq!(emitted, 100);
        assert!(elapsed >= Duration::from_millis(1900), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
        assert_eq!(*generator.clock().now(), start() + TimeDelta::seconds(100));

        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text.lines().count(), 100);
    }
}
