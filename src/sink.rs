// src/sink.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output destinations for generated lines

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::config::OutputKind;
use crate::error::{Error, Result};

/// An open output destination
///
/// Console output is never closed (the process owns stdout); file sinks are
/// flushed on [`Sink::close`], and the gzip sink writes its trailer before the
/// file is released.
pub enum Sink {
    Console(Stdout),
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
    Gzip {
        path: PathBuf,
        encoder: GzEncoder<BufWriter<File>>,
    },
}

impl Sink {
    /// Open a sink of `kind`, creating or truncating the file at `path`
    pub fn open(kind: OutputKind, path: &Path) -> Result<Self> {
        let create = || {
            File::create(path).map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            })
        };

        let sink = match kind {
            OutputKind::Stdout => Sink::Console(io::stdout()),
            OutputKind::Log => Sink::File {
                path: path.to_path_buf(),
                writer: BufWriter::new(create()?),
            },
            OutputKind::Gz => Sink::Gzip {
                path: path.to_path_buf(),
                encoder: GzEncoder::new(BufWriter::new(create()?), Compression::default()),
            },
        };
        tracing::debug!("Opened {} sink at {}", kind, path.display());
        Ok(sink)
    }

    /// Path of the backing file (`-` for the console)
    pub fn path(&self) -> &Path {
        match self {
            Sink::Console(_) => Path::new("-"),
            Sink::File { path, .. } | Sink::Gzip { path, .. } => path,
        }
    }

    /// Write `line` followed by a newline in one call
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        let mut record = Vec::with_capacity(line.len() + 1);
        record.extend_from_slice(line.as_bytes());
        record.push(b'\n');

        let result = match self {
            // unbuffered: each record reaches the terminal or pipe immediately
            Sink::Console(stdout) => stdout.write_all(&record).and_then(|()| stdout.flush()),
            Sink::File { writer, .. } => writer.write_all(&record),
            Sink::Gzip { encoder, .. } => encoder.write_all(&record),
        };
        result.map_err(|source| Error::Write {
            path: self.path().to_path_buf(),
            source,
        })
    }

    /// Push buffered records through to the destination
    ///
    /// The gzip sink performs a sync flush so a reader sees whole lines.
    pub fn flush(&mut self) -> Result<()> {
        let result = match self {
            Sink::Console(stdout) => stdout.flush(),
            Sink::File { writer, .. } => writer.flush(),
            Sink::Gzip { encoder, .. } => encoder.flush(),
        };
        result.map_err(|source| Error::Write {
            path: self.path().to_path_buf(),
            source,
        })
    }

    /// Flush and release the destination
    ///
    /// Closing the console only flushes it.
    pub fn close(self) -> Result<()> {
        let path = self.path().to_path_buf();
        let result = match self {
            Sink::Console(mut stdout) => stdout.flush(),
            Sink::File { writer, .. } => writer
                .into_inner()
                .map_err(|e| e.into_error())
                .and_then(|file| file.sync_all()),
            Sink::Gzip { encoder, .. } => encoder.finish().and_then(|mut writer| {
                writer.flush()?;
                writer
                    .into_inner()
                    .map_err(|e| e.into_error())?
                    .sync_all()
            }),
        };
        result.map_err(|source| Error::Close { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_plain_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.log");
        std::fs::write(&path, "stale contents\n").unwrap();

        let mut sink = Sink::open(OutputKind::Log, &path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        sink.write_line("first").unwrap();
        sink.write_line("second").unwrap();
        sink.close().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_gzip_sink_is_finalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log.gz");

        let mut sink = Sink::open(OutputKind::Gz, &path).unwrap();
        for i in 0..100 {
            sink.write_line(&format!("line {i}")).unwrap();
        }
        sink.close().unwrap();

        let mut text = String::new();
        GzDecoder::new(File::open(&path).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text.lines().count(), 100);
        assert_eq!(text.lines().last(), Some("line 99"));
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.log");
        let err = Sink::open(OutputKind::Log, &path).err().unwrap();
        assert!(matches!(err, Error::Open { .. }));
    }

    #[test]
    fn test_flush_makes_lines_visible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.log");

        let mut sink = Sink::open(OutputKind::Log, &path).unwrap();
        sink.write_line("one").unwrap();
        sink.write_line("two").unwrap();
        sink.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        sink.close().unwrap();
    }

    #[test]
    fn test_gzip_flush_yields_decodable_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("live.log.gz");

        let mut sink = Sink::open(OutputKind::Gz, &path).unwrap();
        sink.write_line("partial").unwrap();
        sink.flush().unwrap();

        // no trailer yet; the decoder still yields the synced block
        let mut text = Vec::new();
        let _ = GzDecoder::new(File::open(&path).unwrap()).read_to_end(&mut text);
        assert!(String::from_utf8_lossy(&text).starts_with("partial\n"));
        sink.close().unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_full_device_errors_propagate() {
        let full = Path::new("/dev/full");

        let mut sink = Sink::open(OutputKind::Log, full).unwrap();
        sink.write_line("lost").unwrap();
        let err = sink.flush().err().unwrap();
        assert!(matches!(err, Error::Write { .. }), "{err}");

        let mut sink = Sink::open(OutputKind::Log, full).unwrap();
        sink.write_line("lost").unwrap();
        let err = sink.close().err().unwrap();
        assert!(matches!(err, Error::Close { .. }), "{err}");

        // larger than the buffer, so write_line itself hits the device
        let mut sink = Sink::open(OutputKind::Log, full).unwrap();
        let err = sink.write_line(&"x".repeat(64 * 1024)).err().unwrap();
        assert!(matches!(err, Error::Write { .. }), "{err}");
    }

    #[test]
    fn test_console_path() {
        let sink = Sink::open(OutputKind::Stdout, Path::new("ignored.log")).unwrap();
        assert_eq!(sink.path(), Path::new("-"));
        sink.close().unwrap();
    }
}
