// src/format.rs
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log line rendering for the supported formats
//!
//! Closed-field formats (Apache common/combined, common log) are a fixed
//! sequence of bounded random fields and ignore the target length.
//! Open-message formats render a fixed prefix and then pad with filler text
//! so the whole line is `length - 1` bytes:
//!
//! ```text
//! app_log          Jun 10 17:25:01 | TCP | INFO | (/e-markets/roi.go:196) | <filler>
//! apache_common    127.0.0.1 - kuhn4821 [10/Jun/2021:17:25:01 +1000] "GET /roi HTTP/1.1" 200 2326
//! apache_combined  <apache_common> "<referer>" "<user agent>"
//! apache_error     [Thu Jun 10 17:25:01 2021] [core:warn] [pid 12:tid 34] [client 1.2.3.4:5] <filler>
//! rfc3164          <34>Jun 10 17:25:01 kuhn4821 dolor[42]: <filler>
//! rfc5424          <165>1 2021-06-10T17:25:01.000+10:00 chiefroi.com dolor 42 ID7 - <filler>
//! common_log       same layout as apache_common
//! json             {"host":"1.2.3.4", ..., "message": "<filler>"}
//! ```

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::constants::{APACHE_ERROR_TIME, APACHE_TIME, RFC3164_TIME};
use crate::error::Error;
use crate::fields::{FieldProvider, LevelSet};

/// Supported log formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LogFormat {
    #[default]
    AppLog,
    ApacheCommon,
    ApacheCombined,
    ApacheError,
    Rfc3164,
    Rfc5424,
    CommonLog,
    Json,
}

impl LogFormat {
    pub const ALL: [LogFormat; 8] = [
        LogFormat::AppLog,
        LogFormat::ApacheCommon,
        LogFormat::ApacheCombined,
        LogFormat::ApacheError,
        LogFormat::Rfc3164,
        LogFormat::Rfc5424,
        LogFormat::CommonLog,
        LogFormat::Json,
    ];

    /// Identifier accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            LogFormat::AppLog => "app_log",
            LogFormat::ApacheCommon => "apache_common",
            LogFormat::ApacheCombined => "apache_combined",
            LogFormat::ApacheError => "apache_error",
            LogFormat::Rfc3164 => "rfc3164",
            LogFormat::Rfc5424 => "rfc5424",
            LogFormat::CommonLog => "common_log",
            LogFormat::Json => "json",
        }
    }

    /// True when the line length follows the target byte length
    pub fn is_open_message(self) -> bool {
        !matches!(
            self,
            LogFormat::ApacheCommon | LogFormat::ApacheCombined | LogFormat::CommonLog
        )
    }

    /// True when the line ends in plain filler text (sequence markers apply)
    pub fn ends_with_filler(self) -> bool {
        matches!(
            self,
            LogFormat::AppLog | LogFormat::ApacheError | LogFormat::Rfc3164 | LogFormat::Rfc5424
        )
    }

    /// Render one line stamped with `time`
    ///
    /// `length` is the target line length for open-message formats; the
    /// result is `length - 1` bytes whenever `length` exceeds the prefix.
    pub fn render(
        self,
        fields: &mut FieldProvider,
        time: &DateTime<FixedOffset>,
        length: usize,
    ) -> String {
        match self {
            LogFormat::AppLog => app_log(fields, time, length),
            LogFormat::ApacheCommon | LogFormat::CommonLog => apache_common(fields, time),
            LogFormat::ApacheCombined => apache_combined(fields, time),
            LogFormat::ApacheError => apache_error(fields, time, length),
            LogFormat::Rfc3164 => rfc3164(fields, time, length),
            LogFormat::Rfc5424 => rfc5424(fields, time, length),
            LogFormat::Json => json(fields, time, length),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| Error::UnknownFormat(s.to_string()))
    }
}

/// Append filler so that `line` ends up `length - 1` bytes long
fn pad(mut line: String, fields: &mut FieldProvider, length: usize) -> String {
    let budget = length.saturating_sub(line.len());
    line.push_str(&fields.filler(budget));
    line
}

fn app_log(fields: &mut FieldProvider, time: &DateTime<FixedOffset>, length: usize) -> String {
    let mut line = String::with_capacity(length.max(64));
    let _ = write!(
        line,
        "{} | {} | {} | ({}.go:{}) | ",
        time.format(RFC3164_TIME),
        fields.hacker_abbreviation(),
        fields.log_level(LevelSet::General).to_uppercase(),
        fields.resource_uri(),
        fields.number(1, 999),
    );
    pad(line, fields, length)
}

fn apache_common(fields: &mut FieldProvider, time: &DateTime<FixedOffset>) -> String {
    format!(
        "{} - {} [{}] \"{} {} {}\" {} {}",
        fields.ipv4(),
        fields.auth_user_id(),
        time.format(APACHE_TIME),
        fields.http_method(),
        fields.resource_uri(),
        fields.http_version(),
        fields.status_code(),
        fields.number(0, 30_000),
    )
}

fn apache_combined(fields: &mut FieldProvider, time: &DateTime<FixedOffset>) -> String {
    format!(
        "{} - {} [{}] \"{} {} {}\" {} {} \"{}\" \"{}\"",
        fields.ipv4(),
        fields.auth_user_id(),
        time.format(APACHE_TIME),
        fields.http_method(),
        fields.resource_uri(),
        fields.http_version(),
        fields.status_code(),
        fields.number(30, 100_000),
        fields.url(),
        fields.user_agent(),
    )
}

fn apache_error(fields: &mut FieldProvider, time: &DateTime<FixedOffset>, length: usize) -> String {
    let mut line = String::with_capacity(length.max(96));
    let _ = write!(
        line,
        "[{}] [{}:{}] [pid {}:tid {}] [client {}:{}] ",
        time.format(APACHE_ERROR_TIME),
        fields.word(),
        fields.log_level(LevelSet::Apache),
        fields.number(1, 10_000),
        fields.number(1, 10_000),
        fields.ipv4(),
        fields.number(1, 65_535),
    );
    pad(line, fields, length)
}

fn rfc3164(fields: &mut FieldProvider, time: &DateTime<FixedOffset>, length: usize) -> String {
    let mut line = String::with_capacity(length.max(64));
    let _ = write!(
        line,
        "<{}>{} {} {}[{}]: ",
        fields.number(0, 191),
        time.format(RFC3164_TIME),
        fields.username().to_lowercase(),
        fields.word(),
        fields.number(1, 10_000),
    );
    pad(line, fields, length)
}

fn rfc5424(fields: &mut FieldProvider, time: &DateTime<FixedOffset>, length: usize) -> String {
    let mut line = String::with_capacity(length.max(96));
    let _ = write!(
        line,
        "<{}>{} {} {} {} {} ID{} {} ",
        fields.number(0, 191),
        fields.number(1, 3),
        time.to_rfc3339_opts(SecondsFormat::Millis, true),
        fields.domain_name(),
        fields.word(),
        fields.number(1, 10_000),
        fields.number(1, 1000),
        "-",
    );
    pad(line, fields, length)
}

fn json(fields: &mut FieldProvider, time: &DateTime<FixedOffset>, length: usize) -> String {
    let mut line = String::with_capacity(length.max(256));
    let _ = write!(
        line,
        "{{\"host\":\"{}\", \"user-identifier\":\"{}\", \"datetime\":\"{}\", \"method\": \"{}\", \
         \"request\": \"{}\", \"protocol\":\"{}\", \"status\":{}, \"bytes\":{}, \"referer\": \"{}\", \
         \"message\": \"",
        fields.ipv4(),
        fields.auth_user_id(),
        time.format(APACHE_TIME),
        fields.http_method(),
        fields.resource_uri(),
        fields.http_version(),
        fields.status_code(),
        fields.number(0, 30_000),
        fields.url(),
    );
    // two bytes reserved for the closing `"}`
    let budget = length.saturating_sub(line.len() + 2);
    line.push_str(&fields.filler(budget));
    line.push_str("\"}");
    line
}

/// Replace the tail of `line` with ` log_seq:<seq>` of the same byte length
///
/// Lines shorter than the marker get the marker appended instead.
pub fn apply_sequence(mut line: String, seq: u64) -> String {
    let marker = format!(" log_seq:{seq}");
    if line.len() >= marker.len() {
        let mut cut = line.len() - marker.len();
        while !line.is_char_boundary(cut) {
            cut -= 1;
        }
        line.truncate(cut);
    }
    line.push_str(&marker);
    line
}
