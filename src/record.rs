use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unix time of the reference epoch, 2001-01-01T00:00:00Z.
pub const REFERENCE_EPOCH_UNIX_SECONDS: i64 = 978_307_200;

/// Severity of a [`LogRecord`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    /// Every level, indexed by its rank.
    pub const ALL: [Level; 5] = [
        Level::Verbose,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
    ];

    /// Integer rank used on the wire, `0` for verbose up to `4` for error.
    pub fn rank(self) -> u8 {
        match self {
            Level::Verbose => 0,
            Level::Debug => 1,
            Level::Info => 2,
            Level::Warn => 3,
            Level::Error => 4,
        }
    }

    /// Inverse of [`Level::rank`]. Returns `None` outside `0..=4`.
    pub fn from_rank(rank: i64) -> Option<Level> {
        usize::try_from(rank)
            .ok()
            .and_then(|idx| Level::ALL.get(idx).copied())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Verbose => "verbose",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "verbose" | "trace" => Ok(Level::Verbose),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => Level::Verbose,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Point in time stored as floating-point seconds since the reference epoch.
///
/// The raw `f64` is kept as-is so the exact bit pattern survives a trip
/// through the line format. Two timestamps are equal when their bits are
/// equal, which makes NaN and `-0.0` round-trip like any other value.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    pub fn from_seconds_since_reference(seconds: f64) -> Self {
        Timestamp(seconds)
    }

    pub fn seconds_since_reference(self) -> f64 {
        self.0
    }

    /// Raw IEEE-754 bits of the seconds value.
    pub fn to_bits(self) -> u64 {
        self.0.to_bits()
    }

    pub fn from_bits(bits: u64) -> Self {
        Timestamp(f64::from_bits(bits))
    }

    /// Convert to a calendar time, rounding to the nearest nanosecond.
    ///
    /// Returns `None` for non-finite values and for offsets chrono cannot
    /// represent.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if !self.0.is_finite() {
            return None;
        }
        let whole = self.0.floor();
        let mut nanos = ((self.0 - whole) * 1e9).round();
        let mut secs = whole;
        if nanos >= 1e9 {
            secs += 1.0;
            nanos -= 1e9;
        }
        if secs.abs() > i64::MAX as f64 / 2.0 {
            return None;
        }
        let unix = (secs as i64).checked_add(REFERENCE_EPOCH_UNIX_SECONDS)?;
        Utc.timestamp_opt(unix, nanos as u32).single()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        let secs = (dt.timestamp() - REFERENCE_EPOCH_UNIX_SECONDS) as f64;
        Timestamp(secs + f64::from(dt.timestamp_subsec_nanos()) / 1e9)
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl Eq for Timestamp {}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "Timestamp({})", dt.to_rfc3339()),
            None => write!(f, "Timestamp({}s)", self.0),
        }
    }
}

/// A single log entry as it travels through the line codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: Level,
    pub date: Timestamp,
    pub body: String,
    pub file: String,
    pub function: String,
    pub line: u64,
    pub is_active: bool,
}

impl LogRecord {
    /// Build an active record stamped with the current time.
    pub fn new(
        level: Level,
        body: impl Into<String>,
        file: impl Into<String>,
        function: impl Into<String>,
        line: u64,
    ) -> Self {
        LogRecord {
            level,
            date: Timestamp::now(),
            body: body.into(),
            file: file.into(),
            function: function.into(),
            line,
            is_active: true,
        }
    }

    pub fn with_date(mut self, date: Timestamp) -> Self {
        self.date = date;
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }
}
