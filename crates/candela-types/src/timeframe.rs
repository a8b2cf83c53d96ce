//! Candle timeframe definitions.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::TimeframeParseError;

const UNITS: &[(&str, u64)] = &[
    ("d", 86_400_000),
    ("h", 3_600_000),
    ("m", 60_000),
    ("s", 1_000),
    ("ms", 1),
];

/// Window length of an OHLC candle.
///
/// Any positive whole number of milliseconds is accepted. The textual form is
/// a sequence of `<number><unit>` groups with units `ms`, `s`, `m`, `h` and
/// `d`, e.g. `5s`, `15m` or `1h30m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe(Duration);

impl Timeframe {
    /// Creates a timeframe from a duration, truncated to whole milliseconds.
    ///
    /// Returns `None` if the duration is shorter than one millisecond.
    #[must_use]
    pub fn new(duration: Duration) -> Option<Self> {
        let millis = u64::try_from(duration.as_millis()).ok()?;
        (millis > 0).then(|| Self(Duration::from_millis(millis)))
    }

    /// Creates a timeframe spanning `secs` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `secs` is zero.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        assert!(secs > 0, "timeframe must be greater than zero");
        Self(Duration::from_secs(secs))
    }

    /// Creates a timeframe spanning `millis` milliseconds.
    ///
    /// # Panics
    ///
    /// Panics if `millis` is zero.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        assert!(millis > 0, "timeframe must be greater than zero");
        Self(Duration::from_millis(millis))
    }

    /// Returns the timeframe as a standard duration.
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }

    /// Returns the timeframe as a chrono delta, saturating on overflow.
    #[must_use]
    pub fn as_time_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.0).unwrap_or(TimeDelta::MAX)
    }

    /// Returns the length of the timeframe in milliseconds.
    #[must_use]
    pub fn millis(&self) -> u64 {
        // Constructors guarantee the value fits.
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rest = self.millis();
        for &(unit, size) in UNITS {
            let count = rest / size;
            if count > 0 {
                write!(f, "{count}{unit}")?;
                rest %= size;
            }
        }
        Ok(())
    }
}

impl FromStr for Timeframe {
    type Err = TimeframeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();
        if input.is_empty() {
            return Err(TimeframeParseError::Empty);
        }

        let mut total: u64 = 0;
        let mut chars = input.char_indices().peekable();
        while let Some(&(start, _)) = chars.peek() {
            let mut digits_end = start;
            while let Some(&(i, c)) = chars.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                digits_end = i + c.len_utf8();
                chars.next();
            }
            let count: u64 = input[start..digits_end]
                .parse()
                .map_err(|_| TimeframeParseError::InvalidNumber(s.to_string()))?;

            let unit_start = digits_end;
            let mut unit_end = unit_start;
            while let Some(&(i, c)) = chars.peek() {
                if !c.is_ascii_alphabetic() {
                    break;
                }
                unit_end = i + c.len_utf8();
                chars.next();
            }
            let unit = &input[unit_start..unit_end];
            let size = UNITS
                .iter()
                .find(|(name, _)| *name == unit)
                .map(|&(_, size)| size)
                .ok_or_else(|| {
                    if unit.is_empty() {
                        TimeframeParseError::InvalidNumber(s.to_string())
                    } else {
                        TimeframeParseError::UnknownUnit {
                            input: s.to_string(),
                            unit: unit.to_string(),
                        }
                    }
                })?;

            total = count
                .checked_mul(size)
                .and_then(|ms| total.checked_add(ms))
                .ok_or_else(|| TimeframeParseError::Overflow(s.to_string()))?;
        }

        if total == 0 {
            return Err(TimeframeParseError::Zero(s.to_string()));
        }
        Ok(Self(Duration::from_millis(total)))
    }
}

impl TryFrom<String> for Timeframe {
    type Error = TimeframeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Timeframe> for String {
    fn from(value: Timeframe) -> Self {
        value.to_string()
    }
}
