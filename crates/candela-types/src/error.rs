//! Error types for candela core types.

use thiserror::Error;

/// Error returned when parsing an invalid timeframe string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeframeParseError {
    /// The input was empty.
    #[error("empty timeframe, expected a duration such as 5s, 1m or 1h30m")]
    Empty,

    /// A unit was not preceded by a number, or the number was malformed.
    #[error("invalid timeframe '{0}', expected <number><unit> groups such as 5s or 1h30m")]
    InvalidNumber(String),

    /// The unit suffix is not one of `ms`, `s`, `m`, `h`, `d`.
    #[error("unknown unit '{unit}' in timeframe '{input}', expected one of: ms, s, m, h, d")]
    UnknownUnit {
        /// The full input string.
        input: String,
        /// The offending unit.
        unit: String,
    },

    /// The timeframe evaluates to zero.
    #[error("timeframe '{0}' must be greater than zero")]
    Zero(String),

    /// The timeframe does not fit in a duration.
    #[error("timeframe '{0}' is too large")]
    Overflow(String),
}

/// Error returned when parsing an invalid currency pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyPairParseError {
    /// The input was empty.
    #[error("empty currency pair")]
    Empty,

    /// The input contains a character that is not ASCII alphanumeric.
    #[error("invalid character {ch:?} in currency pair '{input}'")]
    InvalidCharacter {
        /// The full input string.
        input: String,
        /// The offending character.
        ch: char,
    },
}
