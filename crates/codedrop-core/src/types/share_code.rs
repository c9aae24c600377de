//! Fixed-width numeric share codes.
//!
//! A [`CodeFormat`] is the single definition of how wide a code is. The
//! generator draws from [`CodeFormat::bounds`] and redemption parses user
//! input with [`CodeFormat::parse`], so both sides always agree.
//!
//! When the `sqlx` feature is enabled, [`ShareCode`] encodes as a
//! PostgreSQL `INTEGER`.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Smallest supported code width.
pub const MIN_CODE_WIDTH: u32 = 1;

/// Largest supported code width. Ten digits would overflow `i32`.
pub const MAX_CODE_WIDTH: u32 = 9;

/// A short numeric code that stands in for a retrieval URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareCode(pub i32);

impl ShareCode {
    /// Return the numeric value.
    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ShareCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ShareCode {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::Type<sqlx::Postgres> for ShareCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

#[cfg(feature = "sqlx")]
impl<'q> sqlx::Encode<'q, sqlx::Postgres> for ShareCode {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Postgres as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ShareCode {
    fn decode(
        value: <sqlx::Postgres as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        <i32 as sqlx::Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
    }
}

/// The width of every share code in a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeFormat {
    width: u32,
    min: i32,
    max: i32,
}

impl CodeFormat {
    /// Create a format for codes of exactly `width` decimal digits.
    pub fn new(width: u32) -> AppResult<Self> {
        if !(MIN_CODE_WIDTH..=MAX_CODE_WIDTH).contains(&width) {
            return Err(AppError::configuration(format!(
                "Code width must be between {MIN_CODE_WIDTH} and {MAX_CODE_WIDTH}, got {width}"
            )));
        }
        let min = 10_i32.pow(width - 1);
        let max = 10_i32.pow(width) - 1;
        Ok(Self { width, min, max })
    }

    /// Number of digits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// `[10^(w-1), 10^w - 1]`
    pub fn bounds(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    /// How many distinct codes exist at this width.
    pub fn capacity(&self) -> u64 {
        (self.max - self.min) as u64 + 1
    }

    /// Whether `code` has the right number of digits.
    pub fn contains(&self, code: ShareCode) -> bool {
        self.bounds().contains(&code.0)
    }

    /// Parse user input into a code of this width.
    ///
    /// Leading and trailing whitespace is ignored. Anything other than
    /// exactly `width` ASCII digits, or a value with a leading zero, is a
    /// validation error.
    pub fn parse(&self, input: &str) -> AppResult<ShareCode> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Code is required"));
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::validation("Code must contain only digits"));
        }
        if trimmed.len() != self.width as usize {
            return Err(AppError::validation(format!(
                "Code must be exactly {} digits",
                self.width
            )));
        }

        let value: i32 = trimmed
            .parse()
            .map_err(|_| AppError::validation("Code is not a valid number"))?;
        let code = ShareCode(value);
        if !self.contains(code) {
            return Err(AppError::validation(format!(
                "Code must be between {} and {}",
                self.min, self.max
            )));
        }
        Ok(code)
    }
}
