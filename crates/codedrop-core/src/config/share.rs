//! Share code issuance and expiry configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::share_code::{MAX_CODE_WIDTH, MIN_CODE_WIDTH};

/// Longest accepted record lifetime (100 years).
pub const MAX_TTL_SECONDS: u64 = 100 * 365 * 86_400;

/// Share code issuance and expiry policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Number of decimal digits in every code (1..=9).
    #[serde(default = "default_code_width")]
    pub code_width: u32,
    /// Insert attempts before issuance gives up on collisions.
    #[serde(default = "default_max_issue_attempts")]
    pub max_issue_attempts: u32,
    /// Record lifetime in seconds. `0` keeps records forever.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Delete a record when it is redeemed.
    #[serde(default)]
    pub single_use: bool,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            code_width: default_code_width(),
            max_issue_attempts: default_max_issue_attempts(),
            ttl_seconds: default_ttl(),
            single_use: false,
        }
    }
}

impl ShareConfig {
    /// Record lifetime, or `None` when records never expire.
    pub fn ttl(&self) -> Option<chrono::Duration> {
        if self.ttl_seconds == 0 {
            return None;
        }
        i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if !(MIN_CODE_WIDTH..=MAX_CODE_WIDTH).contains(&self.code_width) {
            return Err(AppError::configuration(format!(
                "share.code_width must be between {MIN_CODE_WIDTH} and {MAX_CODE_WIDTH}, got {}",
                self.code_width
            )));
        }
        if self.max_issue_attempts == 0 {
            return Err(AppError::configuration(
                "share.max_issue_attempts must be at least 1",
            ));
        }
        let ttl_overflows = self.ttl_seconds > 0 && self.ttl().is_none();
        if self.ttl_seconds > MAX_TTL_SECONDS || ttl_overflows {
            return Err(AppError::configuration(format!(
                "share.ttl_seconds must be at most {MAX_TTL_SECONDS}, got {}",
                self.ttl_seconds
            )));
        }
        Ok(())
    }
}

fn default_code_width() -> u32 {
    5
}

fn default_max_issue_attempts() -> u32 {
    10
}

fn default_ttl() -> u64 {
    86_400
}
