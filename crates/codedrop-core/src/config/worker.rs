//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler runs inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression (with seconds) for purging expired share records.
    #[serde(default = "default_purge_schedule")]
    pub purge_schedule: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            purge_schedule: default_purge_schedule(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_purge_schedule() -> String {
    "0 */10 * * * *".to_string()
}
