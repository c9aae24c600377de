//! Scheduled background jobs for CodeDrop.
//!
//! The only job purges expired share records on a cron schedule. The
//! scheduler runs inside the server process and is shut down with it.

pub mod jobs;
pub mod scheduler;

pub use jobs::PurgeJobHandler;
pub use scheduler::CronScheduler;
