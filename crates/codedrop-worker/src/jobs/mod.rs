//! Built-in job handler implementations.

pub mod purge;

pub use purge::PurgeJobHandler;
