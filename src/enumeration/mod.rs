//! Credential enumeration: path discovery, per-path version fetches and the
//! worker pool that runs them.

mod aggregate;
mod paths;
mod pool;
mod versions;

pub use paths::PathCollector;
pub use pool::WorkerPool;
pub use versions::VersionFetcher;
