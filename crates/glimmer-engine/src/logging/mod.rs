//! Logger setup for binaries built on glimmer.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
