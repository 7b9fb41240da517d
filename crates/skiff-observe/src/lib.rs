//! Logging setup for skiff binaries.
//!
//! Libraries only emit through `tracing`; this crate installs the subscriber.
mod config;
pub use config::{LOG_FORMAT_ENV, LOG_LEVEL_ENV, LOG_TZ_ENV, LoggerConfig};

mod error;
pub use error::{LoggerError, LoggerResult};

mod format;
pub use format::LoggerFormat;

mod init;
pub use init::init_logger;

mod level;
pub use level::LoggerLevel;

mod timer;
pub use timer::{LoggerTimeZone, LoggerTimer, init_local_offset};
