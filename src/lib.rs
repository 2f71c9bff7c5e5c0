//! Synchronous file logger.
//!
//! ```no_run
//! use file_logger::LoggerBuilder;
//!
//! let logger = LoggerBuilder::with_label("Importer")
//!     .directory_name("my-app")
//!     .build();
//! logger.info("started")?;
//! # Ok::<(), file_logger::LoggerError>(())
//! ```
//!
//! Lines look like `2026-03-01 07:08:09,045 - Importer - INFO - started` and go
//! either to an explicit file or to
//! `<data dir>/<directory name or program name>/Log/<YYYY-MM-DD>.log`.

mod builder;
mod logger;
mod model;

pub use builder::LoggerBuilder;
pub use logger::Logger;
pub use model::error::{LoggerError, PathProblem};
pub use model::level::Level;

/// `YYYY-MM-DD HH:mm:ss,SSS`
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";
