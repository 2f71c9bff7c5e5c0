use std::path::PathBuf;

use serde::Deserialize;

use crate::logger::Logger;
use crate::DEFAULT_TIME_FORMAT;

/// Accumulates logger configuration. Nothing is validated until a message is
/// written, so every setter is infallible.
///
/// Can also be deserialized from a host's config file; missing keys keep the
/// defaults.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggerBuilder {
    label: Option<String>,
    time_format: String,
    file_path: Option<PathBuf>,
    directory_name: Option<String>,
    base_directory: Option<PathBuf>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        LoggerBuilder {
            label: None,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            file_path: None,
            directory_name: None,
            base_directory: None,
        }
    }

    pub fn with_label(label: impl Into<String>) -> Self {
        Self::new().label(label)
    }

    pub fn for_type<T: ?Sized>() -> Self {
        Self::with_label(short_type_name(std::any::type_name::<T>()))
    }

    /// Ignored when `format` is empty.
    pub fn time_format(mut self, format: impl Into<String>) -> Self {
        let format = format.into();
        if !format.is_empty() {
            self.time_format = format;
        }
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = non_empty(label.into());
        self
    }

    /// Takes precedence over the directory name when set.
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = non_empty_path(path.into());
        self
    }

    pub fn clear_file_path(mut self) -> Self {
        self.file_path = None;
        self
    }

    pub fn directory_name(mut self, name: impl Into<String>) -> Self {
        self.directory_name = non_empty(name.into());
        self
    }

    /// Replaces the per-user application data directory as the root of the
    /// default location.
    pub fn base_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_directory = non_empty_path(path.into());
        self
    }

    pub fn build(&self) -> Logger {
        let time_format = if self.time_format.is_empty() {
            DEFAULT_TIME_FORMAT.to_string()
        } else {
            self.time_format.clone()
        };

        Logger::from_parts(
            self.label.clone().and_then(non_empty),
            time_format,
            self.file_path.clone().and_then(non_empty_path),
            self.directory_name.clone().and_then(non_empty),
            self.base_directory.clone().and_then(non_empty_path),
        )
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_empty_path(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// Strips module paths from a `type_name` string, keeping generic structure:
/// `alloc::vec::Vec<my_app::Job>` becomes `Vec<Job>`.
pub(crate) fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut token = String::new();

    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            token.push(c);
        } else {
            out.push_str(last_segment(&token));
            token.clear();
            out.push(c);
        }
    }
    out.push_str(last_segment(&token));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
