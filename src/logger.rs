use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use parking_lot::{Mutex, RwLock};

use crate::builder::{short_type_name, LoggerBuilder};
use crate::model::error::{LoggerError, PathProblem};
use crate::model::level::Level;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

const LOG_SUBDIRECTORY: &str = "Log";

/// Appends leveled, timestamped lines to a log file.
///
/// Every call opens the target, appends one line and closes it again while
/// holding the instance's write lock, so a `Logger` shared between threads
/// never produces torn lines. Separate instances writing to the same file are
/// not coordinated.
#[derive(Debug)]
pub struct Logger {
    label: Option<String>,
    time_format: RwLock<String>,
    file_path: Option<PathBuf>,
    directory_name: Option<String>,
    base_directory: Option<PathBuf>,
    write_lock: Mutex<()>,
}

impl Logger {
    /// A logger using the default location rules.
    pub fn new(label: Option<&str>) -> Self {
        match label {
            Some(label) => LoggerBuilder::with_label(label).build(),
            None => LoggerBuilder::new().build(),
        }
    }

    pub fn for_type<T: ?Sized>() -> Self {
        Self::new(Some(short_type_name(std::any::type_name::<T>()).as_str()))
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub(crate) fn from_parts(
        label: Option<String>,
        time_format: String,
        file_path: Option<PathBuf>,
        directory_name: Option<String>,
        base_directory: Option<PathBuf>,
    ) -> Self {
        Logger {
            label,
            time_format: RwLock::new(time_format),
            file_path,
            directory_name,
            base_directory,
            write_lock: Mutex::new(()),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn directory_name(&self) -> Option<&str> {
        self.directory_name.as_deref()
    }

    pub fn time_format(&self) -> String {
        self.time_format.read().clone()
    }

    /// Ignored when `format` is empty.
    pub fn set_time_format(&self, format: &str) {
        if !format.is_empty() {
            *self.time_format.write() = format.to_string();
        }
    }

    pub fn info(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Info, message)
    }

    pub fn debug(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Debug, message)
    }

    pub fn warning(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Warning, message)
    }

    pub fn error(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Error, message)
    }

    pub fn verbose(&self, message: &str) -> Result<(), LoggerError> {
        self.log(Level::Verbose, message)
    }

    pub fn log(&self, level: Level, message: &str) -> Result<(), LoggerError> {
        self.log_at(&Local::now(), level, message)
    }

    /// The file the next write would go to. In default mode the directories
    /// are created as a side effect.
    pub fn current_log_path(&self) -> Result<PathBuf, LoggerError> {
        self.resolve_path(Local::now().date_naive())
    }

    fn log_at(&self, now: &DateTime<Local>, level: Level, message: &str) -> Result<(), LoggerError> {
        let line = self.render(now, level, message)?;
        log::debug!(target: "file_logger", "{}", line);

        let _guard = self.write_lock.lock();
        let path = self.resolve_path(now.date_naive())?;
        append_line(&path, &line, self.file_path.is_none())
    }

    fn render(&self, now: &DateTime<Local>, level: Level, message: &str) -> Result<String, LoggerError> {
        let time_format = self.time_format.read();
        let mut line = String::with_capacity(message.len() + 48);

        // Display of an unparseable strftime pattern reports fmt::Error.
        write!(line, "{}", now.format(time_format.as_str()))
            .map_err(|_| LoggerError::InvalidTimeFormat(time_format.clone()))?;

        line.push_str(" - ");
        if let Some(label) = &self.label {
            line.push_str(label);
            line.push_str(" - ");
        }
        line.push_str(level.as_str());
        line.push_str(" - ");
        line.push_str(message);
        Ok(line)
    }

    fn resolve_path(&self, date: NaiveDate) -> Result<PathBuf, LoggerError> {
        if let Some(path) = &self.file_path {
            check_existing_file(path)?;
            return Ok(path.clone());
        }

        let root = match &self.base_directory {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .ok_or(LoggerError::NoDefaultLocation("no per-user data directory"))?,
        };
        let directory_name = match &self.directory_name {
            Some(name) => name.clone(),
            None => program_name()
                .ok_or(LoggerError::NoDefaultLocation("cannot determine program name"))?,
        };

        let path = default_log_path(&root, &directory_name, date);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        Ok(path)
    }
}

fn check_existing_file(path: &Path) -> Result<(), LoggerError> {
    let reason = match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => PathProblem::IsDirectory,
        Ok(_) => return Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => PathProblem::Missing,
        Err(err) => return Err(err.into()),
    };
    Err(LoggerError::InvalidFilePath {
        path: path.to_path_buf(),
        reason,
    })
}

fn default_log_path(root: &Path, directory_name: &str, date: NaiveDate) -> PathBuf {
    root.join(directory_name)
        .join(LOG_SUBDIRECTORY)
        .join(format!("{}.log", date.format("%Y-%m-%d")))
}

fn program_name() -> Option<String> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| file_stem(&exe))
        .or_else(|| {
            std::env::args_os()
                .next()
                .and_then(|arg0| file_stem(Path::new(&arg0)))
        })
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
}

fn append_line(path: &Path, line: &str, create: bool) -> Result<(), LoggerError> {
    let mut file = OpenOptions::new()
        .create(create)
        .append(true)
        .open(path)?;

    // One write per line keeps each append a single OS-level write.
    let mut buf = String::with_capacity(line.len() + LINE_ENDING.len());
    buf.push_str(line);
    buf.push_str(LINE_ENDING);
    file.write_all(buf.as_bytes())?;
    Ok(())
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_TIME_FORMAT;
    use chrono::{NaiveDateTime, TimeZone};

    fn at(s: &str) -> DateTime<Local> {
        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.3f").unwrap();
        Local.from_local_datetime(&naive).earliest().unwrap()
    }

    #[test]
    fn default_format_renders_with_millis() {
        let logger = Logger::new(None);
        let line = logger
            .render(&at("2026-03-01 07:08:09.045"), Level::Info, "hello")
            .unwrap();
        assert_eq!(line, "2026-03-01 07:08:09,045 - INFO - hello");
        assert_eq!(logger.time_format(), DEFAULT_TIME_FORMAT);
    }

    #[test]
    fn label_is_placed_before_level() {
        let logger = Logger::new(Some("Foo"));
        let line = logger
            .render(&at("2026-03-01 07:08:09.000"), Level::Warning, "a - b\nc")
            .unwrap();
        assert_eq!(line, "2026-03-01 07:08:09,000 - Foo - WARNING - a - b\nc");
    }

    #[test]
    fn time_format_setter_only_changes_timestamp() {
        let logger = Logger::new(Some("Foo"));
        logger.set_time_format("%H:%M");
        logger.set_time_format("");
        let line = logger
            .render(&at("2026-03-01 07:08:09.000"), Level::Debug, "x")
            .unwrap();
        assert_eq!(line, "07:08 - Foo - DEBUG - x");
    }

    #[test]
    fn bad_time_format_is_an_error() {
        let logger = Logger::new(None);
        logger.set_time_format("%!");
        let err = logger
            .render(&at("2026-03-01 07:08:09.000"), Level::Info, "x")
            .unwrap_err();
        assert!(matches!(err, LoggerError::InvalidTimeFormat(ref f) if f == "%!"));
    }

    #[test]
    fn default_path_layout() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(
            default_log_path(Path::new("/data"), "app", date),
            Path::new("/data/app/Log/2026-03-01.log")
        );
    }

    #[test]
    fn writes_rotate_at_midnight() {
        let root = tempfile::tempdir().unwrap();
        let logger = LoggerBuilder::new()
            .directory_name("rotating")
            .base_directory(root.path())
            .build();

        logger
            .log_at(&at("2026-03-01 23:59:59.999"), Level::Info, "before")
            .unwrap();
        logger
            .log_at(&at("2026-03-02 00:00:00.000"), Level::Info, "after")
            .unwrap();

        let log_dir = root.path().join("rotating").join("Log");
        let first = fs::read_to_string(log_dir.join("2026-03-01.log")).unwrap();
        let second = fs::read_to_string(log_dir.join("2026-03-02.log")).unwrap();
        assert!(first.ends_with(&format!("INFO - before{}", LINE_ENDING)));
        assert!(second.ends_with(&format!("INFO - after{}", LINE_ENDING)));
        assert_eq!(first.lines().count(), 1);
        assert_eq!(second.lines().count(), 1);
    }

    #[test]
    fn empty_base_directory_from_config_is_absent() {
        let builder: LoggerBuilder = toml::from_str("base_directory = \"\"").unwrap();
        assert!(builder.build().base_directory.is_none());
        assert!(LoggerBuilder::new().base_directory("").build().base_directory.is_none());
    }

    #[test]
    fn program_name_is_known_in_tests() {
        assert!(program_name().is_some());
    }
}
