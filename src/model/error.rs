use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProblem {
    Missing,
    IsDirectory,
}

#[derive(Debug)]
pub enum LoggerError {
    InvalidFilePath { path: PathBuf, reason: PathProblem },
    NoDefaultLocation(&'static str),
    InvalidTimeFormat(String),
    IoError(std::io::Error),
}

impl fmt::Display for PathProblem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PathProblem::Missing => write!(f, "file does not exist"),
            PathProblem::IsDirectory => write!(f, "path is a directory"),
        }
    }
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoggerError::InvalidFilePath { path, reason } => {
                write!(f, "Invalid log file path {}: {}", path.display(), reason)
            }
            LoggerError::NoDefaultLocation(what) => {
                write!(f, "Cannot derive default log location: {}", what)
            }
            LoggerError::InvalidTimeFormat(format) => write!(f, "Invalid time format: {:?}", format),
            LoggerError::IoError(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggerError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoggerError {
    fn from(err: std::io::Error) -> Self {
        LoggerError::IoError(err)
    }
}
