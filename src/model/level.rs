use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Debug,
    Warning,
    Error,
    Verbose,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Info,
        Level::Debug,
        Level::Warning,
        Level::Error,
        Level::Verbose,
    ];

    /// The word written into each rendered line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Verbose => "VERBOSE",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
