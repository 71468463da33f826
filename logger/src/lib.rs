use std::{
    fmt,
    fs::File,
    io::{self, Write},
    sync::Mutex,
    time::Instant,
};

use chrono::Utc;
use once_cell::sync::OnceCell;

static LOGGER: OnceCell<Logger> = OnceCell::new();

/// Diagnostic category of a log line.
///
/// `Swi` traces every BIOS call dispatch, `Stub` marks services the HLE does
/// not implement, `GameError` marks malformed arguments coming from guest
/// code (the emulation continues with a defined fallback in every case).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Level {
    Debug,
    Swi,
    Stub,
    GameError,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Debug => "DEBUG",
            Self::Swi => "SWI",
            Self::Stub => "STUB",
            Self::GameError => "GAME_ERROR",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(label)
    }
}

struct LoggerImpl {
    pub sink: Box<dyn Write + Send>,
    pub start_instant: Instant,
}

impl LoggerImpl {
    fn new(kind: LogKind) -> Self {
        let start_instant = Instant::now();
        match kind {
            LogKind::STDOUT => Self {
                sink: Box::new(io::stdout()),
                start_instant,
            },
            LogKind::FILE => {
                let now = Utc::now();
                let filename = format!("mikan-{}.log", now.timestamp());
                let path = std::env::temp_dir().join(filename);
                Self {
                    sink: Box::new(File::create(path).unwrap()),
                    start_instant,
                }
            }
        }
    }

    fn log<T>(&mut self, level: Level, data: T)
    where
        T: fmt::Display,
    {
        let now = self.start_instant.elapsed();
        let seconds = now.as_secs();
        let hours = seconds / 3600;
        let minutes = (seconds / 60) % 60;
        let seconds = seconds % 60;
        let milliseconds = now.subsec_millis();

        writeln!(
            self.sink,
            "[{hours:02}:{minutes:02}:{seconds:02}.{milliseconds:03}] [{level}] {data}"
        )
        .unwrap();
    }
}

/// `LogKind` represents the kind of logging: `stdout` or `logfile`.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum LogKind {
    /// It logs to console, the default choice.
    STDOUT,

    /// It logs on a file in /tmp/mikan-<timestamp>.log
    FILE,
}

/// Logger
struct Logger {
    pub inner_impl: Mutex<LoggerImpl>,
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            inner_impl: Mutex::new(LoggerImpl::new(LogKind::STDOUT)),
        }
    }
}

impl Logger {
    fn new(kind: LogKind) -> Self {
        Self {
            inner_impl: Mutex::new(LoggerImpl::new(kind)),
        }
    }

    fn log<T>(&self, level: Level, data: T)
    where
        T: fmt::Display,
    {
        if let Ok(ref mut inner) = self.inner_impl.lock() {
            inner.log(level, data);
        }
    }
}

pub fn init_logger(kind: LogKind) {
    LOGGER.set(Logger::new(kind)).ok();
}

/// Logs a line tagged with `level`. A no-op until `init_logger` is called.
pub fn log<T>(level: Level, data: T)
where
    T: fmt::Display,
{
    LOGGER.get().map_or((), |logger| logger.log(level, data));
}
