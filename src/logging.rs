use log::{LevelFilter, Log, Metadata, Record};
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

/// A logger that appends records to a file.
///
/// The terminal is in raw mode while presenting so logs can't go to stderr.
struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        let line = format_record(timestamp.as_millis(), record);
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{line}");
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

fn format_record(timestamp_millis: u128, record: &Record) -> String {
    format!("{timestamp_millis} {:<5} {}: {}", record.level(), record.target(), record.args())
}

/// An error setting up logging.
#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    #[error("opening log file: {0}")]
    Io(#[from] io::Error),

    #[error("logger already set")]
    AlreadySet(#[from] log::SetLoggerError),
}

/// Send every log record at `level` or above into the file at `path`.
pub fn init_file_logging(path: &Path, level: LevelFilter) -> Result<(), LoggingError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let logger = FileLogger { file: Mutex::new(file), level };
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use log::Level;
    use std::fs;

    #[test]
    fn record_format() {
        let line = format_record(
            42,
            &Record::builder()
                .args(format_args!("exported {} slides", 5))
                .level(Level::Info)
                .target("litslides::export")
                .build(),
        );
        assert_eq!(line, "42 INFO  litslides::export: exported 5 slides");
    }

    #[test]
    fn filters_by_level() {
        let file = tempfile::NamedTempFile::new().expect("no temp file");
        let logger = FileLogger { file: Mutex::new(file.reopen().expect("reopen failed")), level: LevelFilter::Warn };
        logger.log(&Record::builder().args(format_args!("hidden")).level(Level::Debug).build());
        logger.log(&Record::builder().args(format_args!("shown")).level(Level::Error).build());
        logger.flush();

        let contents = fs::read_to_string(file.path()).expect("read failed");
        assert!(!contents.contains("hidden"));
        assert!(contents.contains("shown"));
    }
}
