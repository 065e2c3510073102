use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

pub const DEFAULT_LOG_FILE: &str = "libras_quiz.log";

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Option<File>> = Mutex::new(None);
}

pub fn init() {
    init_at(Path::new(DEFAULT_LOG_FILE));
}

/// Opens the log file once. Later calls keep the first file.
pub fn init_at(path: &Path) {
    let Ok(mut logger) = LOGGER.lock() else {
        return;
    };
    if logger.is_none()
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(path)
    {
        *logger = Some(file);
    }
}

fn write_entry<W: Write>(out: &mut W, level: &str, message: &str) -> std::io::Result<()> {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    writeln!(out, "[{}] {}{}", timestamp, level, message)
}

fn write_line(level: &str, message: &str) {
    if let Ok(mut guard) = LOGGER.lock()
        && let Some(logger) = guard.as_mut()
    {
        let _ = write_entry(logger, level, message);
    }
}

pub fn log(message: &str) {
    write_line("", message);
}

pub fn error(message: &str) {
    write_line("ERROR: ", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_entry_format() {
        let mut out = Vec::new();
        write_entry(&mut out, "ERROR: ", "disk full").unwrap();
        let line = String::from_utf8(out).unwrap();

        // "[YYYY-MM-DD HH:MM:SS] " is 22 characters.
        assert!(line.starts_with('['));
        assert_eq!(&line[20..22], "] ");
        assert_eq!(&line[22..], "ERROR: disk full\n");
    }

    // The only test that opens the global log file; `init_at` keeps the
    // first file for the whole test binary.
    #[test]
    fn test_logger_writes_to_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("test.log");
        init_at(&path);
        log("Test log message");
        error("Test error message");

        let other = temp_dir.path().join("other.log");
        init_at(&other);
        log("Still the first file");

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.lines().any(|l| l.ends_with("] Test log message")));
        assert!(contents.lines().any(|l| l.ends_with("] ERROR: Test error message")));
        assert!(contents.contains("Still the first file"));
        assert!(!other.exists());
    }
}
