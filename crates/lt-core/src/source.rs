//! Log source abstraction: where input lines come from.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::{LogError, LogResult};

/// Opens named inputs as line readers.
///
/// The pipeline only needs a `BufRead` per source, which lets tests feed
/// in-memory content through the same path as real files.
pub trait LogSource {
    /// Open the named input for reading.
    fn open(&self, name: &str) -> LogResult<Box<dyn BufRead + Send>>;
}

/// Reads logs from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLogSource;

impl LogSource for FileLogSource {
    fn open(&self, name: &str) -> LogResult<Box<dyn BufRead + Send>> {
        let file = File::open(name).map_err(|e| LogError::from_io(name, e))?;
        let meta = file.metadata().map_err(|e| LogError::from_io(name, e))?;
        if meta.is_dir() {
            return Err(LogError::Io(format!("{name}: is a directory")));
        }
        Ok(Box::new(BufReader::new(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn open_missing_file() {
        let err = FileLogSource
            .open("/nonexistent/logtally/missing.log")
            .err()
            .unwrap();
        assert!(matches!(err, LogError::NotFound(_)));
    }

    #[test]
    fn open_directory_fails() {
        let dir = std::env::temp_dir();
        let err = FileLogSource.open(dir.to_str().unwrap()).err().unwrap();
        assert!(matches!(err, LogError::Io(_)));
    }

    #[test]
    fn open_reads_lines() {
        let path = std::env::temp_dir().join(format!("lt-core-source-{}.log", std::process::id()));
        {
            let mut file = File::create(&path).unwrap();
            writeln!(file, "first").unwrap();
            writeln!(file, "second").unwrap();
        }
        let reader = FileLogSource.open(path.to_str().unwrap()).unwrap();
        let lines: Vec<String> = reader.lines().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["first", "second"]);
        std::fs::remove_file(&path).unwrap();
    }
}
