//! Log analysis error types.

use thiserror::Error;

/// Errors that can occur while configuring or running an analysis.
///
/// Malformed lines and unparsable timestamps are not errors: they are counted
/// by the aggregator and never surface here.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("source not found: {0}")]
    NotFound(String),

    #[error("unknown log format: {0}")]
    UnknownFormat(String),

    #[error("invalid time bound '{value}': {reason}")]
    InvalidTimeBound { value: String, reason: String },

    #[error("invalid time zone '{0}' (expected UTC, local or an offset like +03:00)")]
    InvalidTimeZone(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LogError {
    /// True for errors raised while validating configuration, before any
    /// input is read.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownFormat(_)
                | Self::InvalidTimeBound { .. }
                | Self::InvalidTimeZone(_)
                | Self::Config(_)
        )
    }

    pub(crate) fn from_io(source: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(source.to_string())
        } else {
            Self::Io(format!("{source}: {err}"))
        }
    }
}

/// Convenience alias for log analysis results.
pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_from_io_kind() {
        let err = LogError::from_io(
            "/var/log/missing.log",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, LogError::NotFound(ref p) if p == "/var/log/missing.log"));
        assert!(!err.is_config());
    }

    #[test]
    fn other_io_errors_keep_source_name() {
        let err = LogError::from_io(
            "app.log",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(err.to_string().starts_with("I/O error: app.log"));
    }

    #[test]
    fn config_errors_are_flagged() {
        assert!(LogError::UnknownFormat("xml".into()).is_config());
        assert!(LogError::InvalidTimeZone("Mars/Base".into()).is_config());
        assert!(
            LogError::InvalidTimeBound {
                value: "yesterday".into(),
                reason: "unrecognized".into()
            }
            .is_config()
        );
    }
}
