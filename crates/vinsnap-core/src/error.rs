use std::path::PathBuf;

use thiserror::Error;

/// Error type shared across vinsnap crates.
///
/// One variant per export stage; every variant is terminal for a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Required environment values are unset or empty.
    #[error("missing configuration: {}", .missing.join(" / "))]
    Configuration { missing: Vec<&'static str> },
    /// The database session could not be established.
    #[error("connection error: {0}")]
    Connection(String),
    /// The snapshot query failed on the server or a row could not be decoded.
    #[error("query error: {0}")]
    Query(String),
    /// Rows could not be converted to JSON.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// Reading or writing a file failed.
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Serialization(value.to_string())
    }
}

/// Convenience alias for results returned by vinsnap crates.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_missing_variable() {
        let err = Error::Configuration {
            missing: vec!["DB_HOST", "DB_PASS"],
        };
        assert_eq!(err.to_string(), "missing configuration: DB_HOST / DB_PASS");
    }

    #[test]
    fn io_errors_name_the_path() {
        let err = Error::io(
            "out/wines.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "io error at out/wines.json: denied");
    }
}
