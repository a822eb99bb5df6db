//! Core contracts and helpers for vinsnap.
//!
//! This crate defines the snapshot record types, the environment-driven
//! export configuration, and the error taxonomy shared by the exporter and
//! the CLI.

pub mod config;
pub mod error;
pub mod record;
pub mod redaction;

pub use config::{
    ENV_DB_HOST, ENV_DB_NAME, ENV_DB_PASS, ENV_DB_USER, ExportConfig, Password, REQUIRED_VARS,
    load_env_file,
};
pub use error::{Error, Result};
pub use record::{FieldValue, WineRecord};
pub use redaction::{RedactedConnection, redact_secret};

/// Default output artifact, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "wines.json";
