use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::redaction::RedactedConnection;

pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASS: &str = "DB_PASS";
pub const ENV_DB_NAME: &str = "DB_NAME";

/// Variables that must be present and non-empty before any network action.
pub const REQUIRED_VARS: [&str; 4] = [ENV_DB_HOST, ENV_DB_USER, ENV_DB_PASS, ENV_DB_NAME];

/// Database password. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Credentials for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub host: String,
    pub user: String,
    pub password: Password,
    pub database: String,
}

impl ExportConfig {
    /// Load credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials from the process environment, falling back to values
    /// read from an env file for variables the environment does not set.
    pub fn from_env_with_file(path: &Path) -> Result<Self> {
        let file_values = load_env_file(path)?;
        Self::from_lookup(|name| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.is_empty())
                .or_else(|| file_values.get(name).cloned())
        })
    }

    /// Load credentials through an arbitrary lookup.
    ///
    /// Empty values count as missing. All four variables are checked so the
    /// error names every one that is absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let [host, user, password, database] =
            REQUIRED_VARS.map(|name| match lookup(name).filter(|value| !value.is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(name);
                    String::new()
                }
            });

        if !missing.is_empty() {
            return Err(Error::Configuration { missing });
        }

        Ok(Self {
            host,
            user,
            password: Password::new(password),
            database,
        })
    }

    /// Connection target with the password masked, for logs and messages.
    pub fn redacted(&self, port: u16) -> RedactedConnection {
        RedactedConnection {
            engine: "mysql".to_string(),
            user: self.user.clone(),
            host: self.host.clone(),
            port,
            database: self.database.clone(),
        }
    }
}

/// Parse a dotenv-style file of `KEY=VALUE` lines.
///
/// Blank lines and `#` comments are skipped; a leading `export ` and matching
/// surrounding quotes are stripped.
pub fn load_env_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = std::fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
    Ok(parse_env_lines(&content))
}

fn parse_env_lines(content: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let mut parts = line.splitn(2, '=');
        let key = parts.next().unwrap_or("").trim();
        let value = unquote(parts.next().unwrap_or("").trim());
        if key.is_empty() {
            continue;
        }
        values.insert(key.to_string(), value.to_string());
    }
    values
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
