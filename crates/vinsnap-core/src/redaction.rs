use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection metadata with the secret left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedConnection {
    pub engine: String,
    pub user: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl fmt::Display for RedactedConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}:***@{}:{}/{}",
            self.engine, self.user, self.host, self.port, self.database
        )
    }
}

/// Mask every occurrence of `secret` in a message, e.g. a driver error that
/// echoes its connection options.
pub fn redact_secret(message: &str, secret: &str) -> String {
    if secret.is_empty() {
        return message.to_string();
    }
    message.replace(secret, "***")
}
