use std::time::Duration;

use sqlx::Connection;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlSslMode};

use vinsnap_core::{Error, ExportConfig, Result, WineRecord, redact_secret};

use crate::source::Source;

mod mapper;
mod queries;

pub use queries::WINES_SNAPSHOT_SQL;

/// Port every export connects to.
pub const DEFAULT_PORT: u16 = 3306;

/// Upper bound on establishing the session. Query and write are not bounded.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// A single MySQL session owned for the duration of one export.
#[derive(Debug)]
pub struct MySqlSource {
    conn: MySqlConnection,
}

impl MySqlSource {
    /// Wrap an already-established connection.
    pub fn new(conn: MySqlConnection) -> Self {
        Self { conn }
    }

    /// Connect with the fixed export parameters: port 3306, TLS disabled and a
    /// 10 second connect timeout.
    pub async fn connect(config: &ExportConfig) -> Result<Self> {
        let target = config.redacted(DEFAULT_PORT);
        tracing::info!(event = "connecting", endpoint = %target);

        let options = connect_options(config);
        let connecting = MySqlConnection::connect_with(&options);
        let conn = match tokio::time::timeout(CONNECT_TIMEOUT, connecting).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(err)) => {
                let message = redact_secret(&err.to_string(), config.password.expose());
                return Err(Error::Connection(format!("{target}: {message}")));
            }
            Err(_) => {
                return Err(Error::Connection(format!(
                    "{target}: timed out after {}ms",
                    CONNECT_TIMEOUT.as_millis()
                )));
            }
        };

        tracing::info!(event = "connected", endpoint = %target);
        Ok(Self::new(conn))
    }

    /// Close the session. Failures are logged; the export outcome is already
    /// decided by the time this runs.
    pub async fn close(self) {
        match self.conn.close().await {
            Ok(()) => tracing::info!(event = "connection_closed"),
            Err(err) => tracing::warn!(event = "connection_close_failed", error = %err),
        }
    }
}

fn connect_options(config: &ExportConfig) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.host)
        .port(DEFAULT_PORT)
        .username(&config.user)
        .password(config.password.expose())
        .database(&config.database)
        .ssl_mode(MySqlSslMode::Disabled)
}

#[async_trait::async_trait]
impl Source for MySqlSource {
    fn engine(&self) -> &'static str {
        "mysql"
    }

    async fn fetch_wines(&mut self) -> Result<Vec<WineRecord>> {
        let rows = queries::fetch_wine_rows(&mut self.conn).await?;
        mapper::map_wine_rows(&rows)
    }
}
