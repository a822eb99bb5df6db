use async_trait::async_trait;

use vinsnap_core::{Result, WineRecord};

/// Trait implemented by databases that can produce the wine snapshot.
#[async_trait]
pub trait Source: Send {
    /// Returns the engine identifier (e.g. `mysql`).
    fn engine(&self) -> &'static str;

    /// Fetch every wine with its category name, ordered by wine name.
    async fn fetch_wines(&mut self) -> Result<Vec<WineRecord>>;
}
