//! Snapshot export: database sources and the JSON snapshot writer.

pub mod mysql;
pub mod snapshot;
pub mod source;

pub use mysql::{CONNECT_TIMEOUT, DEFAULT_PORT, MySqlSource, WINES_SNAPSHOT_SQL};
pub use snapshot::{ExportSummary, export_snapshot, render_snapshot, write_snapshot};
pub use source::Source;

pub use vinsnap_core::WineRecord;
