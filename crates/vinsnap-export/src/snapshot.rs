use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use vinsnap_core::{Error, Result, WineRecord};

use crate::source::Source;

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub path: PathBuf,
}

/// Fetch the snapshot from `source` and write it to `out`.
///
/// Nothing is written unless the fetch succeeds.
pub async fn export_snapshot<S>(source: &mut S, out: &Path) -> Result<ExportSummary>
where
    S: Source + ?Sized,
{
    tracing::info!(event = "query_started", engine = source.engine());
    let records = source.fetch_wines().await?;
    tracing::info!(event = "rows_fetched", rows = records.len());

    let rows = write_snapshot(out, &records)?;
    tracing::info!(event = "snapshot_written", path = %out.display(), rows = rows);

    Ok(ExportSummary {
        rows,
        path: out.to_path_buf(),
    })
}

/// Render records as a two-space indented JSON array.
pub fn render_snapshot(records: &[WineRecord]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(records).map_err(Error::from)
}

/// Serialize records and replace `path` with the result.
///
/// Returns the number of rows written. A failed write leaves any existing
/// file at `path` untouched.
pub fn write_snapshot(path: &Path, records: &[WineRecord]) -> Result<usize> {
    let data = render_snapshot(records)?;
    write_bytes_atomic(path, &data)?;
    Ok(records.len())
}

fn write_bytes_atomic(path: &Path, data: &[u8]) -> Result<()> {
    write_bytes_atomic_with(path, data, sync_dir)
}

/// Once the rename lands the snapshot is replaced, so a failed directory
/// sync is only logged.
fn write_bytes_atomic_with<F>(path: &Path, data: &[u8], sync: F) -> Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());

    if let Some(parent) = parent {
        create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
    }

    let tmp_path = temp_path(path)?;
    let written = write_temp(&tmp_path, data).and_then(|()| std::fs::rename(&tmp_path, path));
    if let Err(err) = written {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Error::io(path, err));
    }

    if let Some(parent) = parent {
        if let Err(err) = sync(parent) {
            tracing::warn!(
                event = "snapshot_dir_sync_failed",
                path = %parent.display(),
                error = %err
            );
        }
    }

    Ok(())
}

fn write_temp(tmp_path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(tmp_path)?;
    file.write_all(data)?;
    file.sync_all()
}

fn temp_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        Error::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}

#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
