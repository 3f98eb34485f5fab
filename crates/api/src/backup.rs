//! Database backup download: a consistent snapshot of the live database,
//! zipped inside a temporary directory.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use myficdb_core::types::Timestamp;
use myficdb_db::repositories::SystemRepo;
use myficdb_db::DbPool;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{AppError, AppResult};

/// File name prefix of the backup archive and the snapshot inside it.
pub const DATABASE_DOWNLOAD_PREFIX: &str = "MyFicDB-Database-";

/// Attempts made to build the archive before giving up.
pub const ZIP_MAX_ATTEMPTS: u32 = 8;

/// Fixed delay between archive attempts.
pub const ZIP_RETRY_DELAY: Duration = Duration::from_millis(75);

/// A finished backup ready to be sent to the client.
#[derive(Debug)]
pub struct BackupArchive {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Snapshot the database with `VACUUM INTO` and zip it.
///
/// Both the snapshot and the archive live in a temporary directory that is
/// removed when this returns.
pub async fn create_database_backup(pool: &DbPool, now: Timestamp) -> AppResult<BackupArchive> {
    let stamp = now.format("%Y%m%d-%H%M%S");
    let sqlite_name = format!("{DATABASE_DOWNLOAD_PREFIX}{stamp}.sqlite");
    let zip_name = format!("{DATABASE_DOWNLOAD_PREFIX}{stamp}.zip");

    let workdir = tempfile::Builder::new()
        .prefix("myficdb-backup-")
        .tempdir()
        .map_err(|e| AppError::InternalError(format!("Failed to create temp directory: {e}")))?;
    let sqlite_path = workdir.path().join(&sqlite_name);
    let zip_path = workdir.path().join(&zip_name);

    SystemRepo::vacuum_into(pool, &sqlite_path).await?;

    let entry = sqlite_name.clone();
    let source = sqlite_path.clone();
    let target = zip_path.clone();
    retry_io(ZIP_MAX_ATTEMPTS, ZIP_RETRY_DELAY, move || {
        let (source, target, entry) = (source.clone(), target.clone(), entry.clone());
        async move {
            tokio::task::spawn_blocking(move || write_single_entry_zip(&target, &source, &entry))
                .await
                .map_err(io::Error::other)?
        }
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Failed to build backup archive: {e}")))?;

    let bytes = tokio::fs::read(&zip_path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read backup archive: {e}")))?;

    tracing::info!(file_name = %zip_name, size = bytes.len(), "Database backup created");

    Ok(BackupArchive {
        file_name: zip_name,
        bytes,
    })
}

/// Run `op` up to `max_attempts` times, sleeping `delay` after each I/O
/// failure except the last.
pub async fn retry_io<T, F, Fut>(max_attempts: u32, delay: Duration, mut op: F) -> io::Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = io::Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                tracing::debug!(attempt, error = %e, "I/O attempt failed, retrying");
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn write_single_entry_zip(zip_path: &Path, source: &Path, entry_name: &str) -> io::Result<()> {
    let data = std::fs::read(source)?;
    let file = File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(entry_name, options).map_err(io::Error::other)?;
    zip.write_all(&data)?;
    zip.finish().map_err(io::Error::other)?;
    Ok(())
}
