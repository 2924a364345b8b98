//! File system operations
//!
//! Low-level helpers shared by the storage operations: retries, exclusive
//! creation, atomic replacement and timestamp formatting.

use log::{debug, warn};
use std::fs::{self, File, FileTimes, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::{Duration, SystemTime};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

use crate::error::{OperationError, log_failure};

const RETRIES: u32 = 3;
const TEMP_PREFIX: &str = ".docbox-";

/// Runs an operation body and converts whatever it fails with into data the
/// caller can report: untagged I/O errors get the operation name and
/// arguments attached.
pub fn run_operation<T>(
    operation: &'static str,
    arguments: impl FnOnce() -> String,
    body: impl FnOnce() -> Result<T, OperationError>,
) -> Result<T, OperationError> {
    body().map_err(|err| {
        let err = err.in_operation(operation, arguments);
        log_failure(operation, &err);
        err
    })
}

/// Retries `op` while it fails with `PermissionDenied`, backing off between attempts.
pub fn with_retries<T>(mut op: impl FnMut() -> io::Result<T>) -> io::Result<T> {
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) if attempt < RETRIES && e.kind() == io::ErrorKind::PermissionDenied => {
                warn!("Permission denied (attempt {}/{}), retrying", attempt, RETRIES);
                thread::sleep(Duration::from_millis(100 * attempt as u64));
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Check if file exists
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Check if directory exists
pub fn directory_exists(path: &Path) -> bool {
    path.is_dir()
}

/// Creates the parent directory chain of `path`.
pub fn create_parent_dirs(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

/// Writes `content` to a file that must not exist yet.
pub fn write_new_file(path: &Path, content: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(content.as_bytes())?;
    file.flush()
}

/// Replaces the content of `path` by writing a uniquely named sibling
/// temporary file and renaming it over the original. The temporary is removed
/// on failure.
pub fn write_atomically(path: &Path, content: &str) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".tmp")
        .tempfile_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;
    if let Ok(metadata) = fs::metadata(path) {
        temp_file.as_file().set_permissions(metadata.permissions())?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Copies a regular file to a destination that must not exist yet, keeping
/// permissions and access/modification times. Returns the bytes copied.
pub fn copy_exclusive(source: &Path, destination: &Path) -> io::Result<u64> {
    let mut reader = File::open(source)?;
    let metadata = reader.metadata()?;

    let mut writer = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)?;

    let copied = match io::copy(&mut reader, &mut writer) {
        Ok(copied) => copied,
        Err(e) => {
            drop(writer);
            let _ = fs::remove_file(destination);
            return Err(e);
        }
    };

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    let finished = writer
        .set_permissions(metadata.permissions())
        .and_then(|()| writer.set_times(times));
    if let Err(e) = finished {
        drop(writer);
        let _ = fs::remove_file(destination);
        return Err(e);
    }

    debug!(
        "Copied {} bytes {} -> {}",
        copied,
        source.display(),
        destination.display()
    );
    Ok(copied)
}

/// Moves `source` to `destination`. Falls back to copy-then-delete for files
/// when a plain rename cannot cross devices; the source is only removed once
/// the copy is complete.
pub fn move_entry(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices && source.is_file() => {
            copy_exclusive(source, destination)?;
            with_retries(|| fs::remove_file(source))
        }
        Err(e) => Err(e),
    }
}

/// RFC 3339 (UTC) rendering of a filesystem timestamp.
pub fn format_system_time(time: SystemTime) -> String {
    let datetime = OffsetDateTime::from(time);
    datetime
        .format(&Rfc3339)
        .unwrap_or_else(|_| datetime.unix_timestamp().to_string())
}

/// Second-resolution UTC timestamp used in backup names, e.g. `20240131_235959`.
///
/// UTC is used because the local offset cannot be read soundly once the
/// process runs more than one thread.
pub fn backup_timestamp() -> io::Result<String> {
    format_backup_timestamp(OffsetDateTime::now_utc())
}

fn format_backup_timestamp(at: OffsetDateTime) -> io::Result<String> {
    at.format(format_description!(
        "[year][month][day]_[hour][minute][second]"
    ))
    .map_err(io::Error::other)
}
