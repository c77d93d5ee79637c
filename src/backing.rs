//! Filesystem Backing Lookup
//!
//! The real, uncached attribute source used by the HTTP host.

use std::fs::Metadata;
use std::io::ErrorKind;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{CacheError, Result};

// == File Attributes ==
/// Attribute snapshot for one path, as reported by `stat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAttributes {
    /// Size in bytes
    pub size: u64,
    pub is_dir: bool,
    pub is_file: bool,
    pub readonly: bool,
    /// Unix permission and type bits
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nlink: Option<u64>,
    /// Last modification time, if the platform reports it
    pub modified: Option<DateTime<Utc>>,
    pub accessed: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
}

impl From<&Metadata> for FileAttributes {
    fn from(meta: &Metadata) -> Self {
        #[cfg(unix)]
        let (mode, uid, gid, nlink) = {
            use std::os::unix::fs::MetadataExt;
            (
                Some(meta.mode()),
                Some(meta.uid()),
                Some(meta.gid()),
                Some(meta.nlink()),
            )
        };
        #[cfg(not(unix))]
        let (mode, uid, gid, nlink) = (None, None, None, None);

        Self {
            size: meta.len(),
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            readonly: meta.permissions().readonly(),
            mode,
            uid,
            gid,
            nlink,
            modified: to_utc(meta.modified()),
            accessed: to_utc(meta.accessed()),
            created: to_utc(meta.created()),
        }
    }
}

fn to_utc(time: std::io::Result<SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

// == Stat Path ==
/// Reads attributes for `path` from the local filesystem, following symlinks.
///
/// # Errors
/// - `NotFound` if nothing exists at `path`
/// - `BackingLookupFailed` for any other I/O error
pub async fn stat_path(path: String) -> Result<FileAttributes> {
    match tokio::fs::metadata(&path).await {
        Ok(meta) => Ok(FileAttributes::from(&meta)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(CacheError::NotFound(path)),
        Err(e) => Err(CacheError::BackingLookupFailed(format!("{}: {}", path, e))),
    }
}
