//! On-disk embedding tier (one file per key).
//!
//! Record layout, little-endian throughout:
//!
//! ```text
//! [u32 count][count x f32]
//! ```
//!
//! Writes go to a uniquely named temp file in the same directory and are then renamed
//! over `<hex-key>.bin`, so readers never observe a partial record.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use super::error::{CacheError, CacheResult};
use crate::hashing::key_to_hex;

const RECORD_EXTENSION: &str = "bin";

const TEMP_EXTENSION: &str = "tmp";

const HEADER_LEN: usize = 4;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Stores and retrieves embedding records under a single directory.
#[derive(Debug, Clone)]
pub struct DiskTier {
    dir: PathBuf,
}

impl DiskTier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the cache directory if it does not exist yet.
    pub fn ensure_dir(&self) -> CacheResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|_| CacheError::DirectoryUnavailable {
                path: self.dir.clone(),
            })?;
        }
        Ok(())
    }

    pub fn entry_path(&self, key: &[u8; 32]) -> PathBuf {
        self.dir
            .join(format!("{}.{}", key_to_hex(key), RECORD_EXTENSION))
    }

    fn temp_entry_path(&self, key: &[u8; 32]) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir.join(format!(
            "{}.{}.{}.{}",
            key_to_hex(key),
            std::process::id(),
            seq,
            TEMP_EXTENSION
        ))
    }

    /// Loads the record for `key`.
    ///
    /// A missing file is `Ok(None)`. A payload that disagrees with its header is logged
    /// and also reported as a miss, so the caller re-embeds and overwrites it. A file
    /// too short to hold the header is an error.
    pub fn load(&self, key: &[u8; 32]) -> CacheResult<Option<Vec<f32>>> {
        let path = self.entry_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        match decode_record(&path, &bytes) {
            Ok(vector) => Ok(Some(vector)),
            Err(CacheError::Corrupt {
                path,
                declared,
                actual,
            }) => {
                warn!(
                    path = %path.display(),
                    declared,
                    actual,
                    "Discarding corrupt embedding record"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Persists `vector` under `key`, replacing any previous record atomically.
    pub fn store(&self, key: &[u8; 32], vector: &[f32]) -> CacheResult<()> {
        self.ensure_dir()?;

        let bytes = encode_record(vector);
        let temp_path = self.temp_entry_path(key);
        let final_path = self.entry_path(key);

        let written = (|| -> io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(&bytes)?;
            file.sync_all()
        })();
        if let Err(source) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::Io {
                path: temp_path,
                source,
            });
        }

        if let Err(source) = fs::rename(&temp_path, &final_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(CacheError::Io {
                path: final_path,
                source,
            });
        }

        debug!(path = %final_path.display(), len = vector.len(), "Stored embedding record");
        Ok(())
    }

    pub fn exists(&self, key: &[u8; 32]) -> bool {
        self.entry_path(key).exists()
    }

    /// Deletes every record and leftover temp file; returns the number of files removed.
    pub fn purge(&self) -> CacheResult<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let io_err = |source: io::Error| CacheError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if let Some(ext) = path.extension()
                && (ext == RECORD_EXTENSION || ext == TEMP_EXTENSION)
                && path.is_file()
            {
                fs::remove_file(&path).map_err(|source| CacheError::Io {
                    path: path.clone(),
                    source,
                })?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}

/// Serializes a vector as `[u32 LE count][count x f32 LE]`.
pub fn encode_record(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + vector.len() * 4);
    bytes.extend_from_slice(&(vector.len() as u32).to_le_bytes());
    for value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Parses a record produced by [`encode_record`]. `path` is only used for error context.
pub fn decode_record(path: &Path, bytes: &[u8]) -> CacheResult<Vec<f32>> {
    let Some((header, payload)) = bytes.split_first_chunk::<HEADER_LEN>() else {
        return Err(CacheError::TruncatedHeader {
            path: path.to_path_buf(),
            len: bytes.len(),
        });
    };

    let declared = u32::from_le_bytes(*header);
    if payload.len() as u64 != u64::from(declared) * 4 {
        return Err(CacheError::Corrupt {
            path: path.to_path_buf(),
            declared,
            actual: payload.len(),
        });
    }

    Ok(payload
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
