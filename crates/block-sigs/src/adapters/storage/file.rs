use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{Bucket, BucketEngine};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

type Table = HashMap<Vec<u8>, Vec<u8>>;

const BUCKET_EXTENSION: &str = "bucket";

/// Configuration for [`FileBucketEngine`].
#[derive(Debug, Clone)]
pub struct FileBucketConfig {
    /// Directory holding one file per bucket (default: `./data/buckets`).
    pub data_dir: PathBuf,
    /// fsync every rewrite before it replaces the bucket file (default: true).
    pub sync_writes: bool,
}

impl Default for FileBucketConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data/buckets"),
            sync_writes: true,
        }
    }
}

impl FileBucketConfig {
    /// Create config rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Create config for testing (no fsync).
    pub fn for_testing(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            sync_writes: false,
        }
    }

    /// Enable or disable fsync on write.
    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }
}

/// File-backed bucket engine for nodes running without RocksDB.
///
/// Each bucket lives in `<data_dir>/<name>.bucket` using a simple binary
/// format, `[key_len:u32][key][value_len:u32][value]...` (little-endian).
/// Every put rewrites the file through a temp file and a rename, so a crash
/// leaves either the old or the new contents.
#[derive(Debug, Clone)]
pub struct FileBucketEngine {
    config: FileBucketConfig,
    open: Arc<Mutex<HashMap<String, FileBucket>>>,
}

impl FileBucketEngine {
    pub fn new(config: FileBucketConfig) -> Self {
        Self {
            config,
            open: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Path of the file backing bucket `name`.
    pub fn bucket_path(&self, name: &str) -> PathBuf {
        self.config
            .data_dir
            .join(name)
            .with_extension(BUCKET_EXTENSION)
    }
}

impl BucketEngine for FileBucketEngine {
    type Bucket = FileBucket;

    fn open_bucket(&self, name: &str) -> Result<FileBucket, KVStoreError> {
        validate_bucket_name(name)?;

        let mut open = self.open.lock();
        if let Some(bucket) = open.get(name) {
            return Ok(bucket.clone());
        }

        fs::create_dir_all(&self.config.data_dir).map_err(io_error)?;

        let path = self.bucket_path(name);
        let data = match fs::read(&path) {
            Ok(bytes) => {
                let data = decode_table(&bytes).map_err(|message| {
                    KVStoreError::CorruptionError {
                        message: format!("{}: {}", path.display(), message),
                    }
                })?;
                tracing::info!(
                    "[block-sigs] Loaded {} keys from {}",
                    data.len(),
                    path.display()
                );
                data
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("[block-sigs] No existing bucket file at {}", path.display());
                Table::new()
            }
            Err(e) => return Err(io_error(e)),
        };

        let bucket = FileBucket {
            data: Arc::new(RwLock::new(data)),
            path,
            sync_writes: self.config.sync_writes,
        };
        open.insert(name.to_string(), bucket.clone());
        Ok(bucket)
    }
}

/// Handle onto one file-backed bucket.
#[derive(Debug, Clone)]
pub struct FileBucket {
    data: Arc<RwLock<Table>>,
    path: PathBuf,
    sync_writes: bool,
}

impl FileBucket {
    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_to_file(&self, data: &Table) -> Result<(), KVStoreError> {
        let bytes = encode_table(data);

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        if self.sync_writes {
            file.sync_all().map_err(io_error)?;
        }

        fs::rename(&temp_path, &self.path).map_err(io_error)
    }
}

impl Bucket for FileBucket {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let mut data = self.data.write();
        let previous = data.insert(key.to_vec(), value.to_vec());

        if let Err(err) = self.save_to_file(&data) {
            // Keep memory in line with what is on disk.
            match previous {
                Some(previous) => data.insert(key.to_vec(), previous),
                None => data.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }
}

fn validate_bucket_name(name: &str) -> Result<(), KVStoreError> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(KVStoreError::UnknownBucket {
            name: name.to_string(),
        })
    }
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

fn encode_table(data: &Table) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (key, value) in data {
        bytes.extend_from_slice(&(key.len() as u32).to_le_bytes());
        bytes.extend_from_slice(key);
        bytes.extend_from_slice(&(value.len() as u32).to_le_bytes());
        bytes.extend_from_slice(value);
    }
    bytes
}

fn decode_table(bytes: &[u8]) -> Result<Table, String> {
    let mut data = Table::new();
    let mut cursor = 0;

    while cursor < bytes.len() {
        let key = read_field(bytes, &mut cursor, "key")?;
        let value = read_field(bytes, &mut cursor, "value")?;
        data.insert(key, value);
    }

    Ok(data)
}

fn read_field(bytes: &[u8], cursor: &mut usize, what: &str) -> Result<Vec<u8>, String> {
    let len_end = *cursor + 4;
    let len_bytes: [u8; 4] = bytes
        .get(*cursor..len_end)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| format!("truncated {} length at offset {}", what, cursor))?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    let end = len_end + len;
    let field = bytes
        .get(len_end..end)
        .ok_or_else(|| format!("truncated {} at offset {}", what, len_end))?;
    *cursor = end;
    Ok(field.to_vec())
}
