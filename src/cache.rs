use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::CacheConfig;
use crate::error::{BridgeError, BridgeResult};

/// Fixed prefix for every file this crate writes into the cache directory;
/// the janitor never touches anything else.
pub const CACHE_FILE_PREFIX: &str = "PdfViewerBridge";

const CACHE_SUBDIR: &str = "pdf-viewer-bridge";

#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    pub fn from_config(config: &CacheConfig) -> BridgeResult<Self> {
        if let Some(dir) = &config.directory {
            return Ok(Self::at(dir.clone()));
        }

        let base = dirs::cache_dir().ok_or_else(|| {
            BridgeError::invalid_argument("no per-user cache directory is available")
        })?;
        Ok(Self::at(base.join(CACHE_SUBDIR)))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Deletes every prefix-matching file (case-insensitive) and returns how
    /// many were removed. A missing cache directory counts as already clean.
    pub fn clear(&self) -> BridgeResult<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(BridgeError::io_with_context(
                    source,
                    format!("failed to list cache directory {}", self.dir.display()),
                ));
            }
        };

        let prefix = CACHE_FILE_PREFIX.to_lowercase();
        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|source| {
                BridgeError::io_with_context(
                    source,
                    format!("failed to list cache directory {}", self.dir.display()),
                )
            })?;
            let name = entry.file_name();
            if !name.to_string_lossy().to_lowercase().starts_with(&prefix) {
                continue;
            }
            if !entry.path().is_file() {
                continue;
            }
            fs::remove_file(entry.path()).map_err(|source| {
                BridgeError::io_with_context(
                    source,
                    format!("failed to remove cached file {}", entry.path().display()),
                )
            })?;
            removed += 1;
        }

        Ok(removed)
    }

    /// `<prefix>-<baseName>` for a source document path, directory and
    /// extension stripped.
    pub fn page_file_stem(source: &Path) -> String {
        let base = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "document".to_string());
        format!("{CACHE_FILE_PREFIX}-{base}")
    }

    /// Writes `bytes` to a uniquely named `<stem>-<pageIndex>-<token>.png`
    /// inside the cache directory and returns its path.
    pub fn create_page_file(
        &self,
        stem: &str,
        page_index: usize,
        bytes: &[u8],
    ) -> BridgeResult<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| {
            BridgeError::io_with_context(
                source,
                format!("failed to create cache directory {}", self.dir.display()),
            )
        })?;

        let mut file = tempfile::Builder::new()
            .prefix(&format!("{stem}-{page_index}-"))
            .suffix(".png")
            .tempfile_in(&self.dir)
            .map_err(|source| {
                BridgeError::io_with_context(source, "failed to create page cache file")
            })?;
        file.write_all(bytes).map_err(|source| {
            BridgeError::io_with_context(source, "failed to write page cache file")
        })?;

        let (_, path) = file.keep().map_err(|err| {
            BridgeError::io_with_context(err.error, "failed to persist page cache file")
        })?;
        Ok(path)
    }
}
