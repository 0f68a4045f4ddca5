use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{BridgeError, BridgeResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct BridgeConfig {
    pub render: RenderConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    /// Raster width of every page image, in pixels. Height follows the
    /// page's aspect ratio.
    pub target_page_width: u32,
    pub density_dpi: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            target_page_width: 2048,
            density_dpi: 160,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CacheConfig {
    /// Overrides the per-user cache directory when set.
    pub directory: Option<PathBuf>,
}

impl BridgeConfig {
    pub fn load() -> BridgeResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(BridgeError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            BridgeError::io_with_context(
                source,
                format!("failed to read config: {}", path.display()),
            )
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            BridgeError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.render.target_page_width = self.render.target_page_width.max(16);
        self.render.density_dpi = self.render.density_dpi.max(1);
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("PVB_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("pvb").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("pvb")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("pvb").join("config.toml"));
    }
    None
}
