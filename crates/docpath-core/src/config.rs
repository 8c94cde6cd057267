use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::metadata::sanitize_filename;
use crate::resolver::AuthorityKind;

/// Name of the subdirectory of the cache root that holds materialized files.
pub const DEFAULT_CACHE_DIR_NAME: &str = "NetworkClientCacheDir";

/// Public storage root used when none is configured.
pub const DEFAULT_PUBLIC_STORAGE_ROOT: &str = "/storage/emulated/0";

fn default_cache_dir_name() -> String {
    DEFAULT_CACHE_DIR_NAME.to_string()
}

/// Global configuration loaded from `~/.config/docpath/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocpathConfig {
    /// Subdirectory of `cache_root` that materialized files are written to.
    #[serde(default = "default_cache_dir_name")]
    pub cache_dir_name: String,
    /// Process-private cache root (None = `$XDG_CACHE_HOME/docpath`).
    #[serde(default)]
    pub cache_root: Option<PathBuf>,
    /// Public storage root for `primary:` ids (None = `/storage/emulated/0`).
    #[serde(default)]
    pub public_storage_root: Option<PathBuf>,
    /// Extra `authority = "kind"` entries registered over the built-in table.
    #[serde(default)]
    pub authorities: BTreeMap<String, AuthorityKind>,
}

impl Default for DocpathConfig {
    fn default() -> Self {
        Self {
            cache_dir_name: default_cache_dir_name(),
            cache_root: None,
            public_storage_root: None,
            authorities: BTreeMap::new(),
        }
    }
}

impl DocpathConfig {
    /// Rejects values that would let cache writes escape the cache root.
    pub fn validate(&self) -> Result<()> {
        let sanitized = sanitize_filename(Some(&self.cache_dir_name)).unwrap_or_default();
        if sanitized.is_empty() || sanitized != self.cache_dir_name {
            anyhow::bail!(
                "cache_dir_name {:?} must be a single plain directory name",
                self.cache_dir_name
            );
        }
        Ok(())
    }

    pub fn public_storage_root(&self) -> PathBuf {
        self.public_storage_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_STORAGE_ROOT))
    }

    pub fn cache_root(&self) -> Result<PathBuf> {
        match &self.cache_root {
            Some(root) => Ok(root.clone()),
            None => {
                let xdg_dirs = xdg::BaseDirectories::with_prefix("docpath")?;
                Ok(xdg_dirs.get_cache_home().join("docpath"))
            }
        }
    }

    /// Full path of the materialization directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        Ok(self.cache_root()?.join(&self.cache_dir_name))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("docpath")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DocpathConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DocpathConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<DocpathConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: DocpathConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
