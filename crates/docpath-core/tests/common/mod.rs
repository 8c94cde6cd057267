//! Shared fixture for integration tests: a scratch cache root and the
//! settings pointing into it.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use docpath_core::config::DocpathConfig;
use docpath_core::ResolverSettings;
use tempfile::TempDir;

pub const PUBLIC_ROOT: &str = "/storage/emulated/0";

pub struct Fixture {
    dir: TempDir,
    pub settings: ResolverSettings,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = DocpathConfig {
            cache_root: Some(dir.path().join("cache")),
            public_storage_root: Some(PathBuf::from(PUBLIC_ROOT)),
            ..DocpathConfig::default()
        };
        let settings = ResolverSettings::from_config(&cfg).expect("settings from config");
        Self { dir, settings }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn cache_dir(&self) -> &Path {
        &self.settings.cache_dir
    }

    /// Every file currently under the scratch root, relative to it.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        collect(self.dir.path(), self.dir.path(), &mut out);
        out.sort();
        out
    }
}

fn collect(base: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(base, &path, out);
        } else if let Ok(rel) = path.strip_prefix(base) {
            out.push(rel.to_path_buf());
        }
    }
}
