//! Manifest module - Package metadata written next to the staged artifacts

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::config::package_paths;
use crate::core::error::PackageError;
use crate::core::options::ConfigurationSet;
use crate::core::packager::PackageLayout;
use crate::core::recipe::PackageInfo;

#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub package: &'a PackageInfo,
    pub layout: ManifestLayout,
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ManifestLayout {
    pub bindirs: Vec<PathBuf>,
    pub includedirs: Vec<PathBuf>,
}

impl<'a> Manifest<'a> {
    pub fn new(package: &'a PackageInfo, layout: &PackageLayout, config: &ConfigurationSet) -> Self {
        Self {
            package,
            layout: ManifestLayout {
                bindirs: vec![layout.bindir.clone()],
                includedirs: vec![layout.includedir.clone()],
            },
            options: config
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        }
    }

    pub fn render(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Write to `<package_root>/manifest.toml`.
    pub fn write(&self, package_root: &Path) -> Result<PathBuf, PackageError> {
        let path = package_root.join(package_paths::MANIFEST);
        let text = self.render().map_err(|err| PackageError::Io {
            action: "failed to serialize",
            path: path.clone(),
            source: std::io::Error::other(err),
        })?;
        std::fs::write(&path, text).map_err(|source| PackageError::Io {
            action: "failed to write",
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
