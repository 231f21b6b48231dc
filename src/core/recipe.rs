//! Recipe module - Package metadata and the project file
//!
//! The project file (`crucible.toml`) is optional. Every section and key in it
//! is optional too; missing metadata falls back to the built-in defaults.
//!
//! ```toml
//! [package]
//! version = "0.2.0"
//!
//! [options]
//! kernel_debug = false
//! max_cpus = 16
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::config;

/// Package metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub license: String,
    pub author: String,
    pub url: String,
    pub description: String,
    pub topics: Vec<String>,
}

impl Default for PackageInfo {
    fn default() -> Self {
        Self {
            name: config::package::NAME.to_string(),
            version: config::package::VERSION.to_string(),
            license: config::package::LICENSE.to_string(),
            author: config::package::AUTHOR.to_string(),
            url: config::package::URL.to_string(),
            description: config::package::DESCRIPTION.to_string(),
            topics: config::package::TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Recipe loaded from the project file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Recipe {
    pub package: PackageInfo,
    /// Raw option overrides, converted to strings by [`Recipe::option_overrides`]
    pub options: BTreeMap<String, toml::Value>,
}

impl Recipe {
    /// Load a recipe from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading project file '{}'", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing project file '{}'", path.display()))
    }

    /// Load `path` if given, else the project file in `source_root` if present,
    /// else the defaults.
    pub fn discover(source_root: &Path, path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = source_root.join(config::project::PROJECT_FILE);
        if default_path.is_file() {
            log::debug!("using project file {}", default_path.display());
            return Self::load(&default_path);
        }

        Ok(Self::default())
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Option overrides as `(name, value)` text pairs.
    ///
    /// TOML strings are taken verbatim; booleans and integers use their
    /// literal form. Tables and arrays are rejected.
    pub fn option_overrides(&self) -> Result<Vec<(String, String)>> {
        self.options
            .iter()
            .map(|(name, value)| {
                let text = match value {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Boolean(b) => b.to_string(),
                    toml::Value::Integer(i) => i.to_string(),
                    other => anyhow::bail!(
                        "option '{}' must be a string, boolean or integer, got {}",
                        name,
                        other.type_str()
                    ),
                };
                Ok((name.clone(), text))
            })
            .collect()
    }

    /// Archive file name for this package
    pub fn archive_name(&self) -> String {
        format!("{}-{}.tar", self.package.name, self.package.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_gives_defaults() {
        let recipe = Recipe::parse("").unwrap();
        assert_eq!(recipe.package, PackageInfo::default());
        assert_eq!(recipe.package.name, "microkernel");
        assert_eq!(recipe.package.version, "0.1.0");
        assert!(recipe.options.is_empty());
    }

    #[test]
    fn options_are_stringified() {
        let recipe = Recipe::parse(
            r#"
            [package]
            version = "0.2.0"

            [options]
            kernel_debug = false
            max_cpus = 16
            arch = "x86_64"
            "#,
        )
        .unwrap();

        assert_eq!(recipe.package.version, "0.2.0");
        assert_eq!(recipe.package.name, "microkernel");
        assert_eq!(
            recipe.option_overrides().unwrap(),
            vec![
                ("arch".to_string(), "x86_64".to_string()),
                ("kernel_debug".to_string(), "false".to_string()),
                ("max_cpus".to_string(), "16".to_string()),
            ]
        );
        assert_eq!(recipe.archive_name(), "microkernel-0.2.0.tar");
    }

    #[test]
    fn array_option_is_rejected() {
        let recipe = Recipe::parse("[options]\nmax_cpus = [1, 2]\n").unwrap();
        assert!(recipe.option_overrides().is_err());
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(Recipe::parse("[settings]\nos = \"none\"\n").is_err());
    }

    #[test]
    fn discover_prefers_explicit_path() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("crucible.toml"),
            "[package]\nversion = \"1.0.0\"\n",
        )
        .unwrap();
        let explicit = tmp.path().join("other.toml");
        std::fs::write(&explicit, "[package]\nversion = \"2.0.0\"\n").unwrap();

        let found = Recipe::discover(tmp.path(), None).unwrap();
        assert_eq!(found.package.version, "1.0.0");

        let found = Recipe::discover(tmp.path(), Some(explicit.as_path())).unwrap();
        assert_eq!(found.package.version, "2.0.0");
    }

    #[test]
    fn discover_without_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(Recipe::discover(tmp.path(), None).unwrap(), Recipe::default());
    }
}
