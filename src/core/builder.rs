//! Builder module - Project location and filesystem helpers

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::config;
use crate::core::error::PackageError;

/// Find the kernel source root: the nearest ancestor of `start` holding `meson.build`.
pub fn project_root(start: &Path) -> Result<PathBuf> {
    let mut current = start
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", start.display()))?;

    loop {
        if current.join(config::project::BUILD_DEFINITION).is_file() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    anyhow::bail!(
        "Could not find project root ({} in {} or any parent)",
        config::project::BUILD_DEFINITION,
        start.display()
    )
}

/// Project root starting from the current directory
pub fn current_project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    project_root(&cwd)
}

/// Copy a file from source to destination, creating parent directories
pub fn copy_file(src: &Path, dest: &Path) -> Result<(), PackageError> {
    if let Some(parent) = dest.parent() {
        create_dir_all(parent)?;
    }

    std::fs::copy(src, dest).map_err(|source| PackageError::Io {
        action: "failed to copy",
        path: src.to_path_buf(),
        source,
    })?;

    log::debug!("copied {} -> {}", src.display(), dest.display());
    Ok(())
}

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), PackageError> {
    std::fs::create_dir_all(path).map_err(|source| PackageError::Io {
        action: "failed to create directory",
        path: path.to_path_buf(),
        source,
    })
}

/// Remove a directory tree if it exists
pub fn remove_dir_all(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }

    std::fs::remove_dir_all(path)
        .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn project_root_walks_up_to_build_definition() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("meson.build"), "project('k', 'c')\n").unwrap();
        let nested = tmp.path().join("kernel/mm");
        std::fs::create_dir_all(&nested).unwrap();

        let root = project_root(&nested).unwrap();
        assert_eq!(root, tmp.path().canonicalize().unwrap());
    }

    #[test]
    fn copy_file_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.h");
        std::fs::write(&src, "#pragma once\n").unwrap();
        let dest = tmp.path().join("out/include/a.h");

        copy_file(&src, &dest).unwrap();
        assert_eq!(std::fs::read_to_string(dest).unwrap(), "#pragma once\n");
    }

    #[test]
    fn remove_missing_dir_is_noop() {
        let tmp = TempDir::new().unwrap();
        assert!(!remove_dir_all(&tmp.path().join("nope")).unwrap());
    }
}
