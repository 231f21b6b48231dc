//! Packager module - Stages build outputs into the package layout
//!
//! Artifact classes are copied in declaration order. Each copy overwrites its
//! destination files and leaves everything else in the package root alone, so
//! repeated runs over the same build output give the same tree. A failed class
//! does not roll back the ones before it.

use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use crate::core::builder;
use crate::core::config::{artifacts, package_paths};
use crate::core::error::PackageError;

/// Where an artifact class is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRoot {
    Source,
    Build,
}

/// A declaration of what to copy into the package
#[derive(Debug, Clone, Copy)]
pub struct ArtifactClass {
    pub name: &'static str,
    /// File pattern; `*` and `?` match against the path relative to the source directory
    pub pattern: &'static str,
    pub root: ArtifactRoot,
    /// Directory under the root to read from (empty for the root itself)
    pub source_dir: &'static str,
    /// Directory under the package root to copy into
    pub dest_dir: &'static str,
    /// A required class must match at least one file
    pub required: bool,
}

pub const ARTIFACT_CLASSES: &[ArtifactClass] = &[
    ArtifactClass {
        name: "license",
        pattern: artifacts::LICENSE,
        root: ArtifactRoot::Source,
        source_dir: "",
        dest_dir: package_paths::LICENSES,
        required: false,
    },
    ArtifactClass {
        name: "kernel ELF image",
        pattern: artifacts::KERNEL_ELF,
        root: ArtifactRoot::Build,
        source_dir: "",
        dest_dir: package_paths::BOOT,
        required: true,
    },
    ArtifactClass {
        name: "kernel raw image",
        pattern: artifacts::KERNEL_BIN,
        root: ArtifactRoot::Build,
        source_dir: "",
        dest_dir: package_paths::BOOT,
        required: true,
    },
    ArtifactClass {
        name: "public headers",
        pattern: artifacts::HEADERS,
        root: ArtifactRoot::Source,
        source_dir: "include",
        dest_dir: package_paths::INCLUDE,
        required: false,
    },
    ArtifactClass {
        name: "kernel headers",
        pattern: artifacts::HEADERS,
        root: ArtifactRoot::Source,
        source_dir: "kernel/include",
        dest_dir: package_paths::KERNEL_INCLUDE,
        required: false,
    },
];

/// Published layout of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    pub root: PathBuf,
    /// Binaries directory, relative to `root`
    pub bindir: PathBuf,
    /// Includes directory, relative to `root`
    pub includedir: PathBuf,
}

impl PackageLayout {
    pub fn bin_path(&self) -> PathBuf {
        self.root.join(&self.bindir)
    }

    pub fn include_path(&self) -> PathBuf {
        self.root.join(&self.includedir)
    }
}

/// Copies the declared artifact classes into a package root
#[derive(Debug, Clone)]
pub struct Packager {
    classes: &'static [ArtifactClass],
    show_progress: bool,
}

impl Default for Packager {
    fn default() -> Self {
        Self {
            classes: ARTIFACT_CLASSES,
            show_progress: false,
        }
    }
}

impl Packager {
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Copy every artifact class into `package_root` and publish the layout.
    pub fn package(
        &self,
        source_root: &Path,
        build_root: &Path,
        package_root: &Path,
    ) -> Result<PackageLayout, PackageError> {
        let progress = if self.show_progress {
            let bar = ProgressBar::new(self.classes.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("   {bar:30.cyan/blue} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        } else {
            ProgressBar::hidden()
        };

        for class in self.classes {
            progress.set_message(class.name);

            let base = match class.root {
                ArtifactRoot::Source => source_root,
                ArtifactRoot::Build => build_root,
            };
            let src_dir = if class.source_dir.is_empty() {
                base.to_path_buf()
            } else {
                base.join(class.source_dir)
            };
            let dest_dir = package_root.join(class.dest_dir);

            let copied = copy_matching(class.pattern, &src_dir, &dest_dir)?;
            log::info!("{}: {} file(s) -> {}", class.name, copied, dest_dir.display());

            if copied == 0 && class.required {
                progress.abandon();
                return Err(PackageError::MissingArtifact {
                    artifact: class.name.to_string(),
                    path: src_dir.join(class.pattern),
                });
            }

            progress.inc(1);
        }
        progress.finish_and_clear();

        let layout = PackageLayout {
            root: package_root.to_path_buf(),
            bindir: PathBuf::from(package_paths::BOOT),
            includedir: PathBuf::from(package_paths::INCLUDE),
        };

        // Consumers rely on both directories existing, even when empty
        builder::create_dir_all(&layout.bin_path())?;
        builder::create_dir_all(&layout.include_path())?;

        Ok(layout)
    }
}

/// Copy files under `src_dir` matching `pattern` into `dest_dir`, keeping
/// relative paths. A missing `src_dir` copies nothing.
pub fn copy_matching(pattern: &str, src_dir: &Path, dest_dir: &Path) -> Result<usize, PackageError> {
    if !src_dir.is_dir() {
        log::debug!("{} does not exist, nothing to copy", src_dir.display());
        return Ok(0);
    }

    // An exact path names a single file; no need to walk the tree for it
    if !pattern.contains(['*', '?']) {
        let candidate = src_dir.join(pattern);
        if !candidate.is_file() {
            return Ok(0);
        }
        builder::copy_file(&candidate, &dest_dir.join(pattern))?;
        return Ok(1);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| PackageError::Walk {
            root: src_dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(src_dir) else {
            continue;
        };
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        if !pattern_matches(pattern, &relative_str) {
            continue;
        }

        builder::copy_file(entry.path(), &dest_dir.join(relative))?;
        copied += 1;
    }

    Ok(copied)
}

/// Shell-style match where `*` and `?` also cross directory separators.
///
/// Patterns without wildcards only match the exact relative path.
pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let path: Vec<char> = path.chars().collect();

    let (mut p, mut s) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while s < path.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == path[s]) {
            p += 1;
            s += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, s));
            p += 1;
        } else if let Some((star_p, star_s)) = backtrack {
            p = star_p + 1;
            s = star_s + 1;
            backtrack = Some((star_p, star_s + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
