//! Archive module - Deterministic tarball of a package root

use std::fs::File;
use std::path::Path;

use tar::{Builder, EntryType, Header};
use walkdir::WalkDir;

use crate::core::error::PackageError;

/// Write every file and directory under `package_root` into a tar at `output`.
///
/// Entries are sorted by path and carry no timestamps or ownership, so the same
/// package tree always yields the same bytes. Paths inside the archive are
/// prefixed with `prefix/`.
pub fn write_archive(package_root: &Path, prefix: &str, output: &Path) -> Result<(), PackageError> {
    let io_err = |action: &'static str, path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| PackageError::Io {
            action,
            path,
            source,
        }
    };

    let file = File::create(output).map_err(io_err("failed to create", output))?;
    let mut builder = Builder::new(file);

    for entry in WalkDir::new(package_root).sort_by_file_name().min_depth(1) {
        let entry = entry.map_err(|source| PackageError::Walk {
            root: package_root.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(package_root) else {
            continue;
        };
        let name = Path::new(prefix).join(relative);

        let mut header = Header::new_gnu();
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);

        if entry.file_type().is_dir() {
            header.set_entry_type(EntryType::Directory);
            header.set_mode(0o755);
            header.set_size(0);
            builder
                .append_data(&mut header, &name, std::io::empty())
                .map_err(io_err("failed to archive", entry.path()))?;
        } else if entry.file_type().is_file() {
            let data = std::fs::read(entry.path()).map_err(io_err("failed to read", entry.path()))?;
            header.set_entry_type(EntryType::Regular);
            header.set_mode(0o644);
            header.set_size(data.len() as u64);
            builder
                .append_data(&mut header, &name, data.as_slice())
                .map_err(io_err("failed to archive", entry.path()))?;
        }
    }

    builder
        .into_inner()
        .map_err(io_err("failed to finish", output))?;

    log::info!("archive written: {}", output.display());
    Ok(())
}
