//! Comando package - Empacota os artefatos do build

use anyhow::{Context, Result};
use colored::*;
use std::path::PathBuf;

use crate::commands::{Project, ProjectArgs};
use crate::core::archive;
use crate::core::manifest::Manifest;
use crate::core::packager::PackageLayout;
use crate::core::utils;

pub fn run(args: &ProjectArgs, with_archive: bool, verbose: bool, quiet: bool) -> Result<()> {
    println!("{}", "📦 Criando pacote...".bright_yellow());

    let project = args.load()?;
    let pipeline = project.pipeline(verbose, quiet);

    utils::print_step("Copiando artefatos...");
    let layout = pipeline.package()?;

    finish(&project, &layout, with_archive)
}

/// Write the manifest (and optionally the archive), then report the layout.
pub(crate) fn finish(project: &Project, layout: &PackageLayout, with_archive: bool) -> Result<()> {
    let manifest = Manifest::new(&project.recipe.package, layout, &project.config);
    let manifest_path = manifest.write(&layout.root)?;

    utils::print_success("Pacote criado com sucesso!");
    utils::print_info("Localização", layout.root.display());
    utils::print_info("Binários", layout.bin_path().display());
    utils::print_info("Headers", layout.include_path().display());
    utils::print_info("Manifesto", manifest_path.display());

    if with_archive {
        let output = archive_path(project)?;
        utils::print_step("Gerando arquivo tar...");
        let prefix = output
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| project.recipe.package.name.clone());
        archive::write_archive(&layout.root, &prefix, &output)?;
        utils::print_info("Arquivo", output.display());
    }

    Ok(())
}

/// `<name>-<version>.tar` next to the package directory
fn archive_path(project: &Project) -> Result<PathBuf> {
    let parent = project
        .paths
        .package
        .parent()
        .context("Package directory has no parent directory")?;
    Ok(parent.join(project.recipe.archive_name()))
}
