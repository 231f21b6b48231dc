//! Comando build - Configura e compila o kernel

use anyhow::Result;
use colored::*;

use crate::commands::{ProjectArgs, hint_on_missing_tool};
use crate::core::options::names;
use crate::core::utils;

pub fn run(args: &ProjectArgs, verbose: bool, quiet: bool) -> Result<()> {
    println!("{}", "🔨 Forjando o MicroKernel...".bright_yellow());

    let project = args.load()?;
    utils::print_info("Arquitetura", project.config.text(names::ARCH).unwrap_or_default());
    utils::print_info("Build", project.paths.build.display());

    let pipeline = project.pipeline(verbose, quiet);

    utils::print_step("Validando e gerando descritores...");
    let generated = pipeline.generate(&project.config)?;
    utils::print_success("Descritores gerados");
    if verbose {
        utils::print_info("Cross file", generated.files.cross_file.display());
    }

    utils::print_step("Verificando ferramentas...");
    let tools = pipeline
        .check_tools(&project.config)
        .inspect_err(hint_on_missing_tool)?;
    if verbose {
        for (tool, path) in &tools {
            utils::print_info(&format!("{} {}", tool.name, tool.version), path.display());
        }
    }
    utils::print_success("Ferramentas encontradas");

    utils::print_step("Configurando (meson setup)...");
    pipeline
        .driver()
        .configure(&generated.files)
        .inspect_err(hint_on_missing_tool)?;
    utils::print_success("Configurado");

    utils::print_step("Compilando (meson compile)...");
    pipeline.driver().build().inspect_err(hint_on_missing_tool)?;
    utils::print_success("Kernel compilado");

    println!("{}", "✓ Build concluído!".bright_green().bold());
    Ok(())
}
