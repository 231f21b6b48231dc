//! Comando create - Pipeline completo: validar, gerar, compilar e empacotar

use anyhow::Result;
use colored::*;

use crate::commands::{ProjectArgs, hint_on_pipeline_error, package};
use crate::core::{requirements, utils};

pub fn run(args: &ProjectArgs, with_archive: bool, verbose: bool, quiet: bool) -> Result<()> {
    let project = args.load()?;
    let info = &project.recipe.package;

    println!(
        "{}",
        format!("🔥 Criando {} {}...", info.name, info.version).bright_yellow()
    );

    let tools = requirements::resolve(requirements::BUILD_REQUIREMENTS, &project.config);
    for tool in &tools {
        utils::print_step(&format!("Requer {} {}", tool.name, tool.version));
    }

    let pipeline = project.pipeline(verbose, quiet);
    let (_, layout) = pipeline
        .create(&project.config)
        .inspect_err(hint_on_pipeline_error)?;

    package::finish(&project, &layout, with_archive)?;

    println!("{}", "✓ Pacote pronto!".bright_green().bold());
    Ok(())
}
