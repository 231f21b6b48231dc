//! Comando generate - Gera os descritores do toolchain
use anyhow::Result;
use colored::*;

use crate::commands::ProjectArgs;
use crate::core::utils;

pub fn run(args: &ProjectArgs, verbose: bool, quiet: bool) -> Result<()> {
    println!("{}", "🧾 Gerando descritores...".bright_yellow());

    let project = args.load()?;
    let pipeline = project.pipeline(verbose, quiet);

    let generated = pipeline.generate(&project.config)?;

    utils::print_success("Descritores gerados");
    utils::print_info("Native file", generated.files.native_file.display());
    utils::print_info("Cross file", generated.files.cross_file.display());

    if verbose {
        println!();
        print!("{}", generated.descriptor.render());
        println!();
        print!("{}", generated.cross.render());
    }

    Ok(())
}
