//! Comando env - Verifica as ferramentas de build
use anyhow::Result;
use colored::*;
use xshell::Shell;

use crate::commands::{ProjectArgs, hint_on_missing_tool};
use crate::core::{requirements, utils};

pub fn run(args: &ProjectArgs, _verbose: bool) -> Result<()> {
    println!("{}", "🔧 Ambiente de build:".bright_cyan());
    println!();

    let project = args.load()?;
    utils::print_info("Fontes", project.paths.source.display());
    utils::print_info("Build", project.paths.build.display());
    utils::print_info("Pacote", project.paths.package.display());
    println!();

    let sh = Shell::new()?;
    let tools = requirements::resolve(requirements::BUILD_REQUIREMENTS, &project.config);

    let mut missing = None;
    for tool in tools {
        match requirements::probe(&sh, tool) {
            Ok(status) if status.version_matches() => utils::print_success(&format!(
                "{} {} ({})",
                tool.name,
                tool.version,
                status.path.display()
            )),
            Ok(status) => utils::print_warning(&format!(
                "{} {} encontrado, {} é o esperado ({})",
                tool.name,
                status.found_version.as_deref().unwrap_or("?"),
                tool.version,
                status.path.display()
            )),
            Err(err) => {
                utils::print_error(&err.to_string());
                hint_on_missing_tool(&err);
                if missing.is_none() {
                    missing = Some(err);
                }
            }
        }
    }

    match missing {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
