//! Comando clean - Limpa artefatos
use anyhow::Result;
use colored::*;

use crate::commands::ProjectArgs;
use crate::core::{builder, utils};

pub fn run(args: &ProjectArgs, all: bool, _verbose: bool) -> Result<()> {
    println!("{}", "🧹 Limpando artefatos...".bright_yellow());

    let paths = args.paths()?;

    let mut targets = vec![paths.build];
    if all {
        println!("   Limpando tudo (incluindo pacote)");
        targets.push(paths.package);
    }

    for dir in targets {
        if builder::remove_dir_all(&dir)? {
            utils::print_success(&format!("Removido {}", dir.display()));
        } else {
            utils::print_step(&format!("{} não existe", dir.display()));
        }
    }

    Ok(())
}
