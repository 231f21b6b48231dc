//! Comando options - Lista as opções de build
use anyhow::Result;
use colored::*;

use crate::commands::ProjectArgs;
use crate::core::options::declared_options;

pub fn run(args: &ProjectArgs, verbose: bool) -> Result<()> {
    let project = args.load()?;

    println!("{}", "⚙ Opções de build:".bright_cyan());
    println!();

    for option in declared_options() {
        let effective = project.config.text(option.name).unwrap_or_default();
        let marker = if effective == option.default {
            String::new()
        } else {
            format!(" (padrão: {})", option.default).bright_black().to_string()
        };
        println!(
            "  {:<18} = {}{}",
            option.name.bright_green(),
            effective.bright_cyan(),
            marker
        );
        if verbose {
            println!("  {:<18}   {} {}", "", option.domain, option.help.bright_black());
        }
    }

    println!();
    println!(
        "Use {} para sobrescrever",
        "-o <opção>=<valor>".bright_yellow()
    );
    Ok(())
}
