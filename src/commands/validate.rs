//! Comando validate - Valida a configuração
use anyhow::Result;
use colored::*;

use crate::commands::ProjectArgs;
use crate::core::{utils, validate};

pub fn run(args: &ProjectArgs, _verbose: bool) -> Result<()> {
    println!("{}", "🔍 Validando configuração...".bright_yellow());

    let project = args.load()?;
    if let Err(err) = validate::validate(&project.config) {
        utils::print_error(&err.to_string());
        return Err(err.into());
    }

    utils::print_success("Configuração válida");
    Ok(())
}
