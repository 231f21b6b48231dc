//! Crucible - Build do MicroKernel
//!
//! Transforma um conjunto de opções de build em descritores para o Meson,
//! dirige o build externo e empacota os artefatos.
//!
//! # Pipeline
//! - Opções (padrões + crucible.toml + `-o chave=valor`)
//! - Validação
//! - Descritores (native file + cross file bare-metal)
//! - meson setup / meson compile
//! - Pacote (licenses/, boot/, include/)
//!
//! # Uso
//! ```bash
//! crucible build -o kernel_debug=false
//! crucible package --archive
//! crucible create
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;

mod commands;
mod core;

use commands::ProjectArgs;

#[derive(Parser)]
#[command(name = "crucible")]
#[command(about = "🔥 Crucible - Configura, compila e empacota o MicroKernel", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    project: ProjectArgs,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lista opções, domínios e valores efetivos
    Options,

    /// Valida a configuração
    Validate,

    /// Gera os descritores do toolchain
    Generate,

    /// Configura e compila o kernel
    Build,

    /// Empacota os artefatos do build
    Package {
        /// Também gera <nome>-<versão>.tar ao lado do pacote
        #[arg(long)]
        archive: bool,
    },

    /// Pipeline completo (validar, gerar, compilar, empacotar)
    Create {
        /// Também gera <nome>-<versão>.tar ao lado do pacote
        #[arg(long)]
        archive: bool,
    },

    /// Verifica as ferramentas de build
    Env,

    /// Limpa artefatos
    Clean {
        /// Remove também o pacote
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Banner
    if !cli.quiet {
        println!("{}", "🔥 Crucible - Build do MicroKernel".bright_cyan().bold());
        println!("{}", "   Opções, toolchain, build e pacote".bright_black());
        println!();
    }

    let project = &cli.project;
    match cli.command {
        Commands::Options => commands::options::run(project, cli.verbose)?,
        Commands::Validate => commands::validate::run(project, cli.verbose)?,
        Commands::Generate => commands::generate::run(project, cli.verbose, cli.quiet)?,
        Commands::Build => commands::build::run(project, cli.verbose, cli.quiet)?,
        Commands::Package { archive } => {
            commands::package::run(project, archive, cli.verbose, cli.quiet)?;
        }
        Commands::Create { archive } => {
            commands::create::run(project, archive, cli.verbose, cli.quiet)?;
        }
        Commands::Env => commands::env::run(project, cli.verbose)?,
        Commands::Clean { all } => commands::clean::run(project, all, cli.verbose)?,
    }

    Ok(())
}
