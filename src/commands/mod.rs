//! Módulo de comandos do Crucible

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::core::backend::MesonBackend;
use crate::core::error::{BuildError, Error};
use crate::core::options::ConfigurationSet;
use crate::core::pipeline::{self, Paths, Pipeline};
use crate::core::recipe::Recipe;
use crate::core::{builder, config, utils};

pub mod build;
pub mod clean;
pub mod create;
pub mod env;
pub mod generate;
pub mod options;
pub mod package;
pub mod validate;

/// Onde está o projeto e como configurá-lo
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Diretório dos fontes do kernel (padrão: ancestral mais próximo com meson.build)
    #[arg(long, global = true, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Diretório de build (padrão: <fontes>/build)
    #[arg(long, global = true, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Diretório do pacote (padrão: <fontes>/package)
    #[arg(long, global = true, value_name = "DIR")]
    pub package_dir: Option<PathBuf>,

    /// Arquivo de projeto (padrão: <fontes>/crucible.toml, se existir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Executável do meson (padrão: meson no PATH)
    #[arg(long, global = true, env = "CRUCIBLE_MESON", value_name = "PROGRAM")]
    pub meson: Option<String>,

    /// Sobrescreve uma opção de build (repetível)
    #[arg(short = 'o', long = "option", global = true, value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

/// Project resolved from the command line and project file
#[derive(Debug)]
pub struct Project {
    pub recipe: Recipe,
    pub meson: Option<String>,
    pub config: ConfigurationSet,
    pub paths: Paths,
}

impl ProjectArgs {
    pub fn paths(&self) -> Result<Paths> {
        let source = match &self.source_dir {
            Some(dir) => dir
                .canonicalize()
                .with_context(|| format!("Failed to resolve source directory {}", dir.display()))?,
            None => builder::current_project_root()?,
        };

        let build = self
            .build_dir
            .clone()
            .unwrap_or_else(|| source.join(config::project::BUILD_DIR));
        let package = self
            .package_dir
            .clone()
            .unwrap_or_else(|| source.join(config::project::PACKAGE_DIR));

        Ok(Paths {
            source,
            build,
            package,
        })
    }

    pub fn load(&self) -> Result<Project> {
        let paths = self.paths()?;
        let recipe = Recipe::discover(&paths.source, self.config.as_deref())?;
        let config = pipeline::configuration(recipe.option_overrides()?, &self.options)?;

        Ok(Project {
            recipe,
            meson: self.meson.clone(),
            config,
            paths,
        })
    }
}

impl Project {
    pub fn pipeline(&self, verbose: bool, quiet: bool) -> Pipeline<MesonBackend> {
        let mut backend = MesonBackend::new(&self.paths.source, &self.paths.build).verbose(verbose);
        if let Some(program) = &self.meson {
            backend = backend.with_program(program);
        }
        Pipeline::new(backend, self.paths.clone()).show_progress(!quiet)
    }
}

/// Print an install hint when a required tool is missing.
pub(crate) fn hint_on_missing_tool(err: &BuildError) {
    if let BuildError::ToolMissing { tool, version } = err {
        utils::print_error(&format!(
            "Instale {tool} {version} (ex: pip install {tool}=={version}) e tente novamente"
        ));
    }
}

/// Same as [`hint_on_missing_tool`], for pipeline errors.
pub(crate) fn hint_on_pipeline_error(err: &Error) {
    if let Error::Build(err) = err {
        hint_on_missing_tool(err);
    }
}
