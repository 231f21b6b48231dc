//! Backend module - External build backend and the driver that sequences it
//!
//! Everything that knows about the backend's file formats and command line
//! lives behind [`BuildBackend`]; validation and the option schema never see it.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::core::config::generated;
use crate::core::error::{BuildError, GenerationError};
use crate::core::requirements::{self, Tool};
use crate::core::toolchain::{self, CrossCompilationFile, GeneratedFiles, ToolchainDescriptor};

/// Narrow interface to an external build backend
pub trait BuildBackend {
    /// Write the descriptors in the backend's own format.
    fn emit_descriptor(
        &self,
        descriptor: &ToolchainDescriptor,
        cross: &CrossCompilationFile,
    ) -> Result<GeneratedFiles, GenerationError>;

    /// Run the backend's configure step against the emitted descriptors.
    fn configure(&self, generated: &GeneratedFiles) -> Result<(), BuildError>;

    /// Run the backend's build step.
    fn build(&self) -> Result<(), BuildError>;

    /// Find a required tool on the host.
    fn locate(&self, tool: Tool) -> Result<PathBuf, BuildError> {
        requirements::locate(tool)
    }
}

/// Meson + Ninja backend
#[derive(Debug, Clone)]
pub struct MesonBackend {
    tool: Tool,
    program: String,
    source_dir: PathBuf,
    build_dir: PathBuf,
    verbose: bool,
}

impl MesonBackend {
    pub fn new(source_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool: requirements::MESON,
            program: requirements::MESON.name.to_string(),
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
            verbose: false,
        }
    }

    /// Run a different executable in place of `meson`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn generators_dir(&self) -> PathBuf {
        self.build_dir.join(generated::GENERATORS_DIR)
    }

    /// Whether the build directory was configured before.
    fn is_configured(&self) -> bool {
        self.build_dir.join("meson-private").is_dir()
    }

    pub fn configure_args(&self, generated: &GeneratedFiles) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["setup".into()];
        if self.is_configured() {
            args.push("--reconfigure".into());
        }
        args.push("--backend".into());
        args.push(requirements::NINJA.name.into());
        args.push("--native-file".into());
        args.push(generated.native_file.clone().into());
        args.push("--cross-file".into());
        args.push(generated.cross_file.clone().into());
        args.push(self.build_dir.clone().into());
        args.push(self.source_dir.clone().into());
        args
    }

    pub fn build_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["compile".into(), "-C".into(), self.build_dir.clone().into()];
        if self.verbose {
            args.push("-v".into());
        }
        args
    }

    fn tool_missing(&self) -> BuildError {
        BuildError::ToolMissing {
            tool: self.program.clone(),
            version: self.tool.version.to_string(),
        }
    }

    fn run_step(&self, step: &'static str, args: &[OsString]) -> Result<(), BuildError> {
        let program = self.locate(self.tool)?;

        let shown: Vec<_> = args.iter().map(|arg| arg.to_string_lossy()).collect();
        log::info!("{step}: {} {}", program.display(), shown.join(" "));

        // stdout/stderr are inherited so backend diagnostics reach the user unmodified
        let status = Command::new(&program)
            .args(args)
            .status()
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => self.tool_missing(),
                _ => BuildError::Launch {
                    tool: self.program.clone(),
                    source,
                },
            })?;

        if !status.success() {
            return Err(BuildError::StepFailed {
                step,
                code: status.code(),
            });
        }

        Ok(())
    }
}

impl BuildBackend for MesonBackend {
    fn emit_descriptor(
        &self,
        descriptor: &ToolchainDescriptor,
        cross: &CrossCompilationFile,
    ) -> Result<GeneratedFiles, GenerationError> {
        toolchain::write_descriptors(&self.generators_dir(), descriptor, cross)
    }

    fn configure(&self, generated: &GeneratedFiles) -> Result<(), BuildError> {
        self.run_step("configure", &self.configure_args(generated))
    }

    fn build(&self) -> Result<(), BuildError> {
        self.run_step("build", &self.build_args())
    }

    /// `meson` resolves to the configured program; other tools come from PATH.
    fn locate(&self, tool: Tool) -> Result<PathBuf, BuildError> {
        if tool.name != self.tool.name {
            return requirements::locate(tool);
        }
        which::which(&self.program).map_err(|_| self.tool_missing())
    }
}

/// Runs configure, then build, stopping at the first failure
pub struct BuildDriver<B> {
    backend: B,
}

impl<B: BuildBackend> BuildDriver<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn configure(&self, generated: &GeneratedFiles) -> Result<(), BuildError> {
        self.backend.configure(generated)
    }

    pub fn build(&self) -> Result<(), BuildError> {
        self.backend.build()
    }

    /// Configure and build. No retries.
    pub fn run(&self, generated: &GeneratedFiles) -> Result<(), BuildError> {
        self.configure(generated)?;
        self.build()
    }
}
