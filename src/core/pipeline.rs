//! Pipeline module - Runs the stages in order, stopping at the first failure
//!
//! validate → generate → emit → configure → build → package
//!
//! No stage runs on a predecessor's failure and nothing is retried.

use std::path::PathBuf;

use crate::core::backend::{BuildBackend, BuildDriver};
use crate::core::error::{BuildError, ConfigurationError, Error};
use crate::core::options::{ConfigurationSet, parse_assignment};
use crate::core::packager::{PackageLayout, Packager};
use crate::core::requirements::{self, BUILD_REQUIREMENTS, Requirement, Tool};
use crate::core::toolchain::{self, CrossCompilationFile, GeneratedFiles, ToolchainDescriptor};
use crate::core::validate::validate;

/// Directories a pipeline run works in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub source: PathBuf,
    pub build: PathBuf,
    pub package: PathBuf,
}

/// Output of the generation stage
#[derive(Debug, Clone)]
pub struct Generated {
    pub descriptor: ToolchainDescriptor,
    pub cross: CrossCompilationFile,
    pub files: GeneratedFiles,
}

/// Overlay project-file overrides, then command-line `key=value` assignments,
/// on the defaults.
pub fn configuration(
    project_overrides: Vec<(String, String)>,
    assignments: &[String],
) -> Result<ConfigurationSet, ConfigurationError> {
    let mut overrides = project_overrides;
    for raw in assignments {
        overrides.push(parse_assignment(raw)?);
    }
    ConfigurationSet::from_overrides(overrides)
}

pub struct Pipeline<B> {
    driver: BuildDriver<B>,
    paths: Paths,
    requirements: &'static [Requirement],
    show_progress: bool,
}

impl<B: BuildBackend> Pipeline<B> {
    pub fn new(backend: B, paths: Paths) -> Self {
        Self {
            driver: BuildDriver::new(backend),
            paths,
            requirements: BUILD_REQUIREMENTS,
            show_progress: false,
        }
    }

    /// Use a different requirement table than [`BUILD_REQUIREMENTS`].
    pub fn with_requirements(mut self, table: &'static [Requirement]) -> Self {
        self.requirements = table;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn driver(&self) -> &BuildDriver<B> {
        &self.driver
    }

    /// Validate, derive the descriptors and write them out.
    pub fn generate(&self, config: &ConfigurationSet) -> Result<Generated, Error> {
        validate(config)?;
        let (descriptor, cross) = toolchain::generate(config)?;
        let files = self.driver.backend().emit_descriptor(&descriptor, &cross)?;
        Ok(Generated {
            descriptor,
            cross,
            files,
        })
    }

    /// Locate every tool `config` requires, in table order.
    pub fn check_tools(
        &self,
        config: &ConfigurationSet,
    ) -> Result<Vec<(Tool, PathBuf)>, BuildError> {
        requirements::resolve(self.requirements, config)
            .into_iter()
            .map(|tool| {
                let path = self.driver.backend().locate(tool)?;
                log::debug!("{} found at {}", tool.name, path.display());
                Ok((tool, path))
            })
            .collect()
    }

    /// Generate, check the required tools, then configure and build.
    pub fn build(&self, config: &ConfigurationSet) -> Result<Generated, Error> {
        let generated = self.generate(config)?;
        self.check_tools(config)?;
        self.driver.run(&generated.files)?;
        Ok(generated)
    }

    /// Stage the build outputs into the package root.
    pub fn package(&self) -> Result<PackageLayout, Error> {
        let layout = Packager::default()
            .show_progress(self.show_progress)
            .package(&self.paths.source, &self.paths.build, &self.paths.package)?;
        Ok(layout)
    }

    /// Every stage, start to finish.
    pub fn create(&self, config: &ConfigurationSet) -> Result<(Generated, PackageLayout), Error> {
        let generated = self.build(config)?;
        let layout = self.package()?;
        Ok((generated, layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::MesonBackend;
    use crate::core::backend::tests::FakeBackend;
    use crate::core::error::{GenerationError, PackageError};
    use crate::core::requirements::{Condition, MESON};
    use std::fs;
    use tempfile::TempDir;

    const MESON_ONLY: &[Requirement] = &[Requirement {
        condition: Condition::Always,
        tool: MESON,
    }];

    const MISSING_TOOL: &[Requirement] = &[Requirement {
        condition: Condition::Always,
        tool: Tool {
            name: "definitely_not_a_real_command_12345",
            version: "0.0.0",
        },
    }];

    fn paths(tmp: &TempDir) -> Paths {
        let source = tmp.path().join("src");
        let build = tmp.path().join("src/build");
        fs::create_dir_all(&build).unwrap();
        Paths {
            source,
            package: tmp.path().join("package"),
            build,
        }
    }

    fn fake_kernel(paths: &Paths) {
        fs::write(paths.build.join("kernel.elf"), b"\x7fELF").unwrap();
        fs::write(paths.build.join("kernel.bin"), b"raw").unwrap();
    }

    #[test]
    fn configuration_layers_in_order() {
        let config = configuration(
            vec![
                ("max_cpus".to_string(), "16".to_string()),
                ("kernel_debug".to_string(), "false".to_string()),
            ],
            &["max_cpus=2".to_string()],
        )
        .unwrap();
        assert_eq!(config.text("max_cpus").as_deref(), Some("2"));
        assert!(!config.flag("kernel_debug"));
    }

    #[test]
    fn defaults_run_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        fake_kernel(&paths);
        let backend = MesonBackend::new(&paths.source, &paths.build).with_program("true");
        let pipeline = Pipeline::new(backend, paths.clone());

        let config = configuration(Vec::new(), &[]).unwrap();
        let generated = pipeline.generate(&config).unwrap();
        assert_eq!(generated.descriptor.max_cpus, "8");
        let cross = fs::read_to_string(&generated.files.cross_file).unwrap();
        assert!(cross.contains("[host_machine]\nsystem = 'none'\ncpu_family = 'x86_64'\n"));

        let layout = pipeline.package().unwrap();
        assert!(paths.package.join("boot/kernel.elf").is_file());
        assert!(paths.package.join("boot/kernel.bin").is_file());
        assert_eq!(layout.bindir, PathBuf::from("boot"));
    }

    #[cfg(unix)]
    #[test]
    fn create_runs_every_stage() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        fake_kernel(&paths);
        let backend = MesonBackend::new(&paths.source, &paths.build).with_program("true");
        let pipeline = Pipeline::new(backend, paths.clone()).with_requirements(MESON_ONLY);

        let config = configuration(Vec::new(), &[]).unwrap();
        let (generated, layout) = pipeline.create(&config).unwrap();
        assert!(generated.files.native_file.is_file());
        assert_eq!(layout.include_path(), paths.package.join("include"));
    }

    #[test]
    fn invalid_arch_stops_before_generation() {
        let tmp = TempDir::new().unwrap();
        let pipeline = Pipeline::new(FakeBackend::default(), paths(&tmp));
        let config = configuration(Vec::new(), &["arch=arm64".to_string()]).unwrap();

        let err = pipeline.build(&config).unwrap_err();
        match err {
            Error::Configuration(ConfigurationError::InvalidConfiguration {
                option, allowed, ..
            }) => {
                assert_eq!(option, "arch");
                assert_eq!(allowed, vec!["x86_64".to_string()]);
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
        assert!(pipeline.driver().backend().calls.borrow().is_empty());
    }

    #[test]
    fn failed_build_writes_no_package() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        fake_kernel(&paths);
        let backend = FakeBackend {
            fail_build: true,
            ..Default::default()
        };
        let pipeline = Pipeline::new(backend, paths.clone());

        let config = configuration(Vec::new(), &[]).unwrap();
        let err = pipeline.create(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::StepFailed { step: "build", .. })
        ));
        assert_eq!(
            *pipeline.driver().backend().calls.borrow(),
            vec!["emit", "configure", "build"]
        );
        assert!(!paths.package.exists());
    }

    #[test]
    fn missing_kernel_after_build_fails_packaging() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        let pipeline = Pipeline::new(FakeBackend::default(), paths);

        let config = configuration(Vec::new(), &[]).unwrap();
        let err = pipeline.create(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Package(PackageError::MissingArtifact { .. })
        ));
    }

    #[test]
    fn missing_tool_stops_before_configure() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        fake_kernel(&paths);
        let backend = FakeBackend {
            missing: vec!["ninja"],
            ..Default::default()
        };
        let pipeline = Pipeline::new(backend, paths.clone());

        let config = configuration(Vec::new(), &[]).unwrap();
        match pipeline.create(&config).unwrap_err() {
            Error::Build(BuildError::ToolMissing { tool, version }) => {
                assert_eq!(tool, "ninja");
                assert_eq!(version, "1.11.1");
            }
            other => panic!("expected ToolMissing, got {other:?}"),
        }
        assert_eq!(*pipeline.driver().backend().calls.borrow(), vec!["emit"]);
        assert!(!paths.package.exists());
    }

    #[test]
    fn tool_absent_from_path_is_tool_missing() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        let backend = MesonBackend::new(&paths.source, &paths.build).with_program("true");
        let pipeline = Pipeline::new(backend, paths).with_requirements(MISSING_TOOL);

        let config = configuration(Vec::new(), &[]).unwrap();
        let err = pipeline.build(&config).unwrap_err();
        assert!(matches!(
            err,
            Error::Build(BuildError::ToolMissing { ref tool, .. })
                if tool == "definitely_not_a_real_command_12345"
        ));
    }

    #[test]
    fn default_table_checks_meson_and_ninja() {
        let tmp = TempDir::new().unwrap();
        let pipeline = Pipeline::new(FakeBackend::default(), paths(&tmp));
        let config = configuration(Vec::new(), &[]).unwrap();

        let found = pipeline.check_tools(&config).unwrap();
        let names: Vec<_> = found.iter().map(|(tool, _)| tool.name).collect();
        assert_eq!(names, vec!["meson", "ninja"]);
    }

    #[test]
    fn descriptor_write_failure_stops_before_build() {
        let tmp = TempDir::new().unwrap();
        let paths = paths(&tmp);
        fake_kernel(&paths);
        let backend = FakeBackend {
            fail_emit: true,
            ..Default::default()
        };
        let pipeline = Pipeline::new(backend, paths.clone());

        let config = configuration(Vec::new(), &[]).unwrap();
        let err = pipeline.create(&config).unwrap_err();
        assert!(matches!(err, Error::Generation(GenerationError::Io { .. })));
        assert_eq!(*pipeline.driver().backend().calls.borrow(), vec!["emit"]);
        assert!(!paths.package.exists());
    }
}
