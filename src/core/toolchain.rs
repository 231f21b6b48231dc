//! Toolchain module - Backend descriptors derived from the configuration
//!
//! Two artifacts come out of here:
//!
//! - [`ToolchainDescriptor`]: the option passthrough handed to the backend as
//!   project options.
//! - [`CrossCompilationFile`]: the bare-metal cross file. It depends only on the
//!   target architecture, never on the debug/test/userspace flags.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::config::generated;
use crate::core::error::GenerationError;
use crate::core::options::{ConfigurationSet, names};

/// Supported target architectures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    X86_64,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
        }
    }
}

impl FromStr for Architecture {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86_64" => Ok(Self::X86_64),
            other => Err(GenerationError::UnsupportedArchitecture(other.to_string())),
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option passthrough in the backend's native types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainDescriptor {
    pub arch: String,
    pub kernel_debug: bool,
    pub serial_debug: bool,
    pub enable_tests: bool,
    pub enable_userspace: bool,
    pub max_cpus: String,
}

impl ToolchainDescriptor {
    /// Copy the six backend options out of a validated configuration.
    pub fn from_config(config: &ConfigurationSet) -> Self {
        Self {
            arch: config.text(names::ARCH).unwrap_or_default(),
            kernel_debug: config.flag(names::KERNEL_DEBUG),
            serial_debug: config.flag(names::SERIAL_DEBUG),
            enable_tests: config.flag(names::ENABLE_TESTS),
            enable_userspace: config.flag(names::ENABLE_USERSPACE),
            max_cpus: config.text(names::MAX_CPUS).unwrap_or_default(),
        }
    }

    /// Render as a backend native file with a `[project options]` section.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# MicroKernel project options\n");
        out.push_str("# Generated by crucible; do not edit.\n\n");
        out.push_str("[project options]\n");
        let _ = writeln!(out, "{} = {}", names::ARCH, quote(&self.arch));
        let _ = writeln!(out, "{} = {}", names::KERNEL_DEBUG, self.kernel_debug);
        let _ = writeln!(out, "{} = {}", names::SERIAL_DEBUG, self.serial_debug);
        let _ = writeln!(out, "{} = {}", names::ENABLE_TESTS, self.enable_tests);
        let _ = writeln!(out, "{} = {}", names::ENABLE_USERSPACE, self.enable_userspace);
        let _ = writeln!(out, "{} = {}", names::MAX_CPUS, quote(&self.max_cpus));
        out
    }
}

/// Tool names of the cross toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binaries {
    pub c: &'static str,
    pub ar: &'static str,
    pub strip: &'static str,
    pub ld: &'static str,
}

/// Target machine description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMachine {
    pub system: &'static str,
    pub cpu_family: &'static str,
    pub cpu: &'static str,
    pub endian: &'static str,
}

/// Cross-compilation descriptor for a freestanding target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossCompilationFile {
    pub binaries: Binaries,
    pub c_args: Vec<&'static str>,
    pub c_link_args: Vec<&'static str>,
    pub host_machine: HostMachine,
}

const X86_64_C_ARGS: &[&str] = &[
    "-ffreestanding",
    "-nostdlib",
    "-nostdinc",
    "-fno-builtin",
    "-fno-stack-protector",
    "-mno-red-zone",
    "-mno-mmx",
    "-mno-sse",
    "-mno-sse2",
    "-m64",
    "-mcmodel=kernel",
    "-fno-pic",
];

const X86_64_C_LINK_ARGS: &[&str] = &["-nostdlib", "-static", "-Wl,--build-id=none"];

/// Cross descriptor for `arch`.
///
/// Adding an architecture means adding an arm here.
pub fn cross_descriptor_for(arch: Architecture) -> CrossCompilationFile {
    match arch {
        Architecture::X86_64 => CrossCompilationFile {
            binaries: Binaries {
                c: "gcc",
                ar: "ar",
                strip: "strip",
                ld: "ld",
            },
            c_args: X86_64_C_ARGS.to_vec(),
            c_link_args: X86_64_C_LINK_ARGS.to_vec(),
            host_machine: HostMachine {
                system: "none",
                cpu_family: "x86_64",
                cpu: "x86_64",
                endian: "little",
            },
        },
    }
}

impl CrossCompilationFile {
    /// Serialize in the backend's cross file format.
    ///
    /// Output is byte-for-byte stable for a given descriptor.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("# MicroKernel cross-compilation configuration\n");
        out.push_str("# Generated by crucible; do not edit.\n\n");

        out.push_str("[binaries]\n");
        let _ = writeln!(out, "c = {}", quote(self.binaries.c));
        let _ = writeln!(out, "ar = {}", quote(self.binaries.ar));
        let _ = writeln!(out, "strip = {}", quote(self.binaries.strip));
        let _ = writeln!(out, "ld = {}", quote(self.binaries.ld));
        out.push('\n');

        out.push_str("[built-in options]\n");
        write_list(&mut out, "c_args", &self.c_args);
        out.push('\n');
        write_list(&mut out, "c_link_args", &self.c_link_args);
        out.push('\n');

        out.push_str("[host_machine]\n");
        let _ = writeln!(out, "system = {}", quote(self.host_machine.system));
        let _ = writeln!(out, "cpu_family = {}", quote(self.host_machine.cpu_family));
        let _ = writeln!(out, "cpu = {}", quote(self.host_machine.cpu));
        let _ = writeln!(out, "endian = {}", quote(self.host_machine.endian));
        out
    }
}

fn write_list(out: &mut String, key: &str, items: &[&str]) {
    let _ = writeln!(out, "{key} = [");
    let last = items.len().saturating_sub(1);
    for (i, item) in items.iter().enumerate() {
        let sep = if i == last { "" } else { "," };
        let _ = writeln!(out, "    {}{sep}", quote(item));
    }
    out.push_str("]\n");
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Derive both descriptors from a validated configuration.
///
/// Performs no validation of its own.
pub fn generate(
    config: &ConfigurationSet,
) -> Result<(ToolchainDescriptor, CrossCompilationFile), GenerationError> {
    let descriptor = ToolchainDescriptor::from_config(config);
    let arch: Architecture = descriptor.arch.parse()?;
    Ok((descriptor, cross_descriptor_for(arch)))
}

/// Locations of the files written by [`write_descriptors`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub native_file: PathBuf,
    pub cross_file: PathBuf,
}

/// Write both descriptors under `generators_dir`, replacing earlier versions.
pub fn write_descriptors(
    generators_dir: &Path,
    descriptor: &ToolchainDescriptor,
    cross: &CrossCompilationFile,
) -> Result<GeneratedFiles, GenerationError> {
    fs::create_dir_all(generators_dir).map_err(|source| GenerationError::Io {
        path: generators_dir.to_path_buf(),
        source,
    })?;

    let native_file = generators_dir.join(generated::NATIVE_FILE);
    write(&native_file, &descriptor.render())?;

    let cross_file = generators_dir.join(generated::cross_file_name(&cross.host_machine.cpu_family));
    write(&cross_file, &cross.render())?;

    log::info!(
        "descriptors written: {} {}",
        native_file.display(),
        cross_file.display()
    );

    Ok(GeneratedFiles {
        native_file,
        cross_file,
    })
}

fn write(path: &Path, content: &str) -> Result<(), GenerationError> {
    fs::write(path, content).map_err(|source| GenerationError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXPECTED_CROSS: &str = "\
# MicroKernel cross-compilation configuration
# Generated by crucible; do not edit.

[binaries]
c = 'gcc'
ar = 'ar'
strip = 'strip'
ld = 'ld'

[built-in options]
c_args = [
    '-ffreestanding',
    '-nostdlib',
    '-nostdinc',
    '-fno-builtin',
    '-fno-stack-protector',
    '-mno-red-zone',
    '-mno-mmx',
    '-mno-sse',
    '-mno-sse2',
    '-m64',
    '-mcmodel=kernel',
    '-fno-pic'
]

c_link_args = [
    '-nostdlib',
    '-static',
    '-Wl,--build-id=none'
]

[host_machine]
system = 'none'
cpu_family = 'x86_64'
cpu = 'x86_64'
endian = 'little'
";

    #[test]
    fn cross_file_renders_exactly() {
        let cross = cross_descriptor_for(Architecture::X86_64);
        assert_eq!(cross.render(), EXPECTED_CROSS);
    }

    #[test]
    fn descriptor_copies_defaults() {
        let (descriptor, _) = generate(&crate::core::options::defaults()).unwrap();
        assert_eq!(
            descriptor,
            ToolchainDescriptor {
                arch: "x86_64".to_string(),
                kernel_debug: true,
                serial_debug: true,
                enable_tests: false,
                enable_userspace: false,
                max_cpus: "8".to_string(),
            }
        );
    }

    #[test]
    fn descriptor_follows_overrides() {
        let config = ConfigurationSet::from_overrides([
            ("kernel_debug", "false"),
            ("enable_userspace", "true"),
            ("max_cpus", "32"),
        ])
        .unwrap();
        let (descriptor, _) = generate(&config).unwrap();
        assert!(!descriptor.kernel_debug);
        assert!(descriptor.serial_debug);
        assert!(descriptor.enable_userspace);
        assert_eq!(descriptor.max_cpus, "32");
    }

    #[test]
    fn cross_file_ignores_flags() {
        let baseline = generate(&crate::core::options::defaults()).unwrap().1;
        let config = ConfigurationSet::from_overrides([
            ("kernel_debug", "false"),
            ("serial_debug", "false"),
            ("enable_tests", "true"),
            ("enable_userspace", "true"),
        ])
        .unwrap();
        let (_, cross) = generate(&config).unwrap();
        assert_eq!(cross, baseline);
        assert_eq!(cross.render(), baseline.render());
    }

    #[test]
    fn native_file_quotes_strings_only() {
        let (descriptor, _) = generate(&crate::core::options::defaults()).unwrap();
        let native = descriptor.render();
        assert!(native.contains("[project options]\n"));
        assert!(native.contains("arch = 'x86_64'\n"));
        assert!(native.contains("kernel_debug = true\n"));
        assert!(native.contains("enable_tests = false\n"));
        assert!(native.contains("max_cpus = '8'\n"));
    }

    #[test]
    fn unknown_arch_has_no_cross_descriptor() {
        let config = ConfigurationSet::from_overrides([("arch", "arm64")]).unwrap();
        assert!(matches!(
            generate(&config),
            Err(GenerationError::UnsupportedArchitecture(arch)) if arch == "arm64"
        ));
    }

    #[test]
    fn write_descriptors_overwrites_previous_files() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("generators");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("cross_x86_64.ini"), "stale").unwrap();

        let (descriptor, cross) = generate(&crate::core::options::defaults()).unwrap();
        let files = write_descriptors(&dir, &descriptor, &cross).unwrap();

        assert_eq!(files.cross_file, dir.join("cross_x86_64.ini"));
        assert_eq!(fs::read_to_string(&files.cross_file).unwrap(), EXPECTED_CROSS);
        assert_eq!(
            fs::read_to_string(&files.native_file).unwrap(),
            descriptor.render()
        );
    }

    #[test]
    fn write_failure_is_a_generation_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let (descriptor, cross) = generate(&crate::core::options::defaults()).unwrap();
        let err = write_descriptors(&blocker, &descriptor, &cross).unwrap_err();
        assert!(matches!(err, GenerationError::Io { .. }));
    }
}
