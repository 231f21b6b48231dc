//! Configuration module - Build layout and constants

/// Package metadata defaults
pub mod package {
    pub const NAME: &str = "microkernel";
    pub const VERSION: &str = "0.1.0";
    pub const LICENSE: &str = "MIT";
    pub const AUTHOR: &str = "MicroKernel Team";
    pub const URL: &str = "https://github.com/microkernel/microkernel";
    pub const DESCRIPTION: &str = "A minimal x86_64 microkernel implementation";
    pub const TOPICS: &[&str] = &["kernel", "os", "x86_64", "microkernel"];
}

/// Project file names
pub mod project {
    /// Marks the kernel source root
    pub const BUILD_DEFINITION: &str = "meson.build";

    /// Optional project file with metadata and option overrides
    pub const PROJECT_FILE: &str = "crucible.toml";

    /// Default build directory (relative to source root)
    pub const BUILD_DIR: &str = "build";

    /// Default package directory (relative to source root)
    pub const PACKAGE_DIR: &str = "package";
}

/// Generated descriptor files
pub mod generated {
    /// Generator output directory (relative to the build directory)
    pub const GENERATORS_DIR: &str = "generators";

    /// Native file carrying the project options
    pub const NATIVE_FILE: &str = "conan_meson_native.ini";

    /// Cross file name for a cpu family
    pub fn cross_file_name(cpu_family: &str) -> String {
        format!("cross_{cpu_family}.ini")
    }
}

/// Package layout
pub mod package_paths {
    /// Licenses directory
    pub const LICENSES: &str = "licenses";

    /// Binaries directory (kernel images)
    pub const BOOT: &str = "boot";

    /// Public headers directory
    pub const INCLUDE: &str = "include";

    /// Internal kernel headers directory
    pub const KERNEL_INCLUDE: &str = "include/kernel";

    /// Package manifest
    pub const MANIFEST: &str = "manifest.toml";
}

/// Artifact names
pub mod artifacts {
    pub const LICENSE: &str = "LICENSE";
    pub const KERNEL_ELF: &str = "kernel.elf";
    pub const KERNEL_BIN: &str = "kernel.bin";
    pub const HEADERS: &str = "*.h";
}
