//! Requirements module - Declared build-time tools
//!
//! Requirements are a flat table of (condition, dependency) pairs evaluated
//! once against the configuration. New conditional requirements are new rows.

use std::path::PathBuf;

use xshell::{Shell, cmd};

use crate::core::error::BuildError;
use crate::core::options::ConfigurationSet;

/// When a requirement applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Always,
    /// Only when the named boolean option is enabled
    OptionEnabled(&'static str),
}

impl Condition {
    pub fn holds(&self, config: &ConfigurationSet) -> bool {
        match self {
            Self::Always => true,
            Self::OptionEnabled(name) => config.flag(name),
        }
    }
}

/// A named tool pinned to a version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    /// Executable looked up on PATH
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Requirement {
    pub condition: Condition,
    pub tool: Tool,
}

/// Build configuration generator
pub const MESON: Tool = Tool {
    name: "meson",
    version: "1.3.0",
};

/// Build execution backend
pub const NINJA: Tool = Tool {
    name: "ninja",
    version: "1.11.1",
};

/// Build-time requirements of the kernel.
///
/// `enable_tests` currently pulls in nothing: the kernel test suite runs
/// freestanding and needs no extra host tooling.
pub const BUILD_REQUIREMENTS: &[Requirement] = &[
    Requirement {
        condition: Condition::Always,
        tool: MESON,
    },
    Requirement {
        condition: Condition::Always,
        tool: NINJA,
    },
];

/// Tools from `table` whose condition holds for `config`.
pub fn resolve(table: &[Requirement], config: &ConfigurationSet) -> Vec<Tool> {
    table
        .iter()
        .filter(|req| req.condition.holds(config))
        .map(|req| req.tool)
        .collect()
}

/// Result of looking a tool up on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub tool: Tool,
    pub path: PathBuf,
    /// Version reported by `--version`, if it could be read
    pub found_version: Option<String>,
}

impl ToolStatus {
    pub fn version_matches(&self) -> bool {
        self.found_version.as_deref() == Some(self.tool.version)
    }
}

/// Locate `tool` on PATH.
pub fn locate(tool: Tool) -> Result<PathBuf, BuildError> {
    which::which(tool.name).map_err(|_| BuildError::ToolMissing {
        tool: tool.name.to_string(),
        version: tool.version.to_string(),
    })
}

/// Locate `tool` and ask it for its version.
pub fn probe(sh: &Shell, tool: Tool) -> Result<ToolStatus, BuildError> {
    let path = locate(tool)?;
    let found_version = cmd!(sh, "{path} --version")
        .quiet()
        .ignore_stderr()
        .read()
        .ok()
        .and_then(|out| parse_version(&out));

    if found_version.as_deref() != Some(tool.version) {
        log::warn!(
            "{} {} found, {} is pinned",
            tool.name,
            found_version.as_deref().unwrap_or("(unknown version)"),
            tool.version
        );
    }

    Ok(ToolStatus {
        tool,
        path,
        found_version,
    })
}

/// First dotted version number in a `--version` banner.
fn parse_version(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .map(|word| word.trim_start_matches('v'))
        .find(|word| {
            word.contains('.')
                && word
                    .split('.')
                    .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::options::defaults;

    #[test]
    fn build_requirements_are_meson_and_ninja() {
        let tools = resolve(BUILD_REQUIREMENTS, &defaults());
        assert_eq!(tools, vec![MESON, NINJA]);
        assert_eq!(MESON.version, "1.3.0");
        assert_eq!(NINJA.version, "1.11.1");
    }

    #[test]
    fn enabling_tests_adds_nothing_yet() {
        let config = ConfigurationSet::from_overrides([("enable_tests", "true")]).unwrap();
        assert_eq!(resolve(BUILD_REQUIREMENTS, &config), vec![MESON, NINJA]);
    }

    #[test]
    fn conditional_rows_follow_their_option() {
        const QEMU: Tool = Tool {
            name: "qemu-system-x86_64",
            version: "8.2.0",
        };
        let table = [
            Requirement {
                condition: Condition::Always,
                tool: MESON,
            },
            Requirement {
                condition: Condition::OptionEnabled("enable_tests"),
                tool: QEMU,
            },
        ];

        assert_eq!(resolve(&table, &defaults()), vec![MESON]);

        let config = ConfigurationSet::from_overrides([("enable_tests", "true")]).unwrap();
        assert_eq!(resolve(&table, &config), vec![MESON, QEMU]);
    }

    #[test]
    fn missing_tool_is_reported_with_pinned_version() {
        let tool = Tool {
            name: "definitely_not_a_real_command_12345",
            version: "9.9.9",
        };
        match locate(tool) {
            Err(BuildError::ToolMissing { tool, version }) => {
                assert_eq!(tool, "definitely_not_a_real_command_12345");
                assert_eq!(version, "9.9.9");
            }
            other => panic!("expected ToolMissing, got {other:?}"),
        }
    }

    #[test]
    fn parse_version_reads_common_banners() {
        assert_eq!(parse_version("1.3.0\n").as_deref(), Some("1.3.0"));
        assert_eq!(parse_version("1.11.1").as_deref(), Some("1.11.1"));
        assert_eq!(
            parse_version("The Meson build system\nVersion: 1.3.0").as_deref(),
            Some("1.3.0")
        );
        assert_eq!(parse_version("no version here"), None);
    }

    #[test]
    fn version_match_compares_against_pin() {
        let status = ToolStatus {
            tool: NINJA,
            path: PathBuf::from("/usr/bin/ninja"),
            found_version: Some("1.11.1".to_string()),
        };
        assert!(status.version_matches());

        let status = ToolStatus {
            found_version: Some("1.12.0".to_string()),
            ..status
        };
        assert!(!status.version_matches());
    }
}
