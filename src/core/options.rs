//! Options module - Declared build options and the configuration built from them
//!
//! The option table is the external configuration contract of the kernel
//! build: renaming or re-typing an entry breaks every caller.

use std::collections::BTreeMap;
use std::fmt;

use crate::core::error::ConfigurationError;

/// Option names
pub mod names {
    pub const ARCH: &str = "arch";
    pub const KERNEL_DEBUG: &str = "kernel_debug";
    pub const SERIAL_DEBUG: &str = "serial_debug";
    pub const ENABLE_TESTS: &str = "enable_tests";
    pub const ENABLE_USERSPACE: &str = "enable_userspace";
    pub const MAX_CPUS: &str = "max_cpus";
}

/// Values an option may take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDomain {
    /// A closed set of allowed strings
    Enumerated(&'static [&'static str]),
    /// `true` or `false`
    Boolean,
    /// Any string; checked for type only
    FreeForm,
}

impl OptionDomain {
    /// Allowed values, or `None` for free-form domains.
    pub fn allowed(&self) -> Option<Vec<String>> {
        match self {
            Self::Enumerated(values) => Some(values.iter().map(|v| v.to_string()).collect()),
            Self::Boolean => Some(vec!["true".to_string(), "false".to_string()]),
            Self::FreeForm => None,
        }
    }

    /// Parse a raw textual value into this domain's representation.
    ///
    /// Only the primitive type is checked here; membership of enumerated
    /// domains is the validator's job.
    pub fn parse(&self, option: &str, raw: &str) -> Result<OptionValue, ConfigurationError> {
        match self {
            Self::Boolean => parse_bool(raw)
                .map(OptionValue::Bool)
                .ok_or_else(|| ConfigurationError::InvalidValue {
                    option: option.to_string(),
                    value: raw.to_string(),
                    expected: "boolean",
                }),
            Self::Enumerated(_) | Self::FreeForm => Ok(OptionValue::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for OptionDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enumerated(values) => write!(f, "{{{}}}", values.join(", ")),
            Self::Boolean => f.write_str("{true, false}"),
            Self::FreeForm => f.write_str("ANY"),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// A concrete option value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Text(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// A recognized configuration knob
#[derive(Debug, Clone, Copy)]
pub struct ConfigurationOption {
    pub name: &'static str,
    pub domain: OptionDomain,
    pub default: &'static str,
    pub help: &'static str,
}

const DECLARED_OPTIONS: &[ConfigurationOption] = &[
    ConfigurationOption {
        name: names::ARCH,
        domain: OptionDomain::Enumerated(&["x86_64"]),
        default: "x86_64",
        help: "Target architecture",
    },
    ConfigurationOption {
        name: names::KERNEL_DEBUG,
        domain: OptionDomain::Boolean,
        default: "true",
        help: "Kernel debug checks and symbols",
    },
    ConfigurationOption {
        name: names::SERIAL_DEBUG,
        domain: OptionDomain::Boolean,
        default: "true",
        help: "Debug output on the serial port",
    },
    ConfigurationOption {
        name: names::ENABLE_TESTS,
        domain: OptionDomain::Boolean,
        default: "false",
        help: "Build the in-kernel test suite",
    },
    ConfigurationOption {
        name: names::ENABLE_USERSPACE,
        domain: OptionDomain::Boolean,
        default: "false",
        help: "Build userspace programs",
    },
    ConfigurationOption {
        name: names::MAX_CPUS,
        domain: OptionDomain::FreeForm,
        default: "8",
        help: "Maximum number of CPUs supported",
    },
];

/// All recognized options, in declaration order.
pub fn declared_options() -> &'static [ConfigurationOption] {
    DECLARED_OPTIONS
}

/// Look up a declared option by name.
pub fn find_option(name: &str) -> Option<&'static ConfigurationOption> {
    DECLARED_OPTIONS.iter().find(|option| option.name == name)
}

/// The default configuration.
pub fn defaults() -> ConfigurationSet {
    let values = DECLARED_OPTIONS
        .iter()
        .map(|option| {
            let value = match option.domain {
                OptionDomain::Boolean => OptionValue::Bool(option.default == "true"),
                OptionDomain::Enumerated(_) | OptionDomain::FreeForm => {
                    OptionValue::Text(option.default.to_string())
                }
            };
            (option.name.to_string(), value)
        })
        .collect();

    ConfigurationSet { values }
}

/// Option values for one build invocation
///
/// Built once by overlaying user values on the defaults; there is no way to
/// mutate it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationSet {
    values: BTreeMap<String, OptionValue>,
}

impl ConfigurationSet {
    /// Overlay `overrides` on the defaults.
    ///
    /// Later entries win over earlier ones. Unknown names and values of the
    /// wrong primitive type are rejected.
    pub fn from_overrides<I, K, V>(overrides: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut set = defaults();

        for (name, raw) in overrides {
            let name = name.as_ref();
            let option = find_option(name).ok_or_else(|| ConfigurationError::UnknownOption {
                name: name.to_string(),
            })?;
            let value = option.domain.parse(name, raw.as_ref())?;
            log::debug!("option override: {name} = {value}");
            set.values.insert(name.to_string(), value);
        }

        Ok(set)
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Boolean option value; `false` if absent or not boolean.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(OptionValue::Bool(true)))
    }

    /// Textual representation of an option value.
    pub fn text(&self, name: &str) -> Option<String> {
        self.values.get(name).map(ToString::to_string)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Split a `key=value` assignment as given on the command line.
pub fn parse_assignment(raw: &str) -> Result<(String, String), ConfigurationError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigurationError::MalformedAssignment {
            raw: raw.to_string(),
        }),
    }
}
