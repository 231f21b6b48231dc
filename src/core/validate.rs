//! Validation module - Rejects configurations outside the declared domains

use crate::core::error::ConfigurationError;
use crate::core::options::{ConfigurationSet, OptionDomain, OptionValue, declared_options};

/// Check every option value against its declared domain.
///
/// Enumerated options must hold one of their allowed values, boolean options a
/// boolean. Free-form options (`max_cpus`) are accepted as any string.
pub fn validate(config: &ConfigurationSet) -> Result<(), ConfigurationError> {
    for option in declared_options() {
        let Some(value) = config.get(option.name) else {
            continue;
        };

        let valid = match (option.domain, value) {
            (OptionDomain::Enumerated(allowed), OptionValue::Text(text)) => {
                allowed.contains(&text.as_str())
            }
            (OptionDomain::Boolean, OptionValue::Bool(_)) => true,
            (OptionDomain::FreeForm, OptionValue::Text(_)) => true,
            _ => false,
        };

        if !valid {
            return Err(ConfigurationError::InvalidConfiguration {
                option: option.name.to_string(),
                value: value.to_string(),
                allowed: option.domain.allowed().unwrap_or_default(),
            });
        }
    }

    log::debug!("configuration validated");
    Ok(())
}
