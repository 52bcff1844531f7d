use std::collections::BTreeMap;

use crate::{ConfigError, Result};

pub const VARCHAR_MAX_LENGTH_KEY: &str = "mssql.varchar_max_length";
pub const DEFAULT_VARCHAR_MAX_LENGTH: u32 = 4000;

/// Tunables a platform reads when rendering declarations.
///
/// Built from the same `key=value` extras the framework hands to every
/// dialect; keys are namespaced by the dialect name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    pub varchar_max_length: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            varchar_max_length: DEFAULT_VARCHAR_MAX_LENGTH,
        }
    }
}

impl PlatformConfig {
    pub fn from_extra(extra: &BTreeMap<String, String>) -> Result<Self> {
        let mut config = Self::default();

        for (key, value) in extra {
            match key.as_str() {
                VARCHAR_MAX_LENGTH_KEY => {
                    config.varchar_max_length = parse_u32(key, value)?;
                }
                _ => {
                    return Err(ConfigError::UnknownKey { key: key.clone() }.into());
                }
            }
        }

        Ok(config)
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32> {
    value.trim().parse::<u32>().map_err(|_| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: "a non-negative integer",
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_extra_yields_defaults() {
        let config = PlatformConfig::from_extra(&BTreeMap::new()).expect("defaults should load");
        assert_eq!(config.varchar_max_length, DEFAULT_VARCHAR_MAX_LENGTH);
    }

    #[test]
    fn varchar_max_length_override_is_parsed() {
        let extra = BTreeMap::from([(VARCHAR_MAX_LENGTH_KEY.to_string(), " 8000 ".to_string())]);
        let config = PlatformConfig::from_extra(&extra).expect("override should load");
        assert_eq!(config.varchar_max_length, 8000);
    }

    #[test]
    fn unknown_and_malformed_keys_are_rejected() {
        let unknown = BTreeMap::from([("mssql.bogus".to_string(), "1".to_string())]);
        assert!(matches!(
            PlatformConfig::from_extra(&unknown),
            Err(Error::Config(ConfigError::UnknownKey { .. }))
        ));

        let malformed = BTreeMap::from([(VARCHAR_MAX_LENGTH_KEY.to_string(), "-1".to_string())]);
        let error = PlatformConfig::from_extra(&malformed).expect_err("negative length must fail");
        assert!(error.to_string().contains("mssql.varchar_max_length"));
    }
}
