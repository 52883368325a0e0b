//! Application settings.
//!
//! Constants plus the few knobs read from the environment (a `.env` file is
//! loaded by the binary before [`Settings::from_env`] is called).

use std::env;

/// AWS CLI executable.
pub const AWS_CLI: &str = "aws";

/// Largest command output accepted from the AWS CLI, in bytes.
pub const MAX_COMMAND_OUTPUT: usize = 5_000_000;

/// Directory for inventory cache files when none is configured.
pub const DEFAULT_CACHE_DIR: &str = ".";

/// Region used when neither the flag nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

pub const ENV_PROFILE: &str = "RANGE_FINDER_AWS_PROFILE";
pub const ENV_REGION: &str = "RANGE_FINDER_REGION";
pub const ENV_CACHE_DIR: &str = "RANGE_FINDER_CACHE_DIR";

/// Settings for inventory discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub aws_profile: Option<String>,
    pub region: String,
    pub cache_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            aws_profile: None,
            region: DEFAULT_REGION.to_string(),
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Settings {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Settings
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Settings::default();
        Settings {
            aws_profile: get(ENV_PROFILE),
            region: get(ENV_REGION).unwrap_or(defaults.region),
            cache_dir: get(ENV_CACHE_DIR).unwrap_or(defaults.cache_dir),
        }
    }

    /// Apply command line overrides on top of the environment.
    pub fn with_overrides(mut self, region: Option<String>, profile: Option<String>) -> Settings {
        if let Some(region) = region {
            self.region = region;
        }
        if profile.is_some() {
            self.aws_profile = profile;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.region, "us-east-1");
    }

    #[test]
    fn test_settings_from_lookup() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_PROFILE, "prod"),
            (ENV_REGION, "eu-west-1"),
            (ENV_CACHE_DIR, " "),
        ]);
        let settings = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.aws_profile.as_deref(), Some("prod"));
        assert_eq!(settings.region, "eu-west-1");
        assert_eq!(settings.cache_dir, DEFAULT_CACHE_DIR);
    }

    #[test]
    fn test_settings_overrides() {
        let settings = Settings::default()
            .with_overrides(Some("ap-south-1".to_string()), None);
        assert_eq!(settings.region, "ap-south-1");
        assert_eq!(settings.aws_profile, None);
    }
}
