use crate::capability::{Capability, SdkTarget};
use crate::platform::{Platform, ALL_PLATFORMS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "APPINFO_CONFIG";
pub const SDK_VERSION_ENV: &str = "APPINFO_SDK_VERSION";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tool configuration, read from TOML.
///
/// ```toml
/// sdk_version = "3.14"
/// platforms = ["aplite", "basalt"]
/// # supports_bitmap = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompatConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub platforms: Vec<Platform>,
    /// Forces the capability answer, bypassing the SDK rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supports_bitmap: Option<bool>,
}

/// Owned capability provider built from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityProvider {
    Fixed(bool),
    Sdk(SdkTarget),
    Default,
}

impl CapabilityProvider {
    pub fn capability(&self) -> Capability<'_> {
        match self {
            Self::Fixed(supported) => Capability::Query(supported),
            Self::Sdk(target) => Capability::Query(target),
            Self::Default => Capability::AssumeSupported,
        }
    }
}

impl CompatConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from `$APPINFO_CONFIG`, else `~/.config/appinfo/config.toml` if it
    /// exists, else defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Overlay `APPINFO_SDK_VERSION` from the process environment.
    #[must_use]
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(version) = lookup(SDK_VERSION_ENV).filter(|v| !v.trim().is_empty()) {
            self.set_sdk_version(version);
        }
        self
    }

    /// Select the SDK rule. A forced `supports_bitmap` from a lower-precedence
    /// source no longer applies.
    pub fn set_sdk_version(&mut self, version: impl Into<String>) {
        self.sdk_version = Some(version.into());
        self.supports_bitmap = None;
    }

    /// Build the capability provider.
    ///
    /// `supports_bitmap` wins over `sdk_version`. The SDK rule is evaluated for
    /// the configured platforms, else `manifest_platforms`, else every known
    /// platform. With neither set, the default source is used.
    pub fn capability_provider(&self, manifest_platforms: Option<&[Platform]>) -> CapabilityProvider {
        if let Some(supported) = self.supports_bitmap {
            return CapabilityProvider::Fixed(supported);
        }
        let Some(version) = &self.sdk_version else {
            return CapabilityProvider::Default;
        };
        let platforms = if !self.platforms.is_empty() {
            self.platforms.clone()
        } else if let Some(listed) = manifest_platforms {
            listed.to_vec()
        } else {
            ALL_PLATFORMS.to_vec()
        };
        CapabilityProvider::Sdk(SdkTarget::new(version.clone(), platforms))
    }
}

fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/appinfo/config.toml"))
}
