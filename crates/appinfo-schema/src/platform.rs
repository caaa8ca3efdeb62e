//! Target platforms and SDK versions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Watch hardware platforms an app can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Aplite,
    Basalt,
    Chalk,
    Diorite,
    Emery,
    Flint,
}

pub const ALL_PLATFORMS: &[Platform] = &[
    Platform::Aplite,
    Platform::Basalt,
    Platform::Chalk,
    Platform::Diorite,
    Platform::Emery,
    Platform::Flint,
];

/// First SDK major version whose aplite toolchain accepts `bitmap` resources.
const APLITE_NATIVE_BITMAP_MAJOR: u32 = 4;

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aplite => "aplite",
            Self::Basalt => "basalt",
            Self::Chalk => "chalk",
            Self::Diorite => "diorite",
            Self::Emery => "emery",
            Self::Flint => "flint",
        }
    }

    /// Whether `bitmap` media can be packaged for this platform by `sdk`.
    pub fn supports_native_bitmap(self, sdk: SdkVersion) -> bool {
        match self {
            Self::Aplite => sdk.major >= APLITE_NATIVE_BITMAP_MAJOR,
            _ => true,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        ALL_PLATFORMS
            .iter()
            .copied()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| format!("unknown platform '{s}'"))
    }
}

/// `major.minor` SDK version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SdkVersion {
    pub major: u32,
    pub minor: u32,
}

impl SdkVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for SdkVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || format!("invalid SDK version '{s}', expected <major>[.<minor>]");
        let (major_raw, minor_raw) = match trimmed.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (trimmed, None),
        };
        let major = major_raw.parse().map_err(|_| invalid())?;
        let minor = match minor_raw {
            Some(raw) => raw.parse().map_err(|_| invalid())?,
            None => 0,
        };
        Ok(Self { major, minor })
    }
}
