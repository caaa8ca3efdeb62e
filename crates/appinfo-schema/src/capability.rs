//! Capability sources answering whether a build supports native bitmap resources.
//!
//! Callers choose the source when they construct a [`Capability`]: either a
//! live [`BitmapSupport`] provider, or [`Capability::AssumeSupported`] when no
//! provider exists. Nothing is looked up dynamically at normalization time.

use crate::platform::{Platform, SdkVersion};
use thiserror::Error;
use tracing::debug;

/// Answer used when no capability query is available: newer SDKs package
/// `bitmap` resources natively on every platform.
pub const ASSUME_BITMAP_SUPPORTED: bool = true;

#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("invalid SDK version: {0}")]
    InvalidSdkVersion(String),
    #[error("capability query failed: {0}")]
    Query(String),
}

/// A build context that can report native bitmap resource support.
pub trait BitmapSupport {
    fn supports_bitmap_resource(&self) -> Result<bool, CapabilityError>;
}

impl BitmapSupport for bool {
    fn supports_bitmap_resource(&self) -> Result<bool, CapabilityError> {
        Ok(*self)
    }
}

impl<T: BitmapSupport + ?Sized> BitmapSupport for Box<T> {
    fn supports_bitmap_resource(&self) -> Result<bool, CapabilityError> {
        (**self).supports_bitmap_resource()
    }
}

/// Where the capability flag comes from.
#[derive(Clone, Copy)]
pub enum Capability<'a> {
    Query(&'a dyn BitmapSupport),
    AssumeSupported,
}

impl<'a> Capability<'a> {
    pub fn query(provider: &'a dyn BitmapSupport) -> Self {
        Self::Query(provider)
    }

    /// Resolve the flag. Provider errors are returned unchanged.
    pub fn resolve(&self) -> Result<bool, CapabilityError> {
        let supported = match self {
            Self::Query(provider) => provider.supports_bitmap_resource()?,
            Self::AssumeSupported => ASSUME_BITMAP_SUPPORTED,
        };
        debug!(
            source = self.source_name(),
            supported, "resolved bitmap resource capability"
        );
        Ok(supported)
    }

    pub fn source_name(&self) -> &'static str {
        match self {
            Self::Query(_) => "query",
            Self::AssumeSupported => "default",
        }
    }
}

impl std::fmt::Debug for Capability<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.source_name())
    }
}

/// A build target described by SDK version and the platforms being built.
///
/// The version string is parsed when queried, so a malformed version surfaces
/// as a capability query error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkTarget {
    pub sdk_version: String,
    pub platforms: Vec<Platform>,
}

impl SdkTarget {
    pub fn new(sdk_version: impl Into<String>, platforms: Vec<Platform>) -> Self {
        Self {
            sdk_version: sdk_version.into(),
            platforms,
        }
    }
}

impl BitmapSupport for SdkTarget {
    fn supports_bitmap_resource(&self) -> Result<bool, CapabilityError> {
        let sdk: SdkVersion = self
            .sdk_version
            .parse()
            .map_err(CapabilityError::InvalidSdkVersion)?;
        let lacking: Vec<Platform> = self
            .platforms
            .iter()
            .copied()
            .filter(|p| !p.supports_native_bitmap(sdk))
            .collect();
        if !lacking.is_empty() {
            debug!(%sdk, ?lacking, "platforms without native bitmap resources");
        }
        Ok(lacking.is_empty())
    }
}
