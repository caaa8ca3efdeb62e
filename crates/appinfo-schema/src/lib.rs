//! Resource manifest model and bitmap resource normalization.
//!
//! This crate defines the schema layer: the JSON resource manifest
//! (`AppInfo`, in either the legacy `appinfo.json` or the `package.json`
//! layout), the capability model answering "does this build support native
//! bitmap resources" (`Capability`, `BitmapSupport`), the target platform
//! table (`Platform`, `SdkVersion`), and the normalizer that retypes
//! `bitmap` media to `png` when the capability is missing (`normalize`).

pub mod capability;
pub mod config;
pub mod manifest;
pub mod normalize;
pub mod platform;

pub use capability::{
    BitmapSupport, Capability, CapabilityError, SdkTarget, ASSUME_BITMAP_SUPPORTED,
};
pub use config::{CapabilityProvider, CompatConfig, ConfigError};
pub use manifest::{
    parse_manifest_file, parse_manifest_str, AppInfo, Layout, ManifestError, MediaResource,
    ResourceType,
};
pub use normalize::{normalize, would_retype, NormalizeError, NormalizeOutcome};
pub use platform::{Platform, SdkVersion, ALL_PLATFORMS};
