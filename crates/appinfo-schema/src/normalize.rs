use crate::capability::{Capability, CapabilityError};
use crate::manifest::{entry_type, AppInfo, ManifestError, ResourceType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("capability error: {0}")]
    Capability(#[from] CapabilityError),
}

/// What a [`normalize`] call observed and changed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizeOutcome {
    /// The resolved capability flag.
    pub supported: bool,
    /// Number of media entries retyped from `bitmap` to `png`.
    pub retyped: usize,
}

/// Retype `bitmap` media to `png` when the build lacks native bitmap resources.
///
/// With the capability present the manifest is not touched (or even looked
/// at). Otherwise every entry of `resources.media` is validated first and
/// only then rewritten, so a shape error leaves the manifest unchanged.
pub fn normalize(
    capability: &Capability<'_>,
    manifest: &mut AppInfo,
) -> Result<NormalizeOutcome, NormalizeError> {
    let supported = capability.resolve()?;
    if supported {
        return Ok(NormalizeOutcome {
            supported,
            retyped: 0,
        });
    }

    let bitmaps = bitmap_indices(manifest)?;
    let media_path = manifest.media_path();
    let media = manifest.media_mut()?;
    for &index in &bitmaps {
        if let Some(Value::Object(fields)) = media.get_mut(index) {
            fields.insert(
                "type".to_owned(),
                Value::String(ResourceType::Png.as_str().to_owned()),
            );
            let name = fields
                .get("name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("");
            debug!(
                media = %media_path,
                index,
                name,
                "retyped bitmap resource to png"
            );
        }
    }

    if !bitmaps.is_empty() {
        info!(
            retyped = bitmaps.len(),
            "bitmap resources are not supported by this build, using png"
        );
    }

    Ok(NormalizeOutcome {
        supported,
        retyped: bitmaps.len(),
    })
}

/// Number of entries [`normalize`] would retype if the capability were missing.
pub fn would_retype(manifest: &AppInfo) -> Result<usize, ManifestError> {
    Ok(bitmap_indices(manifest)?.len())
}

fn bitmap_indices(manifest: &AppInfo) -> Result<Vec<usize>, ManifestError> {
    let media_path = manifest.media_path();
    let mut indices = Vec::new();
    for (index, entry) in manifest.media()?.iter().enumerate() {
        if entry_type(entry, &media_path, index)? == ResourceType::Bitmap.as_str() {
            indices.push(index);
        }
    }
    Ok(indices)
}
