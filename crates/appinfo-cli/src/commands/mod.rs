pub mod completions;
pub mod inspect;
pub mod man_pages;
pub mod normalize;

use appinfo_schema::{AppInfo, Platform};
use tracing::warn;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_CAPABILITY_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn colorize_type(ty: &str) -> String {
    use console::Style;
    match ty {
        "bitmap" => Style::new().yellow().bold().apply_to(ty).to_string(),
        "png" | "png-trans" => Style::new().green().apply_to(ty).to_string(),
        "pbi" | "pbi8" => Style::new().cyan().apply_to(ty).to_string(),
        "font" => Style::new().blue().apply_to(ty).to_string(),
        "raw" => Style::new().dim().apply_to(ty).to_string(),
        other => other.to_owned(),
    }
}

/// The manifest's `targetPlatforms`, parsed. Unknown names are skipped.
pub fn manifest_platforms(manifest: &AppInfo) -> Option<Vec<Platform>> {
    let names = manifest.target_platforms()?;
    let platforms = names
        .iter()
        .filter_map(|name| match name.parse::<Platform>() {
            Ok(platform) => Some(platform),
            Err(e) => {
                warn!("ignoring target platform: {e}");
                None
            }
        })
        .collect();
    Some(platforms)
}
