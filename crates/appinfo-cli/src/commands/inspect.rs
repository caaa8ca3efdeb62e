use super::{colorize_type, json_pretty, manifest_platforms, EXIT_SUCCESS};
use appinfo_schema::{parse_manifest_file, CompatConfig, ResourceType};
use std::path::Path;

fn bitmap_status(supported: bool) -> &'static str {
    if supported {
        "supported"
    } else {
        "unsupported, would retype to png"
    }
}

pub fn run(config: &CompatConfig, manifest_path: &Path, json: bool) -> Result<u8, String> {
    let manifest = parse_manifest_file(manifest_path)
        .map_err(|e| format!("failed to parse manifest: {e}"))?;
    let resources = manifest
        .resources()
        .map_err(|e| format!("manifest error: {e}"))?;

    let listed = manifest_platforms(&manifest);
    let provider = config.capability_provider(listed.as_deref());
    let capability = provider.capability();
    let supported = capability
        .resolve()
        .map_err(|e| format!("capability error: {e}"))?;

    let bitmaps = resources
        .iter()
        .filter(|r| r.kind == ResourceType::Bitmap)
        .count();

    if json {
        let payload = serde_json::json!({
            "manifest": manifest_path,
            "layout": manifest.layout(),
            "media_path": manifest.media_path(),
            "source": capability.source_name(),
            "supported": supported,
            "bitmaps": bitmaps,
            "resources": resources,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }

    println!("manifest:  {}", manifest_path.display());
    println!("layout:    {} ({})", manifest.layout(), manifest.media_path());
    println!(
        "bitmaps:   {} ({}, source: {})",
        bitmap_status(supported),
        bitmaps,
        capability.source_name()
    );
    if resources.is_empty() {
        println!("no media resources");
        return Ok(EXIT_SUCCESS);
    }
    println!();
    println!("{:<4} {:<10} {:<28} FILE", "#", "TYPE", "NAME");
    for (i, resource) in resources.iter().enumerate() {
        let ty = resource.kind.as_str();
        // Escape codes would skew `{:<10}`, so pad by hand.
        let pad = " ".repeat(10usize.saturating_sub(ty.len()));
        println!(
            "{:<4} {}{pad} {:<28} {}",
            i,
            colorize_type(ty),
            resource.name.as_deref().unwrap_or("-"),
            resource.file.as_deref().unwrap_or("-"),
        );
    }

    Ok(EXIT_SUCCESS)
}
