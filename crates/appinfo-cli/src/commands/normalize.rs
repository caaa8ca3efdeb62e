use super::{json_pretty, manifest_platforms, EXIT_SUCCESS};
use appinfo_schema::{
    normalize, parse_manifest_file, would_retype, CompatConfig, NormalizeOutcome, Platform,
};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

#[allow(clippy::struct_excessive_bools)]
pub struct NormalizeOptions<'a> {
    pub manifest_path: &'a Path,
    pub platforms: &'a [Platform],
    pub sdk_version: Option<&'a str>,
    pub no_bitmap_support: bool,
    pub dry_run: bool,
    pub check: bool,
}

fn write_atomic(dest: &Path, content: &str) -> Result<(), String> {
    // Rewrite the file a symlink points at, not the link itself.
    let target = std::fs::canonicalize(dest).unwrap_or_else(|_| dest.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| format!("write temp file: {e}"))?;
    use std::io::Write;
    tmp.write_all(content.as_bytes())
        .map_err(|e| format!("write temp file: {e}"))?;
    if let Ok(existing) = std::fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| format!("set manifest permissions: {e}"))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| format!("fsync temp file: {e}"))?;
    tmp.persist(&target)
        .map_err(|e| format!("persist manifest: {}", e.error))?;
    Ok(())
}

fn with_overrides(mut config: CompatConfig, opts: &NormalizeOptions<'_>) -> CompatConfig {
    if let Some(version) = opts.sdk_version {
        config.set_sdk_version(version);
    }
    if !opts.platforms.is_empty() {
        config.platforms = opts.platforms.to_vec();
    }
    if opts.no_bitmap_support {
        config.supports_bitmap = Some(false);
    }
    config
}

pub fn run(config: CompatConfig, opts: &NormalizeOptions<'_>, json: bool) -> Result<u8, String> {
    let mut manifest = parse_manifest_file(opts.manifest_path)
        .map_err(|e| format!("failed to parse manifest: {e}"))?;

    let config = with_overrides(config, opts);
    let listed = manifest_platforms(&manifest);
    let provider = config.capability_provider(listed.as_deref());
    debug!(?provider, "capability provider selected");
    let capability = provider.capability();

    if opts.check {
        let supported = capability
            .resolve()
            .map_err(|e| format!("capability error: {e}"))?;
        let pending = if supported {
            0
        } else {
            would_retype(&manifest).map_err(|e| format!("manifest error: {e}"))?
        };
        if pending > 0 {
            return Err(format!(
                "{pending} bitmap resource(s) in {} must be retyped to png (run 'appinfo normalize')",
                opts.manifest_path.display()
            ));
        }
        if json {
            let payload = serde_json::json!({
                "status": "ok",
                "manifest": opts.manifest_path,
                "supported": supported,
            });
            println!("{}", json_pretty(&payload)?);
        }
        return Ok(EXIT_SUCCESS);
    }

    let outcome: NormalizeOutcome =
        normalize(&capability, &mut manifest).map_err(|e| e.to_string())?;

    let written = outcome.retyped > 0 && !opts.dry_run;
    if written {
        let content = manifest
            .to_json_pretty()
            .map_err(|e| format!("manifest error: {e}"))?;
        write_atomic(opts.manifest_path, &content)?;
    }

    if json {
        let payload = serde_json::json!({
            "manifest": opts.manifest_path,
            "layout": manifest.layout(),
            "source": capability.source_name(),
            "supported": outcome.supported,
            "retyped": outcome.retyped,
            "written": written,
        });
        println!("{}", json_pretty(&payload)?);
    } else if outcome.supported {
        println!(
            "bitmap resources supported, {} unchanged",
            opts.manifest_path.display()
        );
    } else if outcome.retyped == 0 {
        println!("no bitmap resources in {}", opts.manifest_path.display());
    } else if opts.dry_run {
        println!(
            "would retype {} bitmap resource(s) to png in {}",
            outcome.retyped,
            opts.manifest_path.display()
        );
    } else {
        println!(
            "retyped {} bitmap resource(s) to png in {}",
            outcome.retyped,
            opts.manifest_path.display()
        );
    }

    Ok(EXIT_SUCCESS)
}
