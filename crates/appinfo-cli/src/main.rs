mod commands;

use appinfo_schema::{CompatConfig, Platform};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CAPABILITY_ERROR, EXIT_FAILURE, EXIT_MANIFEST_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "appinfo",
    version,
    about = "Resource manifest compatibility tool for watch app builds"
)]
struct Cli {
    /// Path to a TOML config file (defaults to $APPINFO_CONFIG or ~/.config/appinfo/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Retype bitmap media resources to png when the build cannot package bitmaps.
    Normalize {
        /// Path to the manifest (package.json or appinfo.json).
        #[arg(default_value = "package.json")]
        manifest: PathBuf,
        /// Platform being built (repeatable). Defaults to the manifest's targetPlatforms.
        #[arg(long = "platform")]
        platforms: Vec<Platform>,
        /// SDK version of the build (e.g. 3.14). Overrides config and APPINFO_SDK_VERSION.
        #[arg(long)]
        sdk_version: Option<String>,
        /// Treat the build as lacking native bitmap resources.
        #[arg(long, default_value_t = false)]
        no_bitmap_support: bool,
        /// Report what would change without writing the manifest.
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Exit non-zero if any resource would be retyped; never writes.
        #[arg(long, default_value_t = false)]
        check: bool,
    },
    /// List media resources and the resolved bitmap capability.
    Inspect {
        /// Path to the manifest (package.json or appinfo.json).
        #[arg(default_value = "package.json")]
        manifest: PathBuf,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("APPINFO_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Normalize {
            manifest,
            platforms,
            sdk_version,
            no_bitmap_support,
            dry_run,
            check,
        } => load_config(cli.config.as_deref()).and_then(|config| {
            commands::normalize::run(
                config,
                &commands::normalize::NormalizeOptions {
                    manifest_path: &manifest,
                    platforms: &platforms,
                    sdk_version: sdk_version.as_deref(),
                    no_bitmap_support,
                    dry_run,
                    check,
                },
                json_output,
            )
        }),
        Commands::Inspect { manifest } => load_config(cli.config.as_deref())
            .and_then(|config| commands::inspect::run(&config, &manifest, json_output)),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:")
                || msg.starts_with("failed to parse manifest")
                || msg.starts_with("failed to read manifest")
            {
                EXIT_MANIFEST_ERROR
            } else if msg.starts_with("capability error:") {
                EXIT_CAPABILITY_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<CompatConfig, String> {
    let config = match path {
        Some(path) => CompatConfig::load(path),
        None => CompatConfig::load_default(),
    }
    .map_err(|e| format!("config error: {e}"))?;
    Ok(config.apply_env())
}
