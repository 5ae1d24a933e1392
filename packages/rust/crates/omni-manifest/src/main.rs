//! omni-manifest CLI: generate, inspect or describe the module manifest.
//!
//! Intended to run from a package-manager hook after dependencies are
//! installed:
//!
//! ```text
//! omni-manifest generate                  # ./vendor/modules.manifest
//! omni-manifest generate --output build/modules.manifest
//! omni-manifest show --category svc
//! ```
//!
//! Logging: set `RUST_LOG=omni_manifest=debug` to see every discovered
//! module on stderr.

mod cli;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use omni_manifest::{
    DEFAULT_SETTINGS_FILE, GeneratorConfig, ManifestGenerator, ManifestSettings, artifact_schema,
    load_manifest, load_settings, project_root,
};

use crate::cli::{Cli, Command, GenerateArgs};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing: RUST_LOG overrides; --verbose => debug; else info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "omni_manifest=debug"
        } else {
            "omni_manifest=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Show {
            artifact,
            category,
            root,
        } => run_show(artifact, category.as_deref(), root),
        Command::Schema => {
            println!("{}", artifact_schema());
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = resolve_config(args)?;
    let generator = ManifestGenerator::new(config);
    let report = generator
        .dump_to_file()
        .context("manifest generation failed; previous artifact left in place")?;

    println!(
        "Wrote {} modules in {} categories to {}",
        report.modules,
        report.categories,
        report.output_path.display()
    );
    Ok(())
}

fn resolve_config(args: GenerateArgs) -> anyhow::Result<GeneratorConfig> {
    let root = args.root.unwrap_or_else(project_root);

    let settings_path = match args.config {
        Some(path) => {
            if !path.is_file() {
                bail!("settings file not found: {}", path.display());
            }
            path
        }
        None => root.join(DEFAULT_SETTINGS_FILE),
    };
    let file_settings = load_settings(&settings_path)?;

    let flag_settings = ManifestSettings {
        extension: args.extension,
        excluded_dirs: None,
        output: args.output,
        chunk_width: args.chunk_width,
        parallel: args.sequential.then_some(false),
        follow_links: args.follow_links.then_some(true),
    };

    let mut config = file_settings
        .merge(flag_settings)
        .apply(GeneratorConfig::for_root(root));
    for name in args.exclude {
        if !config.is_excluded_dir(&name) {
            config.excluded_dirs.push(name);
        }
    }

    tracing::debug!(?config, "resolved generator config");
    Ok(config)
}

fn run_show(
    artifact: Option<PathBuf>,
    category: Option<&str>,
    root: Option<PathBuf>,
) -> anyhow::Result<()> {
    let path = artifact.unwrap_or_else(|| {
        GeneratorConfig::for_root(root.unwrap_or_else(project_root)).resolved_output_path()
    });
    let manifest = load_manifest(&path)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;

    if let Some(category) = category {
        match manifest.get(category) {
            Some(modules) => {
                for module in modules {
                    println!("{}", module.qualified_name());
                }
            }
            None => eprintln!("No modules in category '{category}'"),
        }
        return Ok(());
    }

    for (name, modules) in manifest.iter() {
        println!("{name} ({})", modules.len());
        for module in modules {
            let declared = module
                .categories
                .iter()
                .filter(|c| c.name == name)
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            println!("  {}  {declared}", module.qualified_name());
        }
    }
    Ok(())
}
