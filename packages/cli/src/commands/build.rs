use crate::config::{load_tokens, Config};
use crate::definitions::load_definitions;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use makestyles_runtime::{MakeStyles, StylesSnapshot};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Definitions file (JSON array of { matchers, style })
    pub definitions: PathBuf,

    /// Token file (overrides config)
    #[arg(short, long)]
    pub tokens: Option<PathBuf>,

    /// Output file (prints to stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Resolve a definitions file into a snapshot
pub fn build_snapshot(args: &BuildArgs, cwd: &str) -> Result<StylesSnapshot> {
    let config = Config::load(cwd)?;
    let list = load_definitions(&args.definitions)?;
    let tokens = load_tokens(config.tokens_path(cwd, args.tokens.as_deref()).as_deref())?;

    let styles = MakeStyles::with_environment(list, config.environment())?;
    Ok(styles.snapshot(&tokens))
}

pub fn build(args: BuildArgs, cwd: &str) -> Result<()> {
    let snapshot = build_snapshot(&args, cwd)?;
    let json = snapshot.to_json()?;

    match &args.output {
        Some(output) => {
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(output, &json)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            println!(
                "{} {} → {} ({} definitions, {} conditions)",
                "✓".green(),
                args.definitions.display(),
                output.display(),
                snapshot.definitions.len(),
                snapshot.mapping.len()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
