mod commands;
mod config;
mod definitions;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{build, init, render, BuildArgs, InitArgs, RenderArgs};
use tracing_subscriber::EnvFilter;

/// makestyles CLI - atomic CSS from conditional style definitions
#[derive(Parser, Debug)]
#[command(name = "makestyles")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log cache and injection activity
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a config file with example definitions and tokens
    Init(InitArgs),

    /// Run one query and print the class names and stylesheet
    Render(RenderArgs),

    /// Resolve definitions into a prebuilt snapshot
    Build(BuildArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Render(args) => render(args, &cwd),
        Command::Build(args) => build(args, &cwd),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
