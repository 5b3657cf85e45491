use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const EXAMPLE_DEFINITIONS: &str = r##"[
  {
    "matchers": null,
    "style": {
      "display": "inline-flex",
      "padding": "4px 12px",
      "borderRadius": 4,
      "color": "$color.foreground",
      "&:hover": { "opacity": 0.9 }
    }
  },
  {
    "matchers": { "appearance": "primary" },
    "style": { "background": "$color.brand", "color": "#fff" }
  }
]
"##;

const EXAMPLE_TOKENS: &str = r##"{
  "color": {
    "foreground": "#242424",
    "brand": "#0f6cbd"
  }
}
"##;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory for the example definitions and tokens
    #[arg(short, long, default_value = "styles")]
    pub styles_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing makestyles project...".bright_blue().bold()
    );

    let styles_dir = PathBuf::from(cwd).join(&args.styles_dir);
    if !styles_dir.exists() {
        fs::create_dir_all(&styles_dir)?;
        println!("  {} Created {}/", "✓".green(), args.styles_dir);
    }

    for (name, content) in [("button.json", EXAMPLE_DEFINITIONS), ("tokens.json", EXAMPLE_TOKENS)] {
        let path = styles_dir.join(name);
        if !path.exists() {
            fs::write(&path, content)?;
            println!("  {} Created {}/{}", "✓".green(), args.styles_dir, name);
        }
    }

    let config = Config {
        tokens: Some(format!("{}/tokens.json", args.styles_dir)),
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  {} makestyles render {}/button.json -s appearance=primary",
        "1.".dimmed(),
        args.styles_dir
    );
    println!(
        "  {} makestyles build {}/button.json -o dist/button.snapshot.json",
        "2.".dimmed(),
        args.styles_dir
    );

    Ok(())
}
