use crate::config::{load_tokens, Config};
use crate::definitions::load_definitions;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use makestyles_runtime::{
    create_target, Conditions, Document, MakeStyles, MatcherValue, StyleOptions,
};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Definitions file (JSON array of { matchers, style })
    pub definitions: PathBuf,

    /// Active selector as name=value (repeatable)
    #[arg(short, long = "selector", value_parser = parse_selector)]
    pub selectors: Vec<(String, MatcherValue)>,

    /// Render right-to-left
    #[arg(long)]
    pub rtl: bool,

    /// Token file (overrides config)
    #[arg(short, long)]
    pub tokens: Option<PathBuf>,

    /// Extra class names to merge (repeatable)
    #[arg(short = 'c', long = "class")]
    pub classes: Vec<String>,

    /// Resolve token functions against concrete values
    #[arg(long)]
    pub no_css_variables: bool,

    /// Print only the class names
    #[arg(long)]
    pub classes_only: bool,
}

/// Result of one query against a fresh document
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub class_names: String,
    pub css: String,
}

/// Parse `name=value`; `true`/`false` and integers keep their type
pub fn parse_selector(raw: &str) -> Result<(String, MatcherValue)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Selector must look like name=value, got {:?}", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(anyhow!("Selector {:?} has no name", raw));
    }

    let value = match value.trim() {
        "true" => MatcherValue::Bool(true),
        "false" => MatcherValue::Bool(false),
        text => text
            .parse::<i64>()
            .map(MatcherValue::Int)
            .unwrap_or_else(|_| MatcherValue::Text(text.to_string())),
    };

    Ok((name.to_string(), value))
}

pub fn render_definitions(args: &RenderArgs, cwd: &str) -> Result<RenderOutput> {
    let config = Config::load(cwd)?;
    let mut environment = config.environment();
    if args.no_css_variables {
        environment.css_variables = false;
    }

    let list = load_definitions(&args.definitions)?;
    let tokens = load_tokens(config.tokens_path(cwd, args.tokens.as_deref()).as_deref())?;
    let styles = MakeStyles::with_environment(list, environment)?;
    debug!(bits = styles.bit_table().len(), "Compiled definitions");

    let document = Document::new();
    let options = StyleOptions::new(create_target(&document))
        .rtl(args.rtl || config.rtl)
        .tokens(Rc::new(tokens));
    let selectors: Conditions = args.selectors.iter().cloned().collect();
    let overrides: Vec<&str> = args.classes.iter().map(String::as_str).collect();

    let class_names = styles.query(&selectors, &options, &overrides);

    Ok(RenderOutput {
        class_names,
        css: document.to_css(),
    })
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let output = render_definitions(&args, cwd)?;

    if args.classes_only {
        println!("{}", output.class_names);
        return Ok(());
    }

    println!("{}", "🎨 Rendered definitions".bright_blue().bold());
    println!("{} {}", "class:".dimmed(), output.class_names.green());
    println!();
    println!("{}", output.css);

    Ok(())
}
