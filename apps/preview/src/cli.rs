//! # CLI Argument Definitions

use clap::{ArgAction, Parser, Subcommand};
use impulse::domain::theme::ThemeContext;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "impulse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Preview themes and layouts from JSON documents")]
pub struct Cli {
    /// Configuration file (defaults to `impulse.{toml,json,yaml}` when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory of theme documents, overrides `theme.source_dir`
    #[arg(long, global = true)]
    pub themes: Option<PathBuf>,

    /// Directory of layout documents, overrides `layout.source_dir`
    #[arg(long, global = true)]
    pub layouts: Option<PathBuf>,

    /// Never write the core layouts into the layout directory
    #[arg(long, global = true)]
    pub no_seed: bool,

    /// More log output (`-v` debug, `-vv` trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the CSS custom properties of a theme
    Css {
        /// Theme id; the default theme when omitted
        #[arg(short, long)]
        theme: Option<String>,
        /// Selector of the emitted rule
        #[arg(long, default_value = ":root")]
        selector: String,
        /// Token override as `category.path=value`, e.g. `colors.primary=#FF0000`
        #[arg(long = "set", value_name = "TOKEN=VALUE", value_parser = parse_override)]
        overrides: Vec<(String, String)>,
    },
    /// Print the resolved styles of a component
    Styles {
        component: String,
        /// `site`, `admin` or `shared`; the configured context when omitted
        #[arg(long)]
        context: Option<ThemeContext>,
        #[arg(short, long)]
        theme: Option<String>,
    },
    /// Render a layout to HTML
    Render {
        layout: String,
        /// Granted permission, repeatable; `*` grants everything
        #[arg(short, long = "grant", value_name = "PERMISSION")]
        grants: Vec<String>,
        /// Keep denied nodes and show component types
        #[arg(long)]
        edit: bool,
        /// Drop unknown components instead of rendering a placeholder
        #[arg(long)]
        strict: bool,
        /// Wrap the output in a standalone HTML page with the theme's variables
        #[arg(long)]
        document: bool,
    },
    /// Check every theme and layout document
    Validate,
}

fn parse_override(raw: &str) -> Result<(String, String), String> {
    let (path, value) = raw.split_once('=').ok_or_else(|| format!("expected TOKEN=VALUE, got '{raw}'"))?;
    let path = path.trim();
    if !path.contains('.') {
        return Err(format!("'{path}' must name a category and a token, e.g. colors.primary"));
    }
    Ok((path.to_owned(), value.trim().to_owned()))
}
