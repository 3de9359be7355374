//! # Impulse Preview
//!
//! Command line front end over the [`impulse`] platform: prints theme CSS, component
//! styles and rendered layouts from directories of JSON documents, and validates them.
//!
//! ## Example
//! ```no_run
//! use clap::Parser;
//! use impulse_preview::{Cli, run};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let cli = Cli::parse_from(["impulse", "css", "--theme", "midnight"]);
//!     print!("{}", run(cli).await?);
//!     Ok(())
//! }
//! ```

pub mod cli;
mod commands;

pub use cli::{Cli, Command};
pub use commands::{ValidationReport, css, overrides_to_tokens, render, styles, validate};

use anyhow::{Context, Result, bail};
use impulse::domain::config::AppConfig;
use impulse::features::layout::ResolveFlags;
use impulse::kernel::config::load_config;
use impulse::{Platform, init_logging};
use tracing::debug;

/// Applies command line overrides on top of the loaded configuration.
#[must_use]
pub fn apply_overrides(mut cfg: AppConfig, cli: &Cli) -> AppConfig {
    if let Some(dir) = &cli.themes {
        cfg.theme.source_dir.clone_from(dir);
    }
    if let Some(dir) = &cli.layouts {
        cfg.layout.source_dir.clone_from(dir);
    }
    if cli.no_seed {
        cfg.layout.seed_core_layouts = false;
    }
    match cli.verbose {
        0 => {},
        1 => "debug".clone_into(&mut cfg.logging.level),
        _ => "trace".clone_into(&mut cfg.logging.level),
    }
    cfg.logging.stderr = true;
    cfg
}

/// Loads the configuration, installs logging and executes the command.
///
/// Returns what the command prints on stdout.
///
/// # Errors
/// Configuration, bootstrap and command failures; `validate` fails when any problem is found.
pub async fn run(cli: Cli) -> Result<String> {
    let cfg: AppConfig = load_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;
    let cfg = apply_overrides(cfg, &cli);
    let _logger = init_logging(&cfg.logging, env!("CARGO_PKG_NAME"))?;

    let platform = Platform::builder().config(cfg).build().await.context("Platform bootstrap failed")?;
    debug!(command = ?cli.command, "Running");

    match cli.command {
        Command::Css { theme, selector, overrides } => css(&platform, theme.as_deref(), &selector, &overrides).await,
        Command::Styles { component, context, theme } => styles(&platform, &component, context, theme.as_deref()).await,
        Command::Render { layout, grants, edit, strict, document } => {
            let mut flags = ResolveFlags::empty();
            flags.set(ResolveFlags::EDIT_MODE, edit);
            flags.set(ResolveFlags::NO_PLACEHOLDERS, strict);
            render(&platform, &layout, &grants, flags, document).await
        },
        Command::Validate => {
            let report = validate(&platform).await?;
            if !report.problems.is_empty() {
                bail!(
                    "{} problem(s) in {} documents:\n{}",
                    report.problems.len(),
                    report.checked,
                    report.problems.join("\n")
                );
            }
            Ok(format!("{} documents valid\n", report.checked))
        },
    }
}
