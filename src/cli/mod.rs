//! Command-line interface for sandbox.
//!
//! Provides commands for listing indexed sections, rendering pages to
//! stdout, serving the site over HTTP, and inspecting configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{self, ResolvedConfig};
use crate::library::ContentEntry;
use crate::server;
use crate::site::{Section, Site};

/// sandbox - Directory-driven content index and page server
#[derive(Parser, Debug)]
#[command(name = "sandbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Site root (overrides config file and SANDBOX_ROOT)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the entries of a section
    List {
        /// Section to list
        #[arg(short, long, value_enum, default_value = "projects")]
        section: SectionArg,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render a section's listing page to stdout
    Render {
        /// Section to render
        #[arg(short, long, value_enum, default_value = "projects")]
        section: SectionArg,
    },

    /// Serve the site over HTTP
    Serve {
        /// Address to bind to (defaults to config, then 127.0.0.1:8080)
        #[arg(short, long)]
        address: Option<String>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Section for CLI (maps to Section)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SectionArg {
    /// Practice projects (landing page)
    Projects,

    /// Fundamentals samples
    Fundamentals,
}

impl From<SectionArg> for Section {
    fn from(s: SectionArg) -> Self {
        match s {
            SectionArg::Projects => Section::Projects,
            SectionArg::Fundamentals => Section::Fundamentals,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = self.resolve_config()?;

        match self.command {
            Commands::List { section, json } => list_section(config, section.into(), json).await,
            Commands::Render { section } => render_section(config, section.into()).await,
            Commands::Serve { address } => serve(config, address).await,
            Commands::Config => show_config(&config),
        }
    }

    /// Resolved config with the --root flag applied
    fn resolve_config(&self) -> Result<ResolvedConfig> {
        let config = config::config()?.clone();
        Ok(match &self.root {
            Some(root) => config.rebase(root.clone()),
            None => config,
        })
    }
}

/// List entries of a section
async fn list_section(config: ResolvedConfig, section: Section, json: bool) -> Result<()> {
    let site = Site::new(config)?;
    let entries = site
        .entries(section)
        .await
        .with_context(|| format!("Failed to index {}", section))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No entries in {}", site.section_dir(section).display());
        return Ok(());
    }

    print_table(&entries);
    println!("\nTotal: {} entries", entries.len());

    Ok(())
}

fn print_table(entries: &[ContentEntry]) {
    println!("{:<24} {:<6} {:<24} {:<50}", "NAME", "KIND", "TITLE", "DESCRIPTION");
    println!("{}", "-".repeat(104));

    for entry in entries {
        println!(
            "{:<24} {:<6} {:<24} {:<50}",
            truncate(&entry.name, 24),
            entry.kind.to_string(),
            truncate(&entry.title, 24),
            truncate(&entry.description, 50)
        );
    }
}

/// Shorten to at most `max` characters, marking the cut with "..."
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Render a section page to stdout
async fn render_section(config: ResolvedConfig, section: Section) -> Result<()> {
    let site = Site::new(config)?;
    let html = site
        .render_section(section)
        .await
        .with_context(|| format!("Failed to render {}", section))?;

    println!("{}", html);
    Ok(())
}

/// Start HTTP server
async fn serve(config: ResolvedConfig, address: Option<String>) -> Result<()> {
    let address = address.unwrap_or_else(|| config.server.bind.clone());
    let site = Site::new(config)?;
    server::serve(site, &address).await
}

/// Show the resolved configuration (for debugging)
fn show_config(cfg: &ResolvedConfig) -> Result<()> {
    println!("Sandbox Configuration");
    println!("=====================");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Root:          {}", cfg.root.display());
    println!("  Projects:      {}", cfg.projects_dir.display());
    println!("  Fundamentals:  {}", cfg.fundamentals_dir.display());
    println!();
    println!("Index:");
    println!("  Metadata file:    {}", cfg.index.metadata_file);
    println!("  Description line: {}", cfg.index.description_line);
    println!("  Order:            {:?}", cfg.index.order);
    if cfg.index.ignore.is_empty() {
        println!("  Ignore:           (none)");
    } else {
        println!("  Ignore:           {}", cfg.index.ignore.join(", "));
    }
    println!();
    println!("Server:");
    println!("  Bind:             {}", cfg.server.bind);
    println!("  Max sample size:  {} bytes", cfg.server.max_sample_bytes);
    println!("  Read timeout:     {}s", cfg.server.read_timeout.as_secs());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("this is far too long", 10), "this is...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::try_parse_from(["sandbox", "--root", "/srv", "list", "--section", "fundamentals", "--json"])
            .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/srv")));
        match cli.command {
            Commands::List { section, json } => {
                assert_eq!(Section::from(section), Section::Fundamentals);
                assert!(json);
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["sandbox", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { address: None }));

        let cli = Cli::try_parse_from(["sandbox", "serve", "-a", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve { address } => assert_eq!(address.as_deref(), Some("0.0.0.0:9000")),
            other => panic!("Unexpected command: {:?}", other),
        }
    }
}
