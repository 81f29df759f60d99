//! CLI administration tool for shortlink.
//!
//! Talks to the configured PostgreSQL registry directly, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Apply pending migrations
//! cargo run --bin admin -- db migrate
//!
//! # Count stored mappings
//! cargo run --bin admin -- stats
//!
//! # Shorten a URL (prompts when the argument is omitted)
//! cargo run --bin admin -- shorten example.com/some/page
//!
//! # Look up a short identifier
//! cargo run --bin admin -- resolve aZ3kQ9x
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` or the `DB_*` components, plus
//! `BASE_URL` for printed short URLs.

use shortlink::application::services::{ResolverService, ShortenerService};
use shortlink::config::{self, RegistrySource};
use shortlink::domain::repositories::Registry;
use shortlink::infrastructure::cache::NullCache;
use shortlink::infrastructure::persistence::{PgRegistry, TimeoutRegistry};
use shortlink::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Shorten a URL
    Shorten {
        /// Long URL; prompted for when omitted
        url: Option<String>,
    },

    /// Print the long URL behind a short identifier
    Resolve {
        short_id: String,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let database_url = match &config.registry {
        RegistrySource::Postgres { database_url } => database_url.clone(),
        RegistrySource::Memory => {
            anyhow::bail!("admin commands need the PostgreSQL registry, REGISTRY_BACKEND is 'memory'")
        }
        RegistrySource::Unconfigured { reason } => anyhow::bail!("{}", reason),
    };

    let pool = connect_pool(&config, &database_url).await?;
    let registry = Arc::new(TimeoutRegistry::new(
        PgRegistry::new(Arc::new(pool)),
        Duration::from_millis(config.registry_timeout_ms),
    ));

    match cli.command {
        Commands::Stats => handle_stats(&registry).await?,
        Commands::Db { action } => handle_db_action(action, &registry).await?,
        Commands::Shorten { url } => {
            let shortener = ShortenerService::new(
                Arc::clone(&registry),
                config.base_url.clone(),
                config.allocation_max_attempts,
            );
            handle_shorten(&shortener, url).await?
        }
        Commands::Resolve { short_id } => {
            let resolver = ResolverService::new(registry, Arc::new(NullCache::new()), None);
            handle_resolve(&resolver, &short_id).await?
        }
    }

    Ok(())
}

/// Displays the number of stored mappings.
async fn handle_stats(registry: &TimeoutRegistry<PgRegistry>) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let mappings = registry
        .inner()
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count mappings: {}", e))?;

    println!(
        "  Short URLs: {}",
        mappings.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, registry: &TimeoutRegistry<PgRegistry>) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            registry
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "Database connection OK".green().bold());
        }
        DbAction::Migrate => {
            println!("{}", "Applying migrations...".bright_blue());

            registry
                .inner()
                .migrate()
                .await
                .context("Failed to apply migrations")?;

            println!("{}", "Migrations up to date".green().bold());
        }
    }

    Ok(())
}

async fn handle_shorten(
    shortener: &ShortenerService<TimeoutRegistry<PgRegistry>>,
    url: Option<String>,
) -> Result<()> {
    let long_url = match url {
        Some(u) => u,
        None => Input::new().with_prompt("Long URL").interact_text()?,
    };

    let shortened = shortener
        .shorten(&long_url)
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.code()))?;

    let label = if shortened.created {
        "Created".green().bold()
    } else {
        "Already shortened".yellow().bold()
    };

    println!("{}", label);
    println!("  Short URL: {}", shortened.short_url.bright_yellow().bold());
    println!("  Long URL:  {}", shortened.long_url.cyan());

    Ok(())
}

async fn handle_resolve<R: Registry + ?Sized>(
    resolver: &ResolverService<R>,
    short_id: &str,
) -> Result<()> {
    let long_url = resolver
        .resolve(short_id)
        .await
        .map_err(|e| anyhow::anyhow!("Not resolved: {} ({})", e, e.code()))?;

    println!("{}", long_url.cyan());

    Ok(())
}
