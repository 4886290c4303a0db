//! CLI administration tool for shortcut.
//!
//! Operates directly on the database, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Deactivate a short URL
//! cargo run --bin admin -- deactivate aZ3kP9q
//!
//! # Show details of a short URL
//! cargo run --bin admin -- show aZ3kP9q
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Convert between numeric ids and Base62 codes
//! cargo run --bin admin -- codec encode 125
//! cargo run --bin admin -- codec decode 21
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server. `DATABASE_URL` (or `DB_*`) is
//! required for every command except `codec`; `REDIS_URL` is used by
//! `deactivate` to evict the cached entry.

use shortcut::application::services::UrlCacheLayer;
use shortcut::config::{self, Config};
use shortcut::domain::entities::ShortenedUrl;
use shortcut::domain::repositories::{AnalyticsRepository, UrlRepository};
use shortcut::infrastructure::cache::{CacheService, NullCache, RedisCache};
use shortcut::infrastructure::persistence::{PgAnalyticsRepository, PgUrlRepository};
use shortcut::utils::code_generator::{decode_to_id, encode_from_id};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortcut.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Deactivate a short URL so it stops redirecting
    Deactivate {
        /// Short code to deactivate
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show a short URL and its click summary
    Show {
        /// Short code to look up
        code: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Base62 conversions
    Codec {
        #[command(subcommand)]
        action: CodecAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[derive(Subcommand)]
enum CodecAction {
    /// Encode a numeric id as a Base62 code
    Encode { id: u64 },

    /// Decode a Base62 code to its numeric id
    Decode { code: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Codec { action } => handle_codec_action(action),
        command => run_with_database(command).await,
    }
}

/// Connects to the configured database and dispatches `command`.
async fn run_with_database(command: Commands) -> Result<()> {
    let config = config::load_from_env()?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL (or DB_USER, DB_PASSWORD, DB_NAME) must be set")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    match command {
        Commands::Deactivate { code, yes } => deactivate(&config, &pool, &code, yes).await?,
        Commands::Show { code } => show(&pool, &code).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Codec { action } => handle_codec_action(action)?,
    }

    Ok(())
}

/// Deactivates a short URL after confirmation and evicts its cache entry.
///
/// Deactivation is idempotent from the operator's point of view: an already
/// inactive code is reported and left alone.
async fn deactivate(config: &Config, pool: &PgPool, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔒 Deactivate Short URL".bright_blue().bold());
    println!();

    let repo = Arc::new(PgUrlRepository::new(Arc::new(pool.clone())));

    let Some(url) = find_active(repo.as_ref(), code).await? else {
        println!("{}", "⚠️  This short URL is already inactive".yellow());
        return Ok(());
    };

    println!("  Code:   {}", url.short_code().cyan());
    println!("  Target: {}", url.original_url().bright_white());
    println!("  Clicks: {}", url.click_count().to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Deactivate this short URL?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.deactivate(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to deactivate: {}", e))?;

    let cache: Arc<dyn CacheService> = match config.redis_url.as_deref() {
        Some(redis_url) => match RedisCache::connect(redis_url).await {
            Ok(redis) => Arc::new(redis),
            Err(e) => {
                println!(
                    "{}",
                    format!("⚠️  Redis unavailable ({e}), cached entry expires on its own").yellow()
                );
                Arc::new(NullCache::new())
            }
        },
        None => Arc::new(NullCache::new()),
    };
    UrlCacheLayer::new(repo, cache).invalidate(code).await;

    println!();
    println!("{}", "✅ Short URL deactivated".green().bold());
    println!();

    Ok(())
}

/// Looks up an active short URL for deactivation.
///
/// Returns `None` when the code exists but is already inactive, and an error
/// when the code was never issued.
async fn find_active<R: UrlRepository + ?Sized>(
    repo: &R,
    code: &str,
) -> Result<Option<ShortenedUrl>> {
    if let Some(url) = repo
        .get_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    {
        return Ok(Some(url));
    }

    let exists = repo
        .exists_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if exists {
        Ok(None)
    } else {
        anyhow::bail!("Short URL not found")
    }
}

/// Prints a short URL with its daily click breakdown.
async fn show(pool: &PgPool, code: &str) -> Result<()> {
    let repo = PgAnalyticsRepository::new(Arc::new(pool.clone()));

    let analytics = repo
        .get_url_analytics(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Short URL not found")?;

    println!("{}", "🔗 Short URL".bright_blue().bold());
    println!();
    println!("  Code:    {}", analytics.short_code.cyan());
    println!("  Target:  {}", analytics.original_url.bright_white());
    println!(
        "  Created: {}",
        analytics
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Clicks:  {}",
        analytics.total_clicks.to_string().bright_green().bold()
    );

    if !analytics.daily_clicks.is_empty() {
        println!();
        println!(
            "  {:<12} {}",
            "Date".bright_white().bold(),
            "Clicks".bright_white().bold()
        );
        println!("  {}", "─".repeat(24).bright_black());
        for day in &analytics.daily_clicks {
            println!("  {:<12} {}", day.date.to_string(), day.count);
        }
    }
    println!();

    Ok(())
}

/// Displays system statistics.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let urls_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shortened_urls")
        .fetch_one(pool)
        .await?;

    let active_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM shortened_urls
         WHERE is_active AND (expires_at IS NULL OR expires_at > NOW())",
    )
    .fetch_one(pool)
    .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_analytics")
        .fetch_one(pool)
        .await?;

    println!(
        "  Short URLs:  {}",
        urls_count.to_string().bright_green().bold()
    );
    println!(
        "  Redirecting: {}",
        active_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:      {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let repo = PgUrlRepository::new(Arc::new(pool.clone()));
            repo.ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

fn handle_codec_action(action: CodecAction) -> Result<()> {
    match action {
        CodecAction::Encode { id } => {
            println!("{}", encode_from_id(id).bright_yellow().bold());
        }
        CodecAction::Decode { code } => {
            let id = decode_to_id(&code).with_context(|| format!("Cannot decode '{code}'"))?;
            println!("{}", id.to_string().bright_yellow().bold());
        }
    }

    Ok(())
}
