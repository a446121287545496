//! CLI administration tool for seller-links.
//!
//! Provides commands for creating links, viewing earnings and performing
//! database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a link (prompts for missing values)
//! cargo run --bin admin -- link create --url https://example.com --seller s1
//!
//! # View earnings, newest links first
//! cargo run --bin admin -- stats --page 1 --per-page 20
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Row counts per table
//! cargo run --bin admin -- db info
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_HOST`/`DB_USER`/`DB_PASSWORD`/`DB_NAME` (required)
//! - `BASE_URL` (optional): prefix for printed short URLs

use seller_links::application::services::{LinkService, StatsService};
use seller_links::config::{Config, mask_connection_string};
use seller_links::infrastructure::persistence::Repositories;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing seller-links.
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
    /// Manage short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show clicks and earnings per link
    Stats {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Links per page
        #[arg(long, default_value_t = 10)]
        per_page: u32,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a short link for a seller
    Create {
        /// Target URL
        #[arg(short, long)]
        url: Option<String>,

        /// Seller identifier
        #[arg(short, long)]
        seller: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
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

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url().context("Database is not configured")?;

    let pool = PgPool::connect(&database_url)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                mask_connection_string(&database_url)
            )
        })?;

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &pool).await?,
        Commands::Stats { page, per_page } => handle_stats(&pool, page, per_page).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn repositories(pool: &PgPool) -> Repositories {
    Repositories::postgres(Arc::new(pool.clone()))
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    match action {
        LinkAction::Create { url, seller, yes } => {
            let service = LinkService::new(repositories(pool).links);
            create_link(&service, url, seller, yes).await?;
        }
    }

    Ok(())
}

/// Creates a link with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for target URL and seller (or use provided)
/// 2. Confirm creation (unless `--yes` flag)
/// 3. Create the link, or report the seller's existing one
async fn create_link(
    service: &LinkService,
    url: Option<String>,
    seller: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Short Link".bright_blue().bold());
    println!();

    let target_url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Target URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    let seller_id = match seller {
        Some(s) => s,
        None => Input::new().with_prompt("Seller ID").interact_text()?,
    };

    println!();
    println!("{}", "Link details:".bright_white().bold());
    println!("  URL:    {}", target_url.cyan());
    println!("  Seller: {}", seller_id.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let created = service
        .create_link(&target_url, &seller_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    let base_url =
        std::env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000/".to_string());
    let short_url = LinkService::short_url(&base_url, &created.link.short_code);

    println!();
    if created.created {
        println!("{}", "✅ Link created successfully!".green().bold());
    } else {
        println!(
            "{}",
            "⚠️  This seller already has a link for this URL".yellow()
        );
    }
    println!();
    println!("  Code:      {}", created.link.short_code.bright_yellow().bold());
    println!("  Short URL: {}", short_url.bright_cyan());
    println!();

    Ok(())
}

/// Displays clicks and earnings per link.
///
/// # Output Format
///
/// ```text
/// 📊 Earnings (page 1)
///
///   Code        Clicks   Valid    Earnings   URL
///   ──────────────────────────────────────────────────────────────
///   abc123           2       1        0.05   https://example.com
///       05/2026      2       1        0.05
/// ```
async fn handle_stats(pool: &PgPool, page: u32, per_page: u32) -> Result<()> {
    let repos = repositories(pool);
    let service = StatsService::new(repos.links, repos.stats);

    println!(
        "{}",
        format!("📊 Earnings (page {page})").bright_blue().bold()
    );
    println!();

    let earnings = service
        .list_earnings(page, per_page)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load statistics: {}", e))?;

    if earnings.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin link create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<10} {:>8} {:>8} {:>11}   {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Valid".bright_white().bold(),
        "Earnings".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for entry in &earnings {
        println!(
            "  {:<10} {:>8} {:>8} {:>11}   {}",
            entry.link.short_code.cyan(),
            entry.total_clicks,
            entry.total_valid_clicks,
            format!("{:.2}", entry.total_earnings).bright_green(),
            entry.link.original_url.bright_black()
        );

        for month in &entry.months {
            println!(
                "      {:<6} {:>8} {:>8} {:>11}",
                month.year_month.label().bright_black(),
                month.clicks,
                month.valid_clicks,
                format!("{:.2}", month.rewards_earned)
            );
        }
    }

    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

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

            for table in ["links", "clicks", "monthly_stats"] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(pool)
                    .await?;

                println!(
                    "  {:<14} {}",
                    format!("{table}:"),
                    count.to_string().bright_green().bold()
                );
            }
            println!();
        }
    }

    Ok(())
}
