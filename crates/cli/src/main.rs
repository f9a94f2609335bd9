//! Food en K CLI - session store migrations and content checks.
//!
//! # Usage
//!
//! ```bash
//! # Create the sessions table used by the storefront
//! fek migrate sessions
//!
//! # Parse every markdown page and report problems
//! fek content check
//!
//! # Check that the CMS answers and count entries per collection
//! fek cms check
//! ```
//!
//! # Commands
//!
//! - `migrate sessions` - Create the `tower_sessions.session` table
//! - `content check` - Validate the markdown pages and their frontmatter
//! - `cms check` - Reach the Strapi CMS and list collection sizes

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fek")]
#[command(author, version, about = "Food en K CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Markdown page tools
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Content backend tools
    Cms {
        #[command(subcommand)]
        action: CmsAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the session store table
    Sessions,
}

#[derive(Subcommand)]
enum ContentAction {
    /// Parse every page and report errors
    Check {
        /// Content directory (contains `pages/`)
        #[arg(short, long, default_value = food_en_k_storefront::CONTENT_DIR)]
        dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum CmsAction {
    /// Ping the CMS and count entries in each collection
    Check,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Sessions => commands::migrate::sessions().await?,
        },
        Commands::Content { action } => match action {
            ContentAction::Check { dir } => commands::content::check(&dir)?,
        },
        Commands::Cms { action } => match action {
            CmsAction::Check => commands::cms::check().await?,
        },
    }
    Ok(())
}
