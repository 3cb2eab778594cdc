use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use showroom_client::{CloudinaryUploader, HostingConfig, HttpMailer, MailerConfig};
use showroom_core::models::CarListing;
use showroom_core::{ListingPayload, ListingService, Notification, send_notification};
use showroom_db::{Database, DatabaseConfig, ListingRepository};

#[derive(Parser)]
#[command(name = "showroom", version, about = "Showroom dealership admin tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored car listings, newest first
    List {
        /// Maximum number of listings to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Print the listings as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show a single listing
    Show {
        /// Listing ID
        id: Uuid,
    },

    /// Create a listing from a JSON file, uploading any inline images
    Import {
        /// Path to a JSON file shaped like the `POST /api/cars` body
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Send a contact notification to the configured staff inbox
    Notify {
        /// Sender name shown in the email
        #[arg(long, default_value = "Showroom CLI")]
        name: String,

        /// Reply-to address
        #[arg(long, env = "MAIL_TEST_REPLY_TO")]
        email: String,

        /// Subject line suffix
        #[arg(long)]
        subject: Option<String>,

        /// Message body
        #[arg(long, default_value = "Test notification from the showroom CLI.")]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("showroom=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List { limit, json } => {
            let repo = connect_db().await?;
            cmd_list(&repo, limit, json).await?;
        }
        Commands::Show { id } => {
            let repo = connect_db().await?;
            cmd_show(&repo, id).await?;
        }
        Commands::Import { file } => {
            let repo = connect_db().await?;
            cmd_import(&file, repo).await?;
        }
        Commands::Notify {
            name,
            email,
            subject,
            message,
        } => {
            cmd_notify(name, email, subject, message).await?;
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and apply migrations.
async fn connect_db() -> Result<ListingRepository> {
    let config = DatabaseConfig::from_env().context("DATABASE_URL not set")?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;

    Ok(db.listing_repo())
}

async fn cmd_list(repo: &ListingRepository, limit: usize, json: bool) -> Result<()> {
    let listings = repo.list_newest_first().await?;
    let shown: Vec<&CarListing> = listings.iter().take(limit).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        println!("No listings yet.");
        return Ok(());
    }

    println!("{} listing(s), showing {}:\n", listings.len(), shown.len());
    for listing in shown {
        print_summary(listing);
    }

    Ok(())
}

async fn cmd_show(repo: &ListingRepository, id: Uuid) -> Result<()> {
    let listing = repo
        .get(id)
        .await?
        .with_context(|| format!("Listing {id} not found"))?;

    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}

async fn cmd_import(file: &Path, repo: ListingRepository) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read listing file: {}", file.display()))?;
    let payload: ListingPayload =
        serde_json::from_str(&raw).context("Invalid listing JSON")?;

    let uploader = CloudinaryUploader::new(HostingConfig::from_env()?)?;
    let service = ListingService::new(uploader, repo);

    let listing = service.create(payload).await?;

    println!("Created listing {}", listing.id);
    print_summary(&listing);
    Ok(())
}

async fn cmd_notify(
    name: String,
    email: String,
    subject: Option<String>,
    message: String,
) -> Result<()> {
    let notification = Notification::from_json(serde_json::json!({
        "type": "contact",
        "formData": {
            "name": name,
            "email": email,
            "subject": subject,
            "message": message,
        }
    }))?;

    let mailer = HttpMailer::new(MailerConfig::from_env()?)?;
    send_notification(&mailer, &notification).await?;

    println!("Notification sent to {}", mailer.recipient());
    Ok(())
}

fn print_summary(listing: &CarListing) {
    println!(
        "  {}  {} {} {}  {:.0} {}  ({} images, created {})",
        listing.id,
        listing.year,
        listing.make,
        listing.model,
        listing.price,
        listing.currency,
        listing.images.len(),
        listing.created_at.format("%Y-%m-%d %H:%M"),
    );
}
