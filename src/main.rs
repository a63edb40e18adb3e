use clap::{Parser, Subcommand};
use remote_gal::builder::CatalogBuilder;
use remote_gal::state::{CatalogLoader, CatalogState};
use remote_gal::supabase::SupabaseGateway;
use remote_gal::{config, output};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "remote-gal")]
#[command(about = "Catalog builder for photo portfolios in remote object storage")]
#[command(long_about = "\
Catalog builder for photo portfolios in remote object storage

Your bucket is the data source. Top-level folders become gallery categories,
their newest uploads become display-ready assets, and the assembled catalog
is printed as a tree or as JSON for downstream presentation.

Bucket structure:

  portfolio/                       # Bucket root
  ├── weddings/                    # Category (any top-level folder)
  │   ├── ceremony.jpg             # Asset
  │   └── .emptyFolderPlaceholder  # Store marker, always excluded
  ├── urban/                       # Folders with no real assets are omitted
  └── .internal/                   # Reserved prefix, never listed

Categories keep the root listing's A→Z order; assets within a category are
newest-first, capped by listing.per_category_limit. Display URLs point at
the store's render endpoint with the configured dimension and quality.

Run 'remote-gal gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the catalog once and print it
    Fetch {
        /// Print the snapshot as JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Build the catalog and verify its invariants
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Fetch { json } => {
            let config = config::load_config(&cli.config)?;
            let state = load_once(&config).await?;
            match state {
                CatalogState::Ready(catalog) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(catalog.as_ref())?);
                    } else {
                        output::print_catalog(&catalog);
                    }
                }
                CatalogState::Failed(reason) => {
                    eprintln!("Catalog build failed: {reason}");
                    std::process::exit(1);
                }
                other => unreachable!("load returned non-terminal state {other:?}"),
            }
        }
        Command::Check => {
            let config = config::load_config(&cli.config)?;
            let limit = config.listing.per_category_limit;
            let state = load_once(&config).await?;
            match state {
                CatalogState::Ready(catalog) => {
                    for category in &catalog.categories {
                        if category.assets.is_empty() {
                            eprintln!("Invariant violated: empty category {}", category.raw_name);
                            std::process::exit(1);
                        }
                        if category.assets.len() > limit {
                            eprintln!(
                                "Invariant violated: {} exceeds per-category limit {limit}",
                                category.raw_name
                            );
                            std::process::exit(1);
                        }
                    }
                    println!(
                        "OK: {} categories, {} assets",
                        catalog.len(),
                        catalog.asset_count()
                    );
                }
                CatalogState::Failed(reason) => {
                    eprintln!("Catalog build failed: {reason}");
                    std::process::exit(1);
                }
                other => unreachable!("load returned non-terminal state {other:?}"),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config());
        }
    }

    Ok(())
}

/// Wire gateway → builder → loader and run a single build.
async fn load_once(
    config: &config::SiteConfig,
) -> Result<CatalogState, Box<dyn std::error::Error>> {
    let gateway = Arc::new(SupabaseGateway::new(&config.supabase, &config.bucket)?);
    let loader = CatalogLoader::new(CatalogBuilder::new(gateway, config));
    Ok(loader.load().await)
}
