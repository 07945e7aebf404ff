/**
 * tallybook command line entry point
 *
 * Records transactions into the local staging store and pushes them to the
 * bookkeeping server on demand.
 */
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tallybook::client::{
    Config, EntryPatch, HttpEntryApi, LocalDatabase, Payload, StagingStore, SyncReconciler,
    SyncTarget,
};

#[derive(Parser)]
#[command(name = "tallybook")]
#[command(about = "Offline bookkeeping with deferred sync", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new transaction
    Add {
        /// Transaction as a JSON object
        payload: String,
    },

    /// List recorded transactions
    List {
        /// Only show transactions not yet synced
        #[arg(long)]
        unsynced: bool,
    },

    /// Show sync counts
    Stats,

    /// Replace the body of a transaction
    Update {
        /// Entry id
        id: String,

        /// New transaction body as a JSON object
        payload: String,
    },

    /// Delete a transaction
    Delete {
        /// Entry id
        id: String,
    },

    /// Push unsynced transactions to the server
    Sync {
        /// Sync a single entry instead of everything pending
        #[arg(long)]
        id: Option<String>,

        /// Book to create entries in (overrides the configured book)
        #[arg(long)]
        book: Option<String>,
    },

    /// Remove transactions that are already synced
    Cleanup,

    /// Remove every local transaction
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

fn parse_payload(raw: &str) -> Result<Payload, Box<dyn std::error::Error>> {
    match serde_json::from_str::<serde_json::Value>(raw)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err("payload must be a JSON object".into()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let db = LocalDatabase::open(config.db_path()).await?;
    let staging = StagingStore::new(Arc::new(db));

    match cli.command {
        Commands::Add { payload } => {
            let entry = staging.add(parse_payload(&payload)?).await?;
            println!("Recorded {}", entry.id);
        }
        Commands::List { unsynced } => {
            let entries = if unsynced {
                staging.get_unsynced().await?
            } else {
                staging.get_all().await?
            };
            if entries.is_empty() {
                println!("No transactions");
            }
            for entry in entries {
                let mark = if entry.synced { "synced" } else { "pending" };
                println!(
                    "{}  {:<7}  {}  {}",
                    entry.id,
                    mark,
                    entry.updated_at.format("%Y-%m-%d %H:%M"),
                    serde_json::Value::Object(entry.payload)
                );
            }
        }
        Commands::Stats => {
            let stats = staging.statistics().await?;
            println!("Total:    {}", stats.total);
            println!("Synced:   {}", stats.synced);
            println!("Unsynced: {}", stats.unsynced);
            if let Some(last) = staging.sync_summary().await.and_then(|s| s.last_sync_time) {
                println!("Last sync: {}", last.to_rfc3339());
            }
        }
        Commands::Update { id, payload } => {
            let patch = EntryPatch::new().payload(parse_payload(&payload)?);
            match staging.update(&id, patch).await {
                Some(entry) => println!("Updated {}", entry.id),
                None => println!("Nothing updated for {id}"),
            }
        }
        Commands::Delete { id } => {
            if staging.delete(&id).await {
                println!("Deleted {id}");
            } else {
                println!("Nothing deleted for {id}");
            }
        }
        Commands::Sync { id, book } => {
            let target = match book {
                Some(book) => SyncTarget::new(config.server_url(), book),
                None => config.target()?,
            };
            let api = HttpEntryApi::from_config(&config)?;
            let reconciler = SyncReconciler::new(staging.clone(), Arc::new(api));

            match id {
                Some(id) => {
                    let Some(entry) = staging.get(&id).await? else {
                        println!("No transaction {id}");
                        return Ok(());
                    };
                    match reconciler.sync_one(&entry, &target).await {
                        Ok(()) => println!("Synced {id}"),
                        Err(e) => println!("Sync failed for {id}: {e}"),
                    }
                }
                None => {
                    let report = reconciler.sync_pending(&target).await?;
                    println!(
                        "Synced {} of {} transactions",
                        report.succeeded,
                        report.attempted()
                    );
                    for failed in &report.failed {
                        println!("  still pending: {failed}");
                    }
                }
            }
        }
        Commands::Cleanup => {
            let removed = staging.cleanup_synced().await;
            println!("Removed {removed} synced transactions");
        }
        Commands::Clear { yes } => {
            if !yes {
                println!("Refusing to wipe local transactions without --yes");
                return Ok(());
            }
            if staging.clear_all().await {
                println!("Local transactions cleared");
            } else {
                println!("Failed to clear local transactions");
            }
        }
    }

    Ok(())
}
