//! chunksync CLI - local delta synchronization

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rand::distributions::Alphanumeric;
use rand::Rng;

use chunksync::api::create_api_server;
use chunksync::config::{Config, StoreBackend};
use chunksync::fileio;
use chunksync::observe::{SharedObserver, TracingObserver};
use chunksync::sync::{SyncEngine, SyncOutcome};
use chunksync::telemetry;

#[derive(Parser, Debug)]
#[command(name = "chunksync", version, about = "Chunk-level delta sync for local files")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Signature store: "memory" or "snapshot:<path>"
    #[arg(long, env = "CHUNKSYNC_STORE", default_value = "memory", global = true)]
    store: StoreBackend,

    /// Address for the HTTP service
    #[arg(long, env = "CHUNKSYNC_BIND", default_value = "127.0.0.1:3000", global = true)]
    bind: SocketAddr,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a file, or bring it in line with its stored signature
    Sync { path: PathBuf },
    /// Print the signature of a file
    Signature { path: PathBuf },
    /// Print the delta between two files
    Diff { base: PathBuf, updated: PathBuf },
    /// Register a file, overwrite it with random text, then sync it again
    Demo { path: PathBuf },
    /// Serve the HTTP API
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::new()
        .store(cli.store)
        .bind(cli.bind)
        .log_filter(telemetry::verbosity_filter(cli.verbose, "info"));

    telemetry::init(&config.log_filter);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), ?config, "starting chunksync");

    let store = config
        .store
        .open()
        .context("failed to open signature store")?;
    let observer: SharedObserver = Arc::new(TracingObserver);
    let engine = SyncEngine::with_observer(store, Some(observer));

    match cli.command {
        Commands::Sync { path } => {
            let outcome = engine
                .handle(&path)
                .with_context(|| format!("failed to sync {}", path.display()))?;
            print_outcome(&outcome);
        }
        Commands::Signature { path } => {
            let signature = engine
                .signature(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            println!("{signature}");
        }
        Commands::Diff { base, updated } => {
            let delta = engine.diff_files(&base, &updated)?;
            println!("{delta}");
            println!("{}", delta.stats());
        }
        Commands::Demo { path } => demo(&engine, &path)?,
        Commands::Serve => serve(engine, config.bind_addr).await?,
    }

    Ok(())
}

fn print_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Registered(signature) => {
            println!(
                "registered {} ({} bytes, {} chunks)",
                signature.file_path.display(),
                signature.file_size,
                signature.chunk_count()
            );
        }
        SyncOutcome::Synchronized { delta, signature } => {
            println!("{delta}");
            println!("{}", delta.stats());
            println!("synchronized {} as {}", signature.file_path.display(), signature.id);
        }
    }
}

fn demo(engine: &SyncEngine, path: &Path) -> Result<()> {
    if !path.exists() {
        fileio::write_to_file(path, b"original data")?;
    }
    print_outcome(&engine.handle(path)?);

    let text: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(100)
        .map(char::from)
        .collect();
    fileio::write_to_file(path, text.as_bytes())?;

    print_outcome(&engine.handle(path)?);
    Ok(())
}

async fn serve(engine: SyncEngine, addr: SocketAddr) -> Result<()> {
    let app = create_api_server(Arc::new(engine));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "chunksync API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
