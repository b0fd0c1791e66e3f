//! `customers` binary.
//!
//! ```text
//! customers [serve]      run the HTTP service (default)
//! customers db-create    create the customers table and exit
//! ```
//!
//! Configuration comes from the environment (and `.env`); see
//! [`customers::config`]. Flags override the environment.
//!
//! Run with:
//!   RUST_LOG=info STORAGE_MODE=memory cargo run
//!
//! Try:
//!   curl -X POST http://localhost:8080/customers \
//!        -H 'content-type: application/json' \
//!        -d '{"first_name":"Michael","last_name":"Brown","address":"555 Broadway, Boston, MA"}'
//!   curl 'http://localhost:8080/customers?last_name=Brown'

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use customers::config::{Config, StorageMode};
use customers::gateway::{CustomerStore, MemoryStore, PostgresStore};
use customers::{Error, Server, routes};

#[derive(Debug, Parser)]
#[command(name = "customers", version, about = "Customer records over HTTP/JSON")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// PostgreSQL connection URL (overrides DATABASE_URL).
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Storage backend: postgres | memory (overrides STORAGE_MODE).
    #[arg(long, global = true)]
    storage: Option<StorageMode>,

    /// Bind address (overrides HOST).
    #[arg(long, global = true)]
    host: Option<String>,

    /// Bind port (overrides PORT).
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service.
    Serve,
    /// Create all database tables.
    DbCreate,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.database_url {
            config.database_url.clone_from(url);
        }
        if let Some(storage) = self.storage {
            config.storage = storage;
        }
        if let Some(host) = &self.host {
            config.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "customers=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match Config::from_env() {
        Ok(mut config) => {
            cli.apply(&mut config);
            match cli.command.unwrap_or(Command::Serve) {
                Command::Serve => serve(&config).await,
                Command::DbCreate => db_create(&config).await,
            }
        }
        Err(e) => Err(Error::from(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// The store the config asks for, plus the Postgres handle (if any) so the
/// pool can be closed on the way out.
async fn open_store(config: &Config) -> Result<(Arc<dyn CustomerStore>, Option<PostgresStore>), Error> {
    match config.storage {
        StorageMode::Memory => {
            info!("using in-memory customer store");
            let store: Arc<dyn CustomerStore> = Arc::new(MemoryStore::new());
            Ok((store, None))
        }
        StorageMode::Postgres => {
            let pg = PostgresStore::connect(&config.database_url, config.max_connections).await?;
            let store: Arc<dyn CustomerStore> = Arc::new(pg.clone());
            Ok((store, Some(pg)))
        }
    }
}

async fn serve(config: &Config) -> Result<(), Error> {
    let addr = config.socket_addr()?;
    let (store, pg) = open_store(config).await?;
    store.init_schema().await?;

    let result = Server::bind(addr).serve(routes::router(store)).await;

    if let Some(pg) = pg {
        pg.close().await;
    }
    result
}

async fn db_create(config: &Config) -> Result<(), Error> {
    let (store, pg) = open_store(config).await?;
    let result = store.init_schema().await;
    if let Some(pg) = pg {
        pg.close().await;
    }
    result?;
    println!("Database tables created");
    Ok(())
}
