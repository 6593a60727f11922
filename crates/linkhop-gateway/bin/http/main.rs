mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use linkhop_gateway::{App, AppState};
use linkhop_generator::RandomGenerator;
use linkhop_redirector::RedirectorService;
use linkhop_shortener::ShortenerService;
use linkhop_storage::{
    InMemoryLinkStore, LinkStore, MySqlLinkStore, SchemaBootstrap, SqliteLinkStore,
};
use tracing::info;

use crate::cli::{Command, ServeArgs, StorageArgs, StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CLI::parse();
    linkhop_telemetry::init(cli.log_format.into())?;

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::InitDb(args) => init_db(args).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    info!(
        listen_addr = %args.listen_addr,
        public_base_url = %args.public_base_url,
        storage_backend = %args.storage.storage,
        code_length = args.code_length,
        "starting linkhop"
    );

    let generator = RandomGenerator::new(args.code_length).context("invalid code length")?;

    match args.storage.storage {
        StorageBackendArg::InMemory => run_server(&args, InMemoryLinkStore::new(), generator).await,
        StorageBackendArg::Sqlite => {
            let store = SqliteLinkStore::connect(args.storage.sqlite_url())
                .await
                .context("failed to open sqlite database")?;
            run_server(&args, store, generator).await
        }
        StorageBackendArg::Mysql => {
            let database_url = args
                .storage
                .database_url
                .as_deref()
                .context("database url is required when storage backend is mysql")?;
            let store = MySqlLinkStore::connect(database_url)
                .await
                .context("failed to connect to mysql")?;
            run_server(&args, store, generator).await
        }
    }
}

async fn run_server<S: LinkStore + SchemaBootstrap>(
    args: &ServeArgs,
    store: S,
    generator: RandomGenerator,
) -> anyhow::Result<()> {
    store
        .init_schema()
        .await
        .context("failed to prepare the links schema")?;

    let store = Arc::new(store);
    let shortener = ShortenerService::new(Arc::clone(&store), generator);
    let redirector = RedirectorService::new(store);
    let state = AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        args.public_base_url.clone(),
    );

    let listener = tokio::net::TcpListener::bind(args.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn init_db(args: StorageArgs) -> anyhow::Result<()> {
    match args.storage {
        StorageBackendArg::InMemory => {
            println!("The in-memory store has no schema to initialize.");
            return Ok(());
        }
        StorageBackendArg::Sqlite => {
            let store = SqliteLinkStore::connect(args.sqlite_url())
                .await
                .context("error initializing database")?;
            store
                .init_schema()
                .await
                .context("error initializing database")?;
        }
        StorageBackendArg::Mysql => {
            let database_url = args
                .database_url
                .as_deref()
                .context("database url is required when storage backend is mysql")?;
            let store = MySqlLinkStore::connect(database_url)
                .await
                .context("error initializing database")?;
            store
                .init_schema()
                .await
                .context("error initializing database")?;
        }
    }

    println!("Initialized the database.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
