use std::sync::Arc;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use companies::sql::{self, PgCompanyStore};
use companies::{CompanyService, CompanyStore, InMemoryCompanyStore, create_company_router};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(optional, "PostgreSQL database URL (default: $DATABASE_URL, else in-memory)")]
    database_url: Option<String>,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
}

const HELP_TEXT: &str = r#"companiesd - company records daemon

USAGE:
    companiesd [OPTIONS]

OPTIONS:
    --host <HOST>           Host to bind the HTTP server [default: 127.0.0.1]
    --port <PORT>           Port to bind the HTTP server [default: 8080]
    --database-url <URL>    PostgreSQL database URL [default: $DATABASE_URL]
    --verbose               Enable verbose logging

DESCRIPTION:
    Runs the company service with its endpoints mounted under /api/

    With a database URL, pending migrations are applied at startup and companies
    are stored in PostgreSQL. Without one, companies live in memory and are lost
    when the daemon stops.

    The server supports graceful shutdown via Ctrl+C.

API ENDPOINTS:
    GET    /api/company                      List all companies
    POST   /api/company                      Create a company
    GET    /api/company/{id}                 Get a specific company
    PATCH  /api/company/{id}?reflection=...  Merge a partial update
    PUT    /api/company/{id}                 Replace a company
    DELETE /api/company/{id}                 Delete a company"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: companiesd [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let config = ServerConfig::from_args(args);
    init_tracing(config.verbose);

    let store: Arc<dyn CompanyStore> = match &config.database_url {
        Some(database_url) => {
            let store = PgCompanyStore::connect(database_url).await?;
            sql::migrate(store.pool()).await?;
            tracing::info!("connected to PostgreSQL and applied migrations");
            Arc::new(store)
        }
        None => {
            tracing::warn!("no database URL configured; using the in-memory store");
            Arc::new(InMemoryCompanyStore::new())
        }
    };

    let service = Arc::new(CompanyService::new(store));
    let app = Router::new().nest("/api", create_company_router(service));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    println!("🚀 companiesd started successfully!");
    println!("📡 Server listening on: http://{}", addr);
    println!(
        "💾 Storage: {}",
        if config.database_url.is_some() {
            "PostgreSQL"
        } else {
            "in-memory"
        }
    );
    println!("🔄 Ready to accept API requests");

    if config.verbose {
        println!();
        println!("{}", HELP_TEXT);
    }

    println!("💡 Use Ctrl+C for graceful shutdown");
    println!();

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                eprintln!("❌ Server error: {}", e);
                std::process::exit(1);
            }
        }
        () = shutdown_signal => {
            println!();
            println!("🛑 Shutdown signal received, stopping server gracefully...");
            println!("👋 companiesd stopped");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

struct ServerConfig {
    host: String,
    port: u16,
    database_url: Option<String>,
    verbose: bool,
}

impl ServerConfig {
    fn from_args(args: Args) -> Self {
        Self {
            host: args.host.unwrap_or_else(|| "127.0.0.1".to_string()),
            port: args.port.unwrap_or(8080),
            database_url: args
                .database_url
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .filter(|url| !url.trim().is_empty()),
            verbose: args.verbose,
        }
    }
}
