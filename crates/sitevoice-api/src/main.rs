//! Sitevoice REST API entry point.
//!
//! Binary name: `sitevoice`
//!
//! Parses CLI arguments, initializes the database and memory engine, then
//! starts the REST API server with the background purge task.

mod background;
mod http;
mod state;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use state::AppState;

#[derive(Parser)]
#[command(name = "sitevoice", about = "Voice widget backend", version)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = 8001, env = "SITEVOICE_PORT")]
        port: u16,

        /// Host to bind
        #[arg(long, default_value = "127.0.0.1", env = "SITEVOICE_HOST")]
        host: String,

        /// Bridge tracing spans to an OpenTelemetry stdout exporter
        #[arg(long)]
        otel: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host, otel } => {
            init_logging(cli.verbose, cli.quiet, otel)?;
            serve(host, port).await?;
            sitevoice_observe::tracing_setup::shutdown_tracing();
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool, otel: bool) -> anyhow::Result<()> {
    let filter = match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "info,sitevoice=debug",
        _ => "trace",
    };
    // RUST_LOG wins over the verbosity flags when set.
    sitevoice_observe::tracing_setup::init_tracing(filter, otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

async fn serve(host: String, port: u16) -> anyhow::Result<()> {
    let state = AppState::init().await?;

    let shutdown = CancellationToken::new();
    let purge_handle = tokio::spawn(background::run_purge_task(
        state.engine.clone(),
        state.config.purge_interval_secs,
        shutdown.clone(),
    ));

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} Sitevoice API listening on {}",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    let _ = purge_handle.await;

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
