use clap::Parser;
use mixwheel_api::{RestApi, ServiceContext};
use mixwheel_core::Catalog;
use mixwheel_similarity::EngineConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Next-track recommendations for DJs
#[derive(Parser, Debug)]
#[command(name = "mixwheel")]
#[command(about = "Harmonic next-track recommendations for DJs", long_about = None)]
struct Args {
    /// Track catalog (.json array or .jsonl/.ndjson)
    #[arg(short, long)]
    catalog: PathBuf,

    /// Address to bind the HTTP API to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(long, default_value_t = 8000)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Neighbouring genres admitted when a request has no genre filter
    #[arg(long, default_value_t = 5)]
    similar_genres: usize,

    /// How far build/drop moves a feature target
    #[arg(long, default_value_t = 0.15)]
    target_step: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting mixwheel v{}", env!("CARGO_PKG_VERSION"));
    info!("Catalog: {:?}", args.catalog);

    let catalog = Catalog::load(&args.catalog)?;
    let config = EngineConfig {
        similar_genre_count: args.similar_genres,
        target_step: args.target_step,
        ..EngineConfig::default()
    };
    let context = Arc::new(ServiceContext::build(catalog, config)?);

    let host = args.host.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", host, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(context, &host, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
