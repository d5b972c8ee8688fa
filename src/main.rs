use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kubesnap::config::Settings;
use kubesnap::error::Result;
use kubesnap::export::aggregator::Aggregator;
use kubesnap::k8s::resources::KubeResources;
use kubesnap::k8s::{USER_AGENT, client};
use kubesnap::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to serve the export API on
    #[arg(long, env = "KUBESNAP_LISTEN", default_value = "0.0.0.0:8000")]
    listen: String,

    /// Namespace to exclude from every snapshot (repeatable, or
    /// comma-separated via the environment)
    #[arg(long = "exclude", env = "KUBESNAP_EXCLUDES", value_delimiter = ',')]
    excludes: Vec<String>,

    /// Deadline for a single snapshot request, in seconds
    #[arg(long, env = "KUBESNAP_REQUEST_TIMEOUT", default_value_t = 30)]
    request_timeout_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::new(&args.listen, args.excludes, args.request_timeout_seconds)?;
    info!(
        "excluding {} namespace(s) from snapshots",
        settings.excludes.len()
    );

    let kube_client = client::new(Some(USER_AGENT)).await?;
    let aggregator = Aggregator::new(Arc::new(KubeResources::new(kube_client)));

    let listen = settings.listen;
    let state = AppState {
        aggregator: Arc::new(aggregator),
        settings: Arc::new(settings),
    };

    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("serving cluster inventory on http://{listen}");
    axum::serve(listener, server::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
