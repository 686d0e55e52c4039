use anyhow::Context;
use clap::{CommandFactory, FromArgMatches, Parser};
use posematch_protocol::config::ScoringParams;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod detector;
mod error;
mod routes;
mod state;

use crate::detector::{build_detector, DetectorKind};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Websocket scoring server for pose motion-matching")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8139)]
    port: u16,

    /// `json`: clients send landmarks. `sidecar`: images go to --sidecar.
    #[arg(long, default_value = "json")]
    detector: DetectorKind,

    /// Pose model command, e.g. `--sidecar python3 pose_sidecar.py`
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    sidecar: Vec<String>,

    /// JSON scoring profile; explicit flags override its values.
    #[arg(long)]
    profile: Option<String>,

    #[command(flatten)]
    params: ScoringParams,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = Args::command().get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    info!("💃 posematch server is initializing...");

    let params = match &args.profile {
        Some(path) => {
            info!("⚖️  Loading scoring profile from: {}", path);
            let mut file_params = ScoringParams::load_from_file(path).map_err(AppError::Config)?;
            file_params.merge_from_cli(&args.params, &matches);
            file_params
        }
        None => args.params.clone(),
    };
    params.validate().map_err(AppError::Config)?;
    info!(
        "🎯 Strategy {} ({} joints), aggregating every {} frames",
        params.strategy, params.joint_set, params.aggregate_interval
    );

    let detector = build_detector(args.detector, &args.sidecar)?;
    let state = Arc::new(AppState::new(detector, params));

    let app = routes::play_routes()
        .merge(routes::system_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(AppError::from)?;
    info!("🚀 Listening on ws://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
