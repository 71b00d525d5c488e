//! Solver server - stateless JSON API over the stepwise engines.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use stepwise::io::config::DEFAULT_CONFIG_FILE;
use stepwise::session::load_settings;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "stepwise-ui")]
#[command(about = "JSON API and static frontend host for the stepwise solver")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Solver config (defaults apply when it does not exist)
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory containing frontend static files (defaults to ./ui/dist)
    #[arg(long)]
    ui_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stepwise_ui=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let settings = load_settings(&args.config)?;
    info!(
        config = %args.config.display(),
        notation = ?settings.notation,
        decimal_places = settings.decimal_places,
        "starting stepwise-ui"
    );

    let state = AppState::new(settings);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .nest("/api", routes::api_router())
        .layer(cors)
        .with_state(state);

    let ui_dir = args
        .ui_dir
        .unwrap_or_else(|| PathBuf::from("ui").join("dist"));

    if ui_dir.exists() {
        info!(ui_dir = %ui_dir.display(), "serving static UI files");
        app = app.fallback_service(ServeDir::new(ui_dir).append_index_html_on_directories(true));
    } else {
        info!(ui_dir = %ui_dir.display(), "UI directory not found, API-only mode");
    }

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
