//! Sketch Quiz Inference Server
//!
//! HTTP API server that classifies uploaded sketch images with a
//! pretrained CNN. Serves either the plain classification variant or the
//! quiz variant, selected by configuration; the pipeline code is shared.

mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sketch_core::backend::{backend_name, default_device, InferenceBackend};
use sketch_core::config::VariantConfig;
use sketch_core::labels::LabelTable;
use sketch_model::load_model;
use sketch_pipeline::Predictor;

use crate::state::{AppState, ServeOptions};

/// Sketch classification inference server
#[derive(Parser, Debug)]
#[command(name = "sketch-server")]
#[command(version)]
#[command(about = "HTTP API server for sketch classification and quiz rounds")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Variant preset to serve ("sketch" or "quiz")
    #[arg(long, default_value = "sketch")]
    variant: String,

    /// Variant configuration file (JSON, overrides --variant)
    #[arg(long, env = "SKETCH_VARIANT_CONFIG")]
    variant_config: Option<PathBuf>,

    /// Path to the model weights record (overrides the variant default)
    #[arg(short, long, env = "SKETCH_WEIGHTS")]
    weights: Option<PathBuf>,

    /// Class label file (JSON array of strings; built-in sketch set when omitted)
    #[arg(long, env = "SKETCH_LABELS")]
    labels: Option<PathBuf>,

    /// Allowed CORS origin (repeatable; wildcard when omitted)
    #[arg(long = "allow-origin")]
    allow_origins: Vec<String>,

    /// Echo the uploaded image back as a base64 data URI
    #[arg(long)]
    echo_image: bool,

    /// Directory to save uploads into, for debugging
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    // Resolve the variant to serve
    let mut variant = match &cli.variant_config {
        Some(path) => VariantConfig::from_file(path)
            .with_context(|| format!("failed to load variant config from {}", path.display()))?,
        None => VariantConfig::preset(&cli.variant)?,
    };
    if let Some(weights) = &cli.weights {
        variant.weights_path = weights.clone();
    }
    variant.validate()?;

    let labels = match &cli.labels {
        Some(path) => LabelTable::from_file(path)
            .with_context(|| format!("failed to load label table from {}", path.display()))?,
        None => LabelTable::default_sketch(),
    };

    info!("Sketch Inference Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Variant:  {}", variant.name);
    info!("  Weights:  {}", variant.weights_path.display());
    info!("  Input:    {}", variant.input);
    info!("  Classes:  {}", labels.len());
    info!("  Top-K:    {}", variant.top_k);
    info!("  Quiz:     {}", variant.quiz_mode);
    info!("  Backend:  {}", backend_name());

    // Load the model once; failure here means the process must not serve
    let device = default_device();
    let model = load_model::<InferenceBackend>(&variant, labels.len(), &device)
        .context("failed to load model weights")?;
    let predictor = Predictor::new(model, labels, &variant, device)?;

    if let Some(dir) = &cli.upload_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create upload dir {}", dir.display()))?;
    }

    let options = ServeOptions {
        quiz_mode: variant.quiz_mode,
        echo_image: cli.echo_image,
        upload_dir: cli.upload_dir.clone(),
    };
    let shared = Arc::new(AppState::new(predictor, options));

    let cors = if cli.allow_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let mut origins = Vec::new();
        for origin in &cli.allow_origins {
            origins.push(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid CORS origin: {}", origin))?,
            );
        }
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Build router
    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/predict", post(routes::predict::predict))
        .with_state(shared)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
