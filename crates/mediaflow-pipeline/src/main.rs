//! Media pipeline driver binary.
//!
//! Creates a media item from a local file and drives it through the
//! processing pipeline, printing the resulting state.
//!
//! Usage: mediaflow-pipeline <owner_id> <file> [description]

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mediaflow_pipeline::{MediaService, PipelineConfig, ProcessingContext};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("mediaflow=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let mut args = std::env::args().skip(1);
    let (owner_id, file) = match (args.next(), args.next()) {
        (Some(owner), Some(file)) => (owner, file),
        _ => {
            eprintln!("Usage: mediaflow-pipeline <owner_id> <file> [description]");
            std::process::exit(2);
        }
    };
    let description = args.next();

    info!("Starting mediaflow-pipeline");

    let config = PipelineConfig::from_env();
    let ctx = match ProcessingContext::new(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to create processing context: {}", e);
            std::process::exit(1);
        }
    };
    let service = MediaService::new(ctx);

    let created = match service
        .create_media_item(&file, description, &owner_id)
        .await
    {
        Ok(created) => created,
        Err(e) => {
            error!("Media item creation failed: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "Created media item {} ({}s) at {}",
        created.id, created.duration_seconds, created.remote_url
    );

    // Runs to completion within this call; the transcription poll loop
    // dominates the latency
    if let Err(e) = service.process_media_item(&owner_id, &created.id).await {
        error!("Processing failed before the pipeline started: {}", e);
        std::process::exit(1);
    }

    match service.get_media_item(&owner_id, &created.id).await {
        Ok(detail) => match serde_json::to_string_pretty(&detail) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Could not serialize result: {}", e),
        },
        Err(e) => {
            error!("Could not fetch processed item: {}", e);
            std::process::exit(1);
        }
    }
}
