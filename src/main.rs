use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use eink_proxy::api;
use eink_proxy::models::{AppConfig, OutputKind};
use eink_proxy::server;

#[derive(Parser)]
#[command(name = "eink-proxy")]
#[command(about = "Turns dashboard screenshots into seven-colour e-ink images", version)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Fetch the upstream once and write the converted PNG to a file
    Render {
        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Rendering mode: true, false or regional
        #[arg(short, long)]
        dither: Option<String>,

        /// Absolute URL to fetch instead of SOURCE_URL
        #[arg(short, long)]
        source: Option<String>,

        /// Write the segmentation overlay instead of the panel image
        #[arg(long)]
        masks: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "eink-proxy API",
        description = "Image-transcoding sidecar for seven-colour e-ink panels",
        license(name = "MIT")
    ),
    paths(
        api::handle_eink_image,
        api::handle_raw,
        api::handle_debug_masks,
        api::handle_health,
        api::handle_index,
    ),
    components(schemas(api::HealthResponse)),
    tags(
        (name = "Images", description = "Converted and raw upstream images"),
        (name = "Debug", description = "Segmentation diagnostics"),
        (name = "Status", description = "Health and index pages")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Arc::new(cli.config);

    match cli.command {
        Some(Commands::Serve) => run_server(config).await,
        Some(Commands::Render {
            output,
            dither,
            source,
            masks,
        }) => run_render_command(config, &output, dither, source, masks).await,
        None => {
            run_status_command(&config);
            Ok(())
        }
    }
}

/// Run the HTTP server
async fn run_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eink_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = config.server.bind_addr.clone();
    let state = server::create_app_state(config)?;

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "eink-proxy listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Fetch and convert once, no server needed
async fn run_render_command(
    config: Arc<AppConfig>,
    output: &Path,
    dither: Option<String>,
    source: Option<String>,
    masks: bool,
) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eink_proxy=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let state = server::create_app_state(config)?;

    let mut params = Vec::new();
    if let Some(dither) = dither {
        params.push(("dither".to_string(), dither));
    }
    if let Some(source) = source {
        params.push(("source".to_string(), source));
    }
    let kind = if masks {
        OutputKind::Masks
    } else {
        OutputKind::Eink
    };

    let result = state
        .pipeline
        .serve(&params, kind)
        .await
        .map_err(|e| anyhow::anyhow!("{}", eink_proxy::error::ApiError::from(e)))?;

    std::fs::write(output, &result.image.body)?;
    println!(
        "Rendered {}x{} ({} bytes) -> {}",
        result.image.width,
        result.image.height,
        result.image.body.len(),
        output.display()
    );
    Ok(())
}

/// Display status and configuration information
fn run_status_command(config: &AppConfig) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("eink-proxy v{VERSION}");
    println!("Seven-colour e-ink transcoding sidecar\n");

    println!("Configuration (flags or environment):");
    let rows = [
        ("BIND_ADDR", config.server.bind_addr.clone()),
        ("SOURCE_URL", config.upstream.source_url.clone()),
        ("SOURCE_TIMEOUT", config.upstream.source_timeout.to_string()),
        ("SOURCE_RETRIES", config.upstream.source_retries.to_string()),
        ("CACHE_TTL", config.cache.cache_ttl.to_string()),
        ("CACHE_MAX_ENTRIES", config.cache.cache_max_entries.to_string()),
        ("RENDER_WORKERS", config.cache.workers().to_string()),
        ("PHOTO_MODE", config.render.photo_mode.to_string()),
        ("SKY_GRAD_THR", config.render.sky_gradient_threshold.to_string()),
        ("SMOOTH_STRENGTH", config.render.smooth_strength.to_string()),
        ("EDGE_THR", config.render.edge_threshold.to_string()),
        ("UI_PALETTE_THR", config.render.ui_palette_threshold.to_string()),
        ("CONTRAST", config.render.contrast.to_string()),
        ("SATURATION", config.render.saturation.to_string()),
        ("GAMMA", config.render.gamma.to_string()),
    ];
    for (name, value) in rows {
        println!("  {name:<18} = {value}");
    }

    match config.validate() {
        Ok(()) => println!("\nConfiguration is valid."),
        Err(e) => println!("\nConfiguration error: {e}"),
    }

    println!("\nUsage:");
    println!("  eink-proxy serve                     Start the HTTP server");
    println!("  eink-proxy render --output FILE      Render once to a PNG file");
    println!("  eink-proxy --help                    Show all options");
}
