use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use reel_compositor::{
    composition::{CompositionEngine, LayoutMode, PageContent, RenderRequest},
    config::Config,
    effects::EffectRegistry,
};

#[derive(Parser)]
#[command(
    name = "reel-compositor",
    version,
    about = "Turn a handful of images into an animated vertical promo video",
    long_about = "Reel-Compositor lays each image out on a card with a title and summary, \
                  animates it in with a randomized entrance, overlays an optional particle \
                  effect and muxes the result with background music."
)]
struct Cli {
    /// Images (JPEG, PNG) or directories of pre-extracted frames, in order
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Title text; "main|subtitle" renders a two-line title
    #[arg(short, long, default_value = "")]
    title: String,

    /// Summary shown at the bottom of the card
    #[arg(short, long, default_value = "")]
    summary: String,

    /// Background template image
    #[arg(short, long)]
    background: Option<PathBuf>,

    /// Background music (WAV, MP3, FLAC, OGG, M4A)
    #[arg(short, long)]
    audio: Option<PathBuf>,

    /// Particle effect (none, sparkle, snowfall, bokeh, firefly, bubble)
    #[arg(short, long)]
    effect: Option<String>,

    /// Page layout (article, showcase)
    #[arg(short, long)]
    layout: Option<LayoutMode>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output video file path
    #[arg(short, long, default_value = "output.mp4")]
    output: PathBuf,

    /// Seed for the entrance animation shuffle
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting Reel-Compositor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    if let Some(background) = cli.background {
        config.render.background = Some(background);
    }
    if let Some(layout) = cli.layout {
        config.timeline.layout = layout;
    }
    if let Some(seed) = cli.seed {
        config.timeline.shuffle_seed = Some(seed);
    }

    let effect = cli.effect.unwrap_or_else(|| config.effect.name.clone());
    let registry = EffectRegistry::new();
    if !registry.is_known(&effect) {
        anyhow::bail!(
            "Unknown effect: {} (available: none, {})",
            effect,
            registry.available_effects().join(", ")
        );
    }

    let request = RenderRequest {
        sources: cli.sources,
        content: PageContent {
            title: cli.title,
            summary: cli.summary,
            effect,
        },
        audio: cli.audio,
        output: cli.output,
    };

    let mut engine = CompositionEngine::new(config)?;
    let summary = engine
        .compose(&request)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    info!(
        "{} segments, {} previews, {:.1}s -> {:?}",
        summary.segments,
        summary.previews.len(),
        summary.video.duration,
        summary.video.path
    );
    Ok(())
}
