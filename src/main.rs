use anyhow::{anyhow, Result};
use clap::{Arg, Command};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use reel_animator::{
    AnimationVibe, Config, EnvCredentials, GeminiVeoBackend, VideoGenerator, VideoRequest,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("reel_animator=info,warn")
        .init();

    let matches = Command::new("Reel Animator")
        .version("0.1.0")
        .about("Turn a product photo into a short vertical video ad")
        .arg(
            Arg::new("image")
                .short('i')
                .long("image")
                .value_name("FILE")
                .help("Source image to animate (JPG, PNG or WebP)")
                .required(true),
        )
        .arg(
            Arg::new("vibe")
                .long("vibe")
                .value_name("VIBE")
                .help("Animation vibe: cinematic, steamy, fast-zoom or neon")
                .default_value("cinematic"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Where to save the generated video")
                .default_value("./output.mp4"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to a reel-animator.toml configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let image_path = PathBuf::from(matches.get_one::<String>("image").unwrap());
    let output_path = PathBuf::from(matches.get_one::<String>("output").unwrap());
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let verbose = matches.get_flag("verbose");

    if verbose {
        info!("Verbose logging enabled");
    }

    let vibe_name = matches.get_one::<String>("vibe").unwrap();
    let vibe = AnimationVibe::parse(vibe_name)
        .ok_or_else(|| anyhow!("Unknown vibe: {}", vibe_name))?;

    // Load configuration
    let mut config = Config::load(config_path.as_deref()).unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });
    config.apply_env_overrides();
    config.validate()?;

    info!("🚀 Reel Animator starting...");
    info!("🖼️  Image: {}", image_path.display());
    info!("🎞️  Vibe: {}", vibe.phrase());
    info!("📂 Output: {}", output_path.display());

    let mime_type = mime_for_image(&image_path)?;
    let image_bytes = tokio::fs::read(&image_path).await?;
    let request = VideoRequest::new(image_bytes, mime_type, vibe);

    let backend = GeminiVeoBackend::new(config.generation.clone())?;
    let credentials = EnvCredentials::new(config.credentials.env_var.clone());
    let client = VideoGenerator::new(Arc::new(backend), Arc::new(credentials), &config.polling);

    // Ctrl-C abandons the in-flight job instead of leaking the poll loop.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling generation");
                cancel.cancel();
            }
        });
    }

    let start_time = std::time::Instant::now();
    let uri = client.generate_with_cancel(&request, &cancel).await?;
    info!("🎉 Generation completed in {:.1}s", start_time.elapsed().as_secs_f64());

    download_video(&uri, &output_path).await?;
    info!("💾 Video saved to: {}", output_path.display());

    Ok(())
}

/// Map an image file extension to the MIME type sent to the video API.
fn mime_for_image(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        other => Err(anyhow!("Unsupported image format: .{}", other)),
    }
}

/// Fetch the finished video from its authorized URI.
async fn download_video(uri: &str, output_path: &Path) -> Result<()> {
    info!("⬇️  Downloading video...");
    let response = reqwest::get(uri).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(output_path, &bytes).await?;
    Ok(())
}
