use anyhow::{Context, Result};
use clap::Parser;
use gallery_uploader::app::GalleryUploader;
use gallery_uploader::backup::GallerySpec;
use gallery_uploader::config::{get_config_path, load_config, load_or_init_config};
use log::info;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::path::PathBuf;

/// Queue images for upload to a photo gallery.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(long)]
    config: Option<PathBuf>,

    /// Server that image links are resolved against
    #[arg(long)]
    server: Option<String>,

    /// Backup gallery, as public-name!secret passphrase
    #[arg(long)]
    gallery: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Images or folders to queue at start
    images: Vec<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => get_config_path()?,
    };
    let mut config = if cli.config.is_some() {
        load_config(&config_path)?
    } else {
        load_or_init_config(&config_path)?
    };
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    let level = config.log_level_filter();
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    info!("Using config {}", config_path.display());

    let server = config.server()?;
    let gallery = cli
        .gallery
        .as_deref()
        .map(GallerySpec::parse)
        .transpose()
        .context("Invalid --gallery")?;
    let images = cli.images;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([420.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Gallery Uploader",
        options,
        Box::new(move |cc| {
            let mut app = GalleryUploader::new(cc, &config, server, gallery, None);
            app.add_files(&images);
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
