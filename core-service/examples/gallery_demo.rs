//! Gallery walkthrough against a real Cloudinary account
//!
//! Loads credentials from the environment, lists the gallery, uploads the
//! given image and prints the resulting gallery.
//!
//! Run with:
//! ```bash
//! export CLOUDINARY_CLOUD_NAME=... CLOUDINARY_API_KEY=... \
//!        CLOUDINARY_API_SECRET=... CLOUDINARY_UPLOAD_PRESET=...
//!
//! # List only
//! cargo run -p core-service --example gallery_demo
//!
//! # Upload a picture, then list
//! cargo run -p core-service --example gallery_demo -- ~/Pictures/cat.jpg
//!
//! # Delete an asset by public id
//! cargo run -p core-service --example gallery_demo -- --delete Home/cat
//! ```

use bridge_desktop::PathPicker;
use bridge_traits::log_sink::LogLevel;
use core_runtime::config::MediaStoreConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::{bootstrap_desktop, GalleryService};
use std::env;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Info),
    )
    .expect("Failed to initialize logging");

    let media_store = match MediaStoreConfig::from_env() {
        Ok(config) => config.with_folder("Home"),
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    let picker = Arc::new(PathPicker::new());
    let service =
        bootstrap_desktop(media_store, picker.clone()).expect("Failed to initialize gallery");

    // Surface user-facing messages the way a UI toast would
    let mut events = service.events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let Some(message) = event.user_message() {
                println!("[{}] {}", event.description(), message);
            }
        }
    });

    if let Err(e) = service.refresh().await {
        error!("Refresh failed: {}", e);
    }
    print_gallery(&service);

    match args.as_slice() {
        [flag, public_id] if flag == "--delete" => {
            if let Err(e) = service.delete(public_id).await {
                error!("Delete failed: {}", e);
            }
        }
        [path] => {
            picker.queue(path);
            match service.pick().await {
                Ok(pending) => info!(file = %pending.file_name(), "Selected"),
                Err(e) => {
                    error!("Pick failed: {}", e);
                    return;
                }
            }

            match service.upload().await {
                Ok(asset) => info!(public_id = %asset.public_id, url = %asset.url, "Uploaded"),
                Err(e) => error!("Upload failed: {}", e),
            }
        }
        _ => return,
    }

    print_gallery(&service);
}

fn print_gallery(service: &GalleryService) {
    let gallery = service.gallery();
    println!("Gallery ({} images):", gallery.len());
    for asset in gallery.iter() {
        println!("  {}  {}", asset.public_id, asset.url);
    }
}
