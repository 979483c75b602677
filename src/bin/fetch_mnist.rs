//! Standalone binary for downloading the MNIST dataset
//!
//! Usage:
//!   cargo run --bin fetch_mnist -- --data-dir data/mnist

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rust_gan_mnist::data::{MnistDataset, MnistFetcher};

/// Download and unpack the MNIST IDX archives
#[derive(Parser)]
#[command(name = "fetch_mnist")]
#[command(about = "Download the MNIST dataset")]
struct Args {
    /// Directory to store the unpacked IDX files
    #[arg(short, long, default_value = "data/mnist")]
    data_dir: String,

    /// Mirror base URL to download from
    #[arg(short, long)]
    mirror: Option<String>,

    /// Re-download files that are already present
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let fetcher = match args.mirror.as_deref() {
        Some(url) => MnistFetcher::with_base_url(url),
        None => MnistFetcher::new(),
    };

    let downloaded = fetcher.fetch_all(Path::new(&args.data_dir), args.force).await?;
    info!("Downloaded {} file(s) into {}", downloaded, args.data_dir);

    // Parse the training split as a sanity check
    let dataset = MnistDataset::load_dir(Path::new(&args.data_dir), "train")?;
    let hist = dataset.label_histogram();
    info!(
        "Training split: {} images of {}x{} pixels",
        dataset.len(),
        dataset.images.rows,
        dataset.images.cols
    );
    info!("Label histogram: {:?}", hist);

    Ok(())
}
