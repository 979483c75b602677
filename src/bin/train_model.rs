//! Standalone binary for training the GAN
//!
//! Usage:
//!   cargo run --bin train_model -- --data-dir data/mnist --epochs 100

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rust_gan_mnist::{
    data::{normalize_images, DataLoader, MnistDataset},
    model::Gan,
    training::{Trainer, TrainingConfig},
    utils::{find_latest_checkpoint, load_checkpoint},
};

/// Train the GAN on MNIST digits
#[derive(Parser)]
#[command(name = "train_model")]
#[command(about = "Train a GAN on MNIST digit images")]
struct Args {
    /// Directory holding the unpacked IDX files
    #[arg(short, long, default_value = "data/mnist")]
    data_dir: String,

    /// Split to train on ("train" or "t10k")
    #[arg(long, default_value = "train")]
    split: String,

    /// Number of training epochs
    #[arg(short, long, default_value = "100")]
    epochs: usize,

    /// Batch size
    #[arg(short, long, default_value = "64")]
    batch_size: usize,

    /// Latent dimension size
    #[arg(long, default_value = "64")]
    latent_dim: i64,

    /// Hidden layer width
    #[arg(long, default_value = "1024")]
    hidden_dim: i64,

    /// Generator learning rate
    #[arg(long, default_value = "0.0001")]
    gen_lr: f64,

    /// Discriminator learning rate
    #[arg(long, default_value = "0.0001")]
    disc_lr: f64,

    /// Adam weight decay
    #[arg(long, default_value = "0.00001")]
    weight_decay: f64,

    /// Save a sample grid every N epochs
    #[arg(long, default_value = "5")]
    sample_every: usize,

    /// Sample-image output directory
    #[arg(long, default_value = "samples")]
    sample_dir: String,

    /// Checkpoint directory
    #[arg(long, default_value = "checkpoints")]
    checkpoint_dir: String,

    /// Save checkpoint every N epochs
    #[arg(long, default_value = "10")]
    checkpoint_every: usize,

    /// Resume from a checkpoint directory, or "latest" for the newest one
    #[arg(long)]
    resume: Option<String>,

    /// Use GPU if available
    #[arg(long)]
    gpu: bool,
}

fn main() -> Result<()> {
    // Setup logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    // Determine device
    let device = if args.gpu && tch::Cuda::is_available() {
        info!("Using CUDA GPU");
        tch::Device::Cuda(0)
    } else {
        info!("Using CPU");
        tch::Device::Cpu
    };

    // Load data
    info!("Loading MNIST split '{}' from {}", args.split, args.data_dir);
    let dataset = MnistDataset::load_dir(Path::new(&args.data_dir), &args.split)?;
    info!(
        "Loaded {} images of {}x{} pixels",
        dataset.len(),
        dataset.images.rows,
        dataset.images.cols
    );

    let features = dataset.to_feature_matrix();
    let image_dim = features.ncols() as i64;

    if features.nrows() < args.batch_size {
        anyhow::bail!(
            "Not enough images ({}) for batch size ({})",
            features.nrows(),
            args.batch_size
        );
    }

    // Scale pixels into the generator's tanh range
    info!("Normalizing pixels to [-1, 1] range");
    let normalized = normalize_images(&features);

    // Create data loader
    let mut data_loader = DataLoader::new(normalized, args.batch_size, true, true);

    info!(
        "DataLoader: {} batches of size {}",
        data_loader.num_batches(),
        args.batch_size
    );

    // Create model
    let mut model = Gan::with_defaults(args.latent_dim, args.hidden_dim, image_dim, device);

    info!(
        "Created GAN: latent_dim={}, hidden_dim={}, image_dim={}",
        args.latent_dim, args.hidden_dim, image_dim
    );

    // Resume from checkpoint if specified
    if let Some(checkpoint_path) = &args.resume {
        let checkpoint_path = if checkpoint_path == "latest" {
            find_latest_checkpoint(&args.checkpoint_dir).ok_or_else(|| {
                anyhow::anyhow!("No checkpoint found in {}", args.checkpoint_dir)
            })?
        } else {
            checkpoint_path.clone()
        };
        info!("Resuming from checkpoint: {}", checkpoint_path);
        let (epoch, metrics) = load_checkpoint(&mut model, &checkpoint_path)?;
        info!(
            "Resumed from epoch {} (G_loss: {:.4}, D_loss: {:.4})",
            epoch,
            metrics.latest_gen_loss().unwrap_or(0.0),
            metrics.latest_disc_loss().unwrap_or(0.0)
        );
    }

    // Create training config
    let training_config = TrainingConfig {
        epochs: args.epochs,
        gen_lr: args.gen_lr,
        disc_lr: args.disc_lr,
        weight_decay: args.weight_decay,
        sample_every: args.sample_every,
        sample_dir: args.sample_dir.clone(),
        checkpoint_every: args.checkpoint_every,
        checkpoint_dir: args.checkpoint_dir.clone(),
        ..Default::default()
    };

    // Create trainer
    let mut trainer = Trainer::new(training_config, device);

    // Train
    info!("Starting training for {} epochs", args.epochs);
    info!("  Generator LR: {}", args.gen_lr);
    info!("  Discriminator LR: {}", args.disc_lr);
    info!("  Weight decay: {}", args.weight_decay);

    let metrics = trainer.train(&mut model, &mut data_loader);

    // Print final results
    info!("Training complete!");
    info!(
        "Final metrics: G_loss={:.4}, D_loss={:.4}",
        metrics.latest_gen_loss().unwrap_or(0.0),
        metrics.latest_disc_loss().unwrap_or(0.0)
    );
    info!("Model saved to {}/generator_final.pt", args.checkpoint_dir);

    Ok(())
}
