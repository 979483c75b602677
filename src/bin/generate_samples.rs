//! Standalone binary for generating synthetic digit images
//!
//! Usage:
//!   cargo run --bin generate_samples -- --model checkpoints --num-samples 64

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tch::{Kind, Tensor};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rust_gan_mnist::{
    model::Gan,
    utils::{resolve_generator_path, save_image_grid},
};

/// Generate synthetic MNIST-like digits with a trained GAN
#[derive(Parser)]
#[command(name = "generate_samples")]
#[command(about = "Generate digit images using a trained GAN")]
struct Args {
    /// Path to checkpoint directory or generator weight file
    #[arg(short, long)]
    model: String,

    /// Number of images to generate
    #[arg(short, long, default_value = "64")]
    num_samples: i64,

    /// Latent dimension (must match training)
    #[arg(long, default_value = "64")]
    latent_dim: i64,

    /// Hidden layer width (must match training)
    #[arg(long, default_value = "1024")]
    hidden_dim: i64,

    /// Number of pixels per image (must match training)
    #[arg(long, default_value = "784")]
    image_dim: i64,

    /// Output image path
    #[arg(short, long, default_value = "fake_images.png")]
    output: String,

    /// Grid columns in the output image
    #[arg(long, default_value = "8")]
    cols: i64,

    /// Use GPU if available
    #[arg(long)]
    gpu: bool,

    /// Generate interpolations between random latent points instead
    #[arg(long)]
    interpolate: bool,

    /// Number of interpolation steps per row
    #[arg(long, default_value = "10")]
    interp_steps: i64,
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

    // Create model
    let mut model = Gan::with_defaults(args.latent_dim, args.hidden_dim, args.image_dim, device);

    // Load model weights
    let gen_path = resolve_generator_path(&args.model);
    let disc_path = gen_path.replace("generator", "discriminator");

    info!("Loading generator from {}", gen_path);
    model.load(&gen_path, &disc_path)?;

    // Generate samples
    let (samples, cols) = if args.interpolate {
        info!(
            "Generating {} interpolation rows with {} steps each",
            args.num_samples, args.interp_steps
        );

        let mut rows = Vec::new();
        for _ in 0..args.num_samples {
            let z1 = Tensor::randn([args.latent_dim], (Kind::Float, device));
            let z2 = Tensor::randn([args.latent_dim], (Kind::Float, device));
            rows.push(model.interpolate(&z1, &z2, args.interp_steps));
        }
        // One interpolation per grid row
        (Tensor::cat(&rows, 0), args.interp_steps)
    } else {
        info!("Generating {} random samples", args.num_samples);
        (model.generate(args.num_samples), args.cols)
    };

    info!("Generated {} images", samples.size()[0]);

    if let Some(parent) = Path::new(&args.output).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    save_image_grid(&samples, &args.output, cols)?;
    info!("Saved sample grid to {}", args.output);

    // Report discriminator scores on the generated batch
    let scores = model.discriminate(&samples);
    let mean_score: f64 = scores.mean(Kind::Float).double_value(&[]);
    info!("Mean discriminator score on samples: {:.4}", mean_score);

    Ok(())
}
