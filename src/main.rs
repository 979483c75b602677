//! GAN for MNIST Handwritten Digit Generation
//!
//! Main entry point providing CLI interface for:
//! - Fetching the MNIST dataset
//! - Training the GAN
//! - Generating sample-image grids

use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use rust_gan_mnist::{
    data::{normalize_images, DataLoader, MnistDataset, MnistFetcher},
    model::Gan,
    training::{Trainer, TrainingConfig},
    utils::{find_latest_checkpoint, load_checkpoint, resolve_generator_path, save_image_grid, Config},
};

/// GAN for MNIST-like image generation
#[derive(Parser)]
#[command(name = "gan_mnist")]
#[command(version = "0.1.0")]
#[command(about = "Train a GAN on MNIST digits and generate synthetic samples")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and unpack the MNIST dataset
    Fetch {
        /// Directory to store the unpacked IDX files
        #[arg(short, long, default_value = "data/mnist")]
        data_dir: String,

        /// Mirror base URL to download from
        #[arg(short, long)]
        mirror: Option<String>,

        /// Re-download files that are already present
        #[arg(long)]
        force: bool,
    },

    /// Train the GAN model
    Train {
        /// Directory holding the unpacked IDX files (defaults to config)
        #[arg(short, long)]
        data_dir: Option<String>,

        /// Number of epochs (defaults to config)
        #[arg(short, long)]
        epochs: Option<usize>,

        /// Resume from a checkpoint directory, or "latest" for the newest one
        #[arg(long)]
        resume: Option<String>,
    },

    /// Generate a grid of synthetic digit images
    Generate {
        /// Path to trained model checkpoint directory or generator weight file
        #[arg(short, long)]
        model: String,

        /// Number of images to generate
        #[arg(short, long, default_value = "64")]
        num_samples: i64,

        /// Output image path
        #[arg(short, long, default_value = "fake_images.png")]
        output: String,
    },

    /// Initialize default configuration file
    Init {
        /// Output configuration file path
        #[arg(short, long, default_value = "config.toml")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = match cli.verbosity.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Fetch {
            data_dir,
            mirror,
            force,
        } => {
            fetch_data(&data_dir, mirror.as_deref(), force).await?;
        }
        Commands::Train {
            data_dir,
            epochs,
            resume,
        } => {
            train_model(&cli.config, data_dir, epochs, resume)?;
        }
        Commands::Generate {
            model,
            num_samples,
            output,
        } => {
            generate_samples(&cli.config, &model, num_samples, &output)?;
        }
        Commands::Init { output } => {
            init_config(&output)?;
        }
    }

    Ok(())
}

/// Download and unpack the MNIST archives
async fn fetch_data(data_dir: &str, mirror: Option<&str>, force: bool) -> Result<()> {
    let fetcher = match mirror {
        Some(url) => MnistFetcher::with_base_url(url),
        None => MnistFetcher::new(),
    };

    let downloaded = fetcher.fetch_all(Path::new(data_dir), force).await?;
    info!("Downloaded {} file(s) into {}", downloaded, data_dir);

    Ok(())
}

/// Train the GAN model
fn train_model(
    config_path: &str,
    data_dir: Option<String>,
    epochs: Option<usize>,
    resume: Option<String>,
) -> Result<()> {
    // Load configuration
    let config = if Path::new(config_path).exists() {
        Config::from_path(config_path)?
    } else {
        info!("Config file not found, using defaults");
        Config::default()
    };
    config.validate()?;

    // Determine device
    let device = config.get_device();
    info!("Using device: {:?}", device);

    // Load and preprocess data
    let data_dir = data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    info!("Loading MNIST split '{}' from {}", config.data.split, data_dir);
    let dataset = MnistDataset::load_dir(Path::new(&data_dir), &config.data.split)?;

    info!(
        "Loaded {} images of {}x{} pixels",
        dataset.len(),
        dataset.images.rows,
        dataset.images.cols
    );

    let features = dataset.to_feature_matrix();
    if features.ncols() as i64 != config.model.image_dim {
        anyhow::bail!(
            "Dataset images have {} pixels but the model expects {}",
            features.ncols(),
            config.model.image_dim
        );
    }

    if features.nrows() < config.data.batch_size {
        anyhow::bail!(
            "Not enough images ({}) for batch size ({})",
            features.nrows(),
            config.data.batch_size
        );
    }

    // Scale pixels into the generator's tanh range
    let normalized = normalize_images(&features);

    // Create data loader
    let mut data_loader = DataLoader::new(
        normalized,
        config.data.batch_size,
        true, // shuffle
        true, // drop_last
    );

    // Create model
    let mut model = Gan::with_defaults(
        config.model.latent_dim,
        config.model.hidden_dim,
        config.model.image_dim,
        device,
    );

    // Resume from checkpoint if specified
    if let Some(checkpoint_path) = resume {
        let checkpoint_path = if checkpoint_path == "latest" {
            find_latest_checkpoint(&config.training.checkpoint_dir).ok_or_else(|| {
                anyhow!("No checkpoint found in {}", config.training.checkpoint_dir)
            })?
        } else {
            checkpoint_path
        };
        let (epoch, _metrics) = load_checkpoint(&mut model, &checkpoint_path)?;
        info!("Resumed from epoch {}", epoch);
    }

    // Create trainer
    let training_config = TrainingConfig {
        epochs: epochs.unwrap_or(config.training.epochs),
        gen_lr: config.training.gen_lr,
        disc_lr: config.training.disc_lr,
        weight_decay: config.training.weight_decay,
        disc_steps: config.training.disc_steps,
        log_every: config.training.log_every,
        sample_every: config.training.sample_every,
        sample_dir: config.training.sample_dir.clone(),
        checkpoint_every: config.training.checkpoint_every,
        checkpoint_dir: config.training.checkpoint_dir.clone(),
        label_smoothing: config.training.label_smoothing,
        ..Default::default()
    };

    let mut trainer = Trainer::new(training_config, device);

    // Train
    let metrics = trainer.train(&mut model, &mut data_loader);

    info!(
        "Training complete. Final G_loss: {:.4}, D_loss: {:.4}",
        metrics.latest_gen_loss().unwrap_or(0.0),
        metrics.latest_disc_loss().unwrap_or(0.0)
    );

    Ok(())
}

/// Generate a grid of synthetic digits
fn generate_samples(
    config_path: &str,
    model_path: &str,
    num_samples: i64,
    output_path: &str,
) -> Result<()> {
    // Load configuration
    let config = if Path::new(config_path).exists() {
        Config::from_path(config_path)?
    } else {
        Config::default()
    };

    let device = config.get_device();

    // Create model
    let mut model = Gan::with_defaults(
        config.model.latent_dim,
        config.model.hidden_dim,
        config.model.image_dim,
        device,
    );

    // Load checkpoint
    let gen_path = resolve_generator_path(model_path);
    let disc_path = gen_path.replace("generator", "discriminator");

    info!("Loading generator from {}", gen_path);
    model.load(&gen_path, &disc_path)?;

    // Generate samples
    info!("Generating {} synthetic digits", num_samples);
    let samples = model.generate(num_samples);

    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    save_image_grid(&samples, output_path, 8)?;
    info!("Saved sample grid to {}", output_path);

    Ok(())
}

/// Initialize default configuration file
fn init_config(output_path: &str) -> Result<()> {
    let config = Config::default();

    if output_path.ends_with(".toml") {
        config.save_toml(output_path)?;
    } else {
        config.save_json(output_path)?;
    }

    info!("Created default configuration at {}", output_path);
    Ok(())
}
