//! Training loop implementation for the GAN
//!
//! Provides the main training loop with proper alternating updates
//! for generator and discriminator.

use indicatif::{ProgressBar, ProgressStyle};
use ndarray::Array2;
use tch::{nn::Module, Device, Kind, Tensor};
use tracing::{info, warn};

use super::losses::{discriminator_loss, discriminator_loss_smoothed, generator_loss};
use super::metrics::{EmaTracker, TrainingMetrics};
use crate::data::DataLoader;
use crate::model::Gan;
use crate::utils::{save_checkpoint, save_image_grid};

/// Number of images in a persisted sample grid (8x8)
const SAMPLE_GRID_COUNT: i64 = 64;
/// Columns in a persisted sample grid
const SAMPLE_GRID_COLS: i64 = 8;

/// Training configuration
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Number of training epochs
    pub epochs: usize,
    /// Learning rate for generator
    pub gen_lr: f64,
    /// Learning rate for discriminator
    pub disc_lr: f64,
    /// Adam weight decay for both optimizers
    pub weight_decay: f64,
    /// Number of discriminator updates per generator update
    pub disc_steps: usize,
    /// Log a step line every N batches
    pub log_every: usize,
    /// Save a sample-image grid every N epochs
    pub sample_every: usize,
    /// Directory to save sample grids
    pub sample_dir: String,
    /// Save checkpoint every N epochs
    pub checkpoint_every: usize,
    /// Directory to save checkpoints
    pub checkpoint_dir: String,
    /// Whether to use label smoothing
    pub label_smoothing: bool,
    /// Smooth label for real images (e.g., 0.9)
    pub smooth_real: f64,
    /// Smooth label for fake images (e.g., 0.1)
    pub smooth_fake: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 100,
            gen_lr: 1e-4,
            disc_lr: 1e-4,
            weight_decay: 1e-5,
            disc_steps: 1,
            log_every: 200,
            sample_every: 5,
            sample_dir: "samples".to_string(),
            checkpoint_every: 10,
            checkpoint_dir: "checkpoints".to_string(),
            label_smoothing: false,
            smooth_real: 0.9,
            smooth_fake: 0.1,
        }
    }
}

/// GAN Trainer
pub struct Trainer {
    config: TrainingConfig,
    device: Device,
    metrics: TrainingMetrics,
}

impl Trainer {
    /// Create a new trainer
    pub fn new(config: TrainingConfig, device: Device) -> Self {
        Self {
            config,
            device,
            metrics: TrainingMetrics::new(),
        }
    }

    /// Train the GAN model
    ///
    /// # Arguments
    ///
    /// * `model` - GAN model to train
    /// * `data_loader` - DataLoader providing batches of normalized images
    ///
    /// # Returns
    ///
    /// Training metrics
    pub fn train(&mut self, model: &mut Gan, data_loader: &mut DataLoader) -> &TrainingMetrics {
        let mut gen_opt = model.gen_optimizer(self.config.gen_lr, self.config.weight_decay);
        let mut disc_opt = model.disc_optimizer(self.config.disc_lr, self.config.weight_decay);

        let latent_dim = model.latent_dim();
        let num_batches = data_loader.num_batches();

        info!(
            "Starting training for {} epochs, {} batches per epoch",
            self.config.epochs, num_batches
        );

        std::fs::create_dir_all(&self.config.checkpoint_dir).ok();
        std::fs::create_dir_all(&self.config.sample_dir).ok();

        // Smoothed losses for the progress bar readout
        let mut gen_ema = EmaTracker::new(0.1);
        let mut disc_ema = EmaTracker::new(0.1);

        let mut saved_real_grid = false;

        for epoch in 0..self.config.epochs {
            let mut epoch_gen_loss = 0.0;
            let mut epoch_disc_loss = 0.0;
            let mut epoch_real_score = 0.0;
            let mut epoch_fake_score = 0.0;
            let mut batch_count = 0;

            // Progress bar for epoch
            let pb = ProgressBar::new(num_batches as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("##-"),
            );

            // Iterate over batches
            for real_batch in data_loader.iter() {
                let batch_size = real_batch.shape()[0] as i64;
                let real_data = batch_to_tensor(&real_batch, self.device);

                // Persist one grid of real images for visual reference
                if !saved_real_grid {
                    let path = format!("{}/real_images.png", self.config.sample_dir);
                    if let Err(e) = save_image_grid(&real_data, &path, SAMPLE_GRID_COLS) {
                        warn!("Failed to save real image grid: {}", e);
                    }
                    saved_real_grid = true;
                }

                let mut last_real_score = 0.0;
                let mut last_fake_score = 0.0;
                let mut last_disc_loss = 0.0;

                // ========== Train Discriminator ==========
                for _ in 0..self.config.disc_steps {
                    // Generate fake images
                    let noise = Tensor::randn([batch_size, latent_dim], (Kind::Float, self.device));
                    let fake_data = model.generator.forward(&noise);

                    // Discriminator predictions
                    let real_output = model.discriminator.forward(&real_data);
                    let fake_output = model.discriminator.forward(&fake_data.detach());

                    // Calculate discriminator loss
                    let d_loss = if self.config.label_smoothing {
                        discriminator_loss_smoothed(
                            &real_output,
                            &fake_output,
                            self.config.smooth_real,
                            self.config.smooth_fake,
                        )
                    } else {
                        discriminator_loss(&real_output, &fake_output)
                    };

                    // Update discriminator
                    disc_opt.zero_grad();
                    d_loss.backward();
                    disc_opt.step();

                    last_disc_loss = d_loss.double_value(&[]);
                    epoch_disc_loss += last_disc_loss;

                    // Mean D(x) and D(G(z)) as the run-health signal
                    last_real_score = real_output.sigmoid().mean(Kind::Float).double_value(&[]);
                    last_fake_score = fake_output.sigmoid().mean(Kind::Float).double_value(&[]);
                    epoch_real_score += last_real_score;
                    epoch_fake_score += last_fake_score;
                }

                // ========== Train Generator ==========
                let noise = Tensor::randn([batch_size, latent_dim], (Kind::Float, self.device));
                let fake_data = model.generator.forward(&noise);
                let fake_output = model.discriminator.forward(&fake_data);

                let g_loss = generator_loss(&fake_output);

                gen_opt.zero_grad();
                g_loss.backward();
                gen_opt.step();

                let g_loss_val = g_loss.double_value(&[]);
                epoch_gen_loss += g_loss_val;
                batch_count += 1;

                gen_ema.update(g_loss_val);
                disc_ema.update(last_disc_loss);

                if batch_count % self.config.log_every == 0 {
                    info!(
                        "Epoch [{}/{}], Step [{}/{}], d_loss: {:.4}, g_loss: {:.4}, D(x): {:.2}, D(G(z)): {:.2}",
                        epoch + 1,
                        self.config.epochs,
                        batch_count,
                        num_batches,
                        last_disc_loss,
                        g_loss_val,
                        last_real_score,
                        last_fake_score
                    );
                }

                pb.set_message(format!("G: {:.4}, D: {:.4}", gen_ema.value(), disc_ema.value()));
                pb.inc(1);
            }

            pb.finish_with_message("done");

            // Calculate epoch averages
            let total_disc_updates = (batch_count * self.config.disc_steps) as f64;
            let avg_gen_loss = epoch_gen_loss / batch_count as f64;
            let avg_disc_loss = epoch_disc_loss / total_disc_updates;
            let avg_real_score = epoch_real_score / total_disc_updates;
            let avg_fake_score = epoch_fake_score / total_disc_updates;

            // Record metrics
            self.metrics
                .record_epoch(avg_gen_loss, avg_disc_loss, avg_real_score, avg_fake_score);

            info!(
                "Epoch {}/{}: G_loss={:.4}, D_loss={:.4}, D(x)={:.2}, D(G(z))={:.2}",
                epoch + 1,
                self.config.epochs,
                avg_gen_loss,
                avg_disc_loss,
                avg_real_score,
                avg_fake_score
            );

            // Check for mode collapse
            if self.metrics.check_mode_collapse(10) {
                warn!("Possible mode collapse detected! Consider adjusting learning rates.");
            }

            // Save sample grid
            if (epoch + 1) % self.config.sample_every == 0 {
                let samples = model.generate(SAMPLE_GRID_COUNT);
                let path = format!("{}/fake_images-{}.png", self.config.sample_dir, epoch + 1);
                match save_image_grid(&samples, &path, SAMPLE_GRID_COLS) {
                    Ok(()) => info!("Saved sample grid to {}", path),
                    Err(e) => warn!("Failed to save sample grid: {}", e),
                }
            }

            // Save checkpoint
            if (epoch + 1) % self.config.checkpoint_every == 0 {
                match save_checkpoint(model, &self.metrics, epoch + 1, &self.config.checkpoint_dir) {
                    Ok(dir) => info!("Saved checkpoint to {}", dir),
                    Err(e) => warn!("Failed to save checkpoint: {}", e),
                }
            }
        }

        // Save final model
        let gen_path = format!("{}/generator_final.pt", self.config.checkpoint_dir);
        let disc_path = format!("{}/discriminator_final.pt", self.config.checkpoint_dir);
        if let Err(e) = model.save(&gen_path, &disc_path) {
            warn!("Failed to save final model: {}", e);
        }

        // Save metrics
        let metrics_path = format!("{}/training_metrics.csv", self.config.checkpoint_dir);
        if let Err(e) = self.metrics.save_csv(&metrics_path) {
            warn!("Failed to save metrics: {}", e);
        }

        &self.metrics
    }

    /// Get training metrics
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    /// Get configuration
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }
}

/// Copy an (batch, image_dim) ndarray batch onto the training device
fn batch_to_tensor(batch: &Array2<f32>, device: Device) -> Tensor {
    let (rows, cols) = batch.dim();
    let flat: Vec<f32> = batch.iter().copied().collect();
    Tensor::from_slice(&flat)
        .view([rows as i64, cols as i64])
        .to_device(device)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_config_default() {
        let config = TrainingConfig::default();
        assert_eq!(config.epochs, 100);
        assert_eq!(config.disc_steps, 1);
        assert_eq!(config.log_every, 200);
        assert_eq!(config.sample_every, 5);
    }

    #[test]
    fn test_batch_to_tensor_shape() {
        let batch = Array2::<f32>::zeros((4, 784));
        let tensor = batch_to_tensor(&batch, Device::Cpu);
        assert_eq!(tensor.size(), vec![4, 784]);
    }
}
