//! Training module for the GAN
//!
//! This module provides:
//! - Training loop implementation
//! - Loss functions (Binary Cross Entropy)
//! - Training configuration and metrics

mod losses;
mod metrics;
mod trainer;

pub use losses::{discriminator_loss, discriminator_loss_smoothed, generator_loss};
pub use metrics::{EmaTracker, TrainingMetrics};
pub use trainer::{Trainer, TrainingConfig};
