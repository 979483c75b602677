//! # Fully-Connected GAN for MNIST Images
//!
//! This crate provides a modular implementation of a generative adversarial
//! network (GAN) that learns to produce MNIST-like handwritten digit images.
//!
//! ## Modules
//!
//! - `data`: MNIST download, IDX parsing and batching
//! - `model`: GAN architecture (Generator and Discriminator)
//! - `training`: Training loop and loss functions
//! - `utils`: Configuration, checkpoints and sample-image grids

pub mod data;
pub mod model;
pub mod training;
pub mod utils;

pub use data::{DataLoader, MnistDataset, MnistFetcher, MnistImages};
pub use data::{denormalize_images, normalize_images};
pub use model::{Discriminator, Gan, Generator};
pub use training::{Trainer, TrainingConfig, TrainingMetrics};
pub use utils::{load_checkpoint, save_checkpoint, Config};
