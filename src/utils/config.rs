//! Configuration management
//!
//! Provides unified configuration for the entire GAN pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data configuration
    pub data: DataConfig,
    /// Model configuration
    pub model: ModelConfig,
    /// Training configuration
    pub training: TrainingConfigFile,
}

/// Data-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the unpacked IDX files
    pub data_dir: String,
    /// Split to train on: "train" or "t10k"
    pub split: String,
    /// Batch size
    pub batch_size: usize,
}

/// Model-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Latent dimension size
    pub latent_dim: i64,
    /// Width of the hidden layers in both networks
    pub hidden_dim: i64,
    /// Number of pixels per flattened image (28x28 = 784)
    pub image_dim: i64,
}

/// Training-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfigFile {
    /// Number of epochs
    pub epochs: usize,
    /// Generator learning rate
    pub gen_lr: f64,
    /// Discriminator learning rate
    pub disc_lr: f64,
    /// Adam weight decay for both optimizers
    pub weight_decay: f64,
    /// Discriminator steps per generator step
    pub disc_steps: usize,
    /// Log a step line every N batches
    pub log_every: usize,
    /// Save a sample grid every N epochs
    pub sample_every: usize,
    /// Sample-image output directory
    pub sample_dir: String,
    /// Checkpoint save frequency
    pub checkpoint_every: usize,
    /// Checkpoint directory
    pub checkpoint_dir: String,
    /// Use label smoothing
    pub label_smoothing: bool,
    /// Device: "cpu" or "cuda"
    pub device: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                data_dir: "data/mnist".to_string(),
                split: "train".to_string(),
                batch_size: 64,
            },
            model: ModelConfig {
                latent_dim: 64,
                hidden_dim: 1024,
                image_dim: 784,
            },
            training: TrainingConfigFile {
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
                device: "cpu".to_string(),
            },
        }
    }
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_toml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_toml(&self, path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from JSON file
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn save_json(&self, path: &str) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from a path, picking the format by extension
    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        if path.ends_with(".toml") {
            Self::from_toml(path)
        } else {
            Self::from_json(path)
        }
    }

    /// Get device from configuration
    pub fn get_device(&self) -> tch::Device {
        match self.training.device.to_lowercase().as_str() {
            "cuda" | "gpu" => {
                if tch::Cuda::is_available() {
                    tch::Device::Cuda(0)
                } else {
                    tracing::warn!("CUDA requested but not available, falling back to CPU");
                    tch::Device::Cpu
                }
            }
            _ => tch::Device::Cpu,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.data.batch_size == 0 {
            anyhow::bail!("Batch size must be > 0");
        }
        if self.model.latent_dim <= 0 {
            anyhow::bail!("Latent dimension must be > 0");
        }
        if self.model.hidden_dim <= 0 {
            anyhow::bail!("Hidden dimension must be > 0");
        }
        if self.model.image_dim <= 0 {
            anyhow::bail!("Image dimension must be > 0");
        }
        if self.training.epochs == 0 {
            anyhow::bail!("Number of epochs must be > 0");
        }
        if self.training.sample_every == 0 {
            anyhow::bail!("Sample interval must be > 0");
        }
        if self.training.checkpoint_every == 0 {
            anyhow::bail!("Checkpoint interval must be > 0");
        }
        Ok(())
    }
}

/// Create default configuration file if it doesn't exist
pub fn ensure_config_exists(path: &str) -> anyhow::Result<Config> {
    if Path::new(path).exists() {
        Config::from_path(path)
    } else {
        let config = Config::default();
        if path.ends_with(".toml") {
            config.save_toml(path)?;
        } else {
            config.save_json(path)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.data.split, "train");
        assert_eq!(config.model.latent_dim, 64);
        assert_eq!(config.model.hidden_dim, 1024);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let loaded: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.data.data_dir, loaded.data.data_dir);
        assert_eq!(config.model.latent_dim, loaded.model.latent_dim);
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap();

        let config = Config::default();
        config.save_toml(path_str).unwrap();

        let loaded = Config::from_path(path_str).unwrap();
        assert_eq!(config.training.epochs, loaded.training.epochs);
        assert_eq!(config.training.sample_dir, loaded.training.sample_dir);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.data.batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ensure_config_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path_str = path.to_str().unwrap();

        let created = ensure_config_exists(path_str).unwrap();
        assert!(path.exists());
        assert_eq!(created.data.batch_size, 64);
    }
}
