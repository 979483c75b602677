//! Generator network
//!
//! The Generator transforms random noise vectors into flattened digit
//! images. A stack of fully-connected layers maps latent space up to
//! pixel space, ending in tanh so outputs live in [-1, 1].

use tch::{nn, nn::Module, Device, Kind, Tensor};

/// Generator network configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Size of the latent noise vector
    pub latent_dim: i64,
    /// Width of the hidden layers
    pub hidden_dim: i64,
    /// Number of output pixels (28x28 = 784)
    pub image_dim: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            latent_dim: 64,
            hidden_dim: 1024,
            image_dim: 784,
        }
    }
}

/// Generator network
///
/// Architecture:
/// 1. Linear from latent space to hidden width, ReLU
/// 2. Linear hidden to hidden, ReLU
/// 3. Linear hidden to pixel space, Tanh
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    fc1: nn::Linear,
    fc2: nn::Linear,
    fc3: nn::Linear,
}

impl Generator {
    /// Create a new Generator network
    pub fn new(vs: &nn::Path, config: GeneratorConfig) -> Self {
        let fc1 = nn::linear(
            vs / "fc1",
            config.latent_dim,
            config.hidden_dim,
            Default::default(),
        );
        let fc2 = nn::linear(
            vs / "fc2",
            config.hidden_dim,
            config.hidden_dim,
            Default::default(),
        );
        let fc3 = nn::linear(
            vs / "fc3",
            config.hidden_dim,
            config.image_dim,
            Default::default(),
        );

        Self {
            config,
            fc1,
            fc2,
            fc3,
        }
    }

    /// Generate samples from noise
    ///
    /// # Arguments
    ///
    /// * `noise` - Tensor of shape (batch_size, latent_dim)
    ///
    /// # Returns
    ///
    /// Tensor of shape (batch_size, image_dim) with values in [-1, 1]
    pub fn generate(&self, noise: &Tensor) -> Tensor {
        self.forward(noise)
    }

    /// Generate samples from fresh standard-normal noise
    pub fn generate_random(&self, num_samples: i64, device: Device) -> Tensor {
        let noise = Tensor::randn([num_samples, self.config.latent_dim], (Kind::Float, device));
        self.generate(&noise)
    }

    /// Get configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }
}

impl Module for Generator {
    fn forward(&self, noise: &Tensor) -> Tensor {
        let x = self.fc1.forward(noise).relu();
        let x = self.fc2.forward(&x).relu();
        self.fc3.forward(&x).tanh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::nn::VarStore;

    #[test]
    fn test_generator_output_shape() {
        let vs = VarStore::new(Device::Cpu);
        let config = GeneratorConfig {
            latent_dim: 64,
            hidden_dim: 128,
            image_dim: 784,
        };
        let gen = Generator::new(&vs.root(), config);

        let noise = Tensor::randn([4, 64], (Kind::Float, Device::Cpu));
        let output = gen.generate(&noise);

        assert_eq!(output.size(), vec![4, 784]);
    }

    #[test]
    fn test_generator_output_range() {
        let vs = VarStore::new(Device::Cpu);
        let gen = Generator::new(&vs.root(), GeneratorConfig::default());

        let output = gen.generate_random(2, Device::Cpu);

        let min_val: f64 = output.min().double_value(&[]);
        let max_val: f64 = output.max().double_value(&[]);
        assert!(min_val >= -1.0 && max_val <= 1.0);
    }
}
