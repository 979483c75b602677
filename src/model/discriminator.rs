//! Discriminator network
//!
//! The Discriminator classifies flattened images as real or fake.
//! A stack of fully-connected layers with LeakyReLU maps pixel space
//! down to a single logit.

use tch::{nn, nn::Module, Tensor};

/// Discriminator network configuration
#[derive(Debug, Clone)]
pub struct DiscriminatorConfig {
    /// Number of input pixels (28x28 = 784)
    pub image_dim: i64,
    /// Width of the hidden layers
    pub hidden_dim: i64,
    /// Negative slope of the LeakyReLU activations
    pub leaky_slope: f64,
}

impl Default for DiscriminatorConfig {
    fn default() -> Self {
        Self {
            image_dim: 784,
            hidden_dim: 1024,
            leaky_slope: 0.2,
        }
    }
}

/// Discriminator network
///
/// Architecture:
/// 1. Linear from pixel space to hidden width, LeakyReLU(0.2)
/// 2. Linear hidden to hidden, LeakyReLU(0.2)
/// 3. Linear hidden to a single logit (not sigmoid)
#[derive(Debug)]
pub struct Discriminator {
    config: DiscriminatorConfig,
    fc1: nn::Linear,
    fc2: nn::Linear,
    fc3: nn::Linear,
}

impl Discriminator {
    /// Create a new Discriminator network
    pub fn new(vs: &nn::Path, config: DiscriminatorConfig) -> Self {
        let fc1 = nn::linear(
            vs / "fc1",
            config.image_dim,
            config.hidden_dim,
            Default::default(),
        );
        let fc2 = nn::linear(
            vs / "fc2",
            config.hidden_dim,
            config.hidden_dim,
            Default::default(),
        );
        let fc3 = nn::linear(vs / "fc3", config.hidden_dim, 1, Default::default());

        Self {
            config,
            fc1,
            fc2,
            fc3,
        }
    }

    /// Classify samples
    ///
    /// Returns probability of being real (after sigmoid)
    pub fn classify(&self, input: &Tensor) -> Tensor {
        self.forward(input).sigmoid()
    }

    /// Get configuration
    pub fn config(&self) -> &DiscriminatorConfig {
        &self.config
    }
}

impl Module for Discriminator {
    /// Forward pass
    ///
    /// Input shape: (batch_size, image_dim)
    /// Output shape: (batch_size, 1) with logits
    fn forward(&self, input: &Tensor) -> Tensor {
        let slope = self.config.leaky_slope;
        let x = leaky_relu(&self.fc1.forward(input), slope);
        let x = leaky_relu(&self.fc2.forward(&x), slope);
        self.fc3.forward(&x)
    }
}

/// LeakyReLU with a configurable negative slope
fn leaky_relu(xs: &Tensor, slope: f64) -> Tensor {
    xs.maximum(&(xs * slope))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::{nn::VarStore, Device, Kind, Tensor};

    #[test]
    fn test_discriminator_output_shape() {
        let vs = VarStore::new(Device::Cpu);
        let config = DiscriminatorConfig {
            image_dim: 784,
            hidden_dim: 128,
            leaky_slope: 0.2,
        };
        let disc = Discriminator::new(&vs.root(), config);

        let input = Tensor::randn([4, 784], (Kind::Float, Device::Cpu));
        let output = disc.forward(&input);

        assert_eq!(output.size(), vec![4, 1]);
    }

    #[test]
    fn test_discriminator_classify() {
        let vs = VarStore::new(Device::Cpu);
        let disc = Discriminator::new(&vs.root(), DiscriminatorConfig::default());

        let input = Tensor::randn([2, 784], (Kind::Float, Device::Cpu));
        let probs = disc.classify(&input);

        // Probabilities should be in [0, 1]
        let min_val: f64 = probs.min().double_value(&[]);
        let max_val: f64 = probs.max().double_value(&[]);
        assert!(min_val >= 0.0 && max_val <= 1.0);
    }
}
