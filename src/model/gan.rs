//! GAN wrapper combining Generator and Discriminator
//!
//! Provides convenient methods for training and generation.

use tch::{nn, nn::OptimizerConfig, nn::VarStore, Device, Kind, Tensor};

use super::discriminator::{Discriminator, DiscriminatorConfig};
use super::generator::{Generator, GeneratorConfig};

/// Complete GAN model
pub struct Gan {
    /// Generator network
    pub generator: Generator,
    /// Discriminator network
    pub discriminator: Discriminator,
    /// Variable store for generator
    pub gen_vs: VarStore,
    /// Variable store for discriminator
    pub disc_vs: VarStore,
    /// Device (CPU/GPU)
    pub device: Device,
}

impl Gan {
    /// Create a new GAN model
    ///
    /// # Arguments
    ///
    /// * `gen_config` - Generator configuration
    /// * `disc_config` - Discriminator configuration
    /// * `device` - Device to create model on
    pub fn new(gen_config: GeneratorConfig, disc_config: DiscriminatorConfig, device: Device) -> Self {
        let gen_vs = VarStore::new(device);
        let disc_vs = VarStore::new(device);

        let generator = Generator::new(&gen_vs.root(), gen_config);
        let discriminator = Discriminator::new(&disc_vs.root(), disc_config);

        Self {
            generator,
            discriminator,
            gen_vs,
            disc_vs,
            device,
        }
    }

    /// Create a GAN with matching generator/discriminator dimensions
    ///
    /// # Arguments
    ///
    /// * `latent_dim` - Size of latent noise vector
    /// * `hidden_dim` - Width of the hidden layers in both networks
    /// * `image_dim` - Number of pixels per flattened image
    /// * `device` - Device to create model on
    pub fn with_defaults(latent_dim: i64, hidden_dim: i64, image_dim: i64, device: Device) -> Self {
        let gen_config = GeneratorConfig {
            latent_dim,
            hidden_dim,
            image_dim,
        };

        let disc_config = DiscriminatorConfig {
            image_dim,
            hidden_dim,
            leaky_slope: 0.2,
        };

        Self::new(gen_config, disc_config, device)
    }

    /// Generate synthetic images
    ///
    /// # Arguments
    ///
    /// * `num_samples` - Number of images to generate
    ///
    /// # Returns
    ///
    /// Tensor of shape (num_samples, image_dim) in [-1, 1]
    pub fn generate(&self, num_samples: i64) -> Tensor {
        let latent_dim = self.generator.config().latent_dim;
        let noise = Tensor::randn([num_samples, latent_dim], (Kind::Float, self.device));
        self.generator.generate(&noise)
    }

    /// Generate images from specific noise vectors
    pub fn generate_from_noise(&self, noise: &Tensor) -> Tensor {
        self.generator.generate(noise)
    }

    /// Discriminate samples (get probability of being real)
    pub fn discriminate(&self, samples: &Tensor) -> Tensor {
        self.discriminator.classify(samples)
    }

    /// Get generator optimizer (Adam with GAN-stable betas)
    pub fn gen_optimizer(&self, lr: f64, weight_decay: f64) -> nn::Optimizer {
        nn::Adam {
            beta1: 0.5,
            beta2: 0.999,
            wd: weight_decay,
            ..Default::default()
        }
        .build(&self.gen_vs, lr)
        .expect("Failed to create generator optimizer")
    }

    /// Get discriminator optimizer (Adam with GAN-stable betas)
    pub fn disc_optimizer(&self, lr: f64, weight_decay: f64) -> nn::Optimizer {
        nn::Adam {
            beta1: 0.5,
            beta2: 0.999,
            wd: weight_decay,
            ..Default::default()
        }
        .build(&self.disc_vs, lr)
        .expect("Failed to create discriminator optimizer")
    }

    /// Save model checkpoints
    pub fn save(&self, gen_path: &str, disc_path: &str) -> anyhow::Result<()> {
        self.gen_vs.save(gen_path)?;
        self.disc_vs.save(disc_path)?;
        Ok(())
    }

    /// Load model checkpoints
    pub fn load(&mut self, gen_path: &str, disc_path: &str) -> anyhow::Result<()> {
        self.gen_vs.load(gen_path)?;
        self.disc_vs.load(disc_path)?;
        Ok(())
    }

    /// Get latent dimension
    pub fn latent_dim(&self) -> i64 {
        self.generator.config().latent_dim
    }

    /// Get hidden layer width
    pub fn hidden_dim(&self) -> i64 {
        self.generator.config().hidden_dim
    }

    /// Get number of pixels per image
    pub fn image_dim(&self) -> i64 {
        self.generator.config().image_dim
    }

    /// Interpolate between two points in latent space
    ///
    /// Useful for visualizing smooth transitions between generated digits
    ///
    /// # Arguments
    ///
    /// * `z1` - First latent vector
    /// * `z2` - Second latent vector
    /// * `steps` - Number of interpolation steps
    ///
    /// # Returns
    ///
    /// Tensor of shape (steps, image_dim)
    pub fn interpolate(&self, z1: &Tensor, z2: &Tensor, steps: i64) -> Tensor {
        let mut samples = Vec::new();

        for i in 0..steps {
            let alpha = i as f64 / (steps - 1) as f64;
            let z = z1 * (1.0 - alpha) + z2 * alpha;
            let sample = self.generator.generate(&z.unsqueeze(0));
            samples.push(sample.squeeze_dim(0));
        }

        Tensor::stack(&samples, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gan_creation() {
        let gan = Gan::with_defaults(64, 128, 784, Device::Cpu);

        assert_eq!(gan.latent_dim(), 64);
        assert_eq!(gan.hidden_dim(), 128);
        assert_eq!(gan.image_dim(), 784);
    }

    #[test]
    fn test_gan_generate() {
        let gan = Gan::with_defaults(64, 128, 784, Device::Cpu);

        let samples = gan.generate(4);
        assert_eq!(samples.size(), vec![4, 784]);
    }

    #[test]
    fn test_gan_discriminate() {
        let gan = Gan::with_defaults(64, 128, 784, Device::Cpu);

        let samples = Tensor::randn([4, 784], (Kind::Float, Device::Cpu));
        let probs = gan.discriminate(&samples);

        assert_eq!(probs.size(), vec![4, 1]);
    }

    #[test]
    fn test_gan_interpolate() {
        let gan = Gan::with_defaults(64, 128, 784, Device::Cpu);

        let z1 = Tensor::randn([64], (Kind::Float, Device::Cpu));
        let z2 = Tensor::randn([64], (Kind::Float, Device::Cpu));

        let interpolated = gan.interpolate(&z1, &z2, 10);
        assert_eq!(interpolated.size(), vec![10, 784]);
    }
}
