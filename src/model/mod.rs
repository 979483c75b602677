//! Model module containing GAN architecture components
//!
//! This module provides:
//! - Generator network for producing digit images from noise
//! - Discriminator network for distinguishing real from fake
//! - Gan wrapper combining both networks

mod discriminator;
mod gan;
mod generator;

pub use discriminator::{Discriminator, DiscriminatorConfig};
pub use gan::Gan;
pub use generator::{Generator, GeneratorConfig};
