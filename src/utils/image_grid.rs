//! Sample-image grid rendering
//!
//! Tiles a batch of flattened generator samples into a single image so a
//! whole batch can be inspected at a glance, then writes it out as PNG.

use anyhow::{anyhow, Result};
use tch::{Kind, Tensor};

/// Padding in pixels between grid cells
const GRID_PADDING: i64 = 2;

/// Tile a batch of flattened [-1, 1] samples into one u8 image tensor
///
/// # Arguments
///
/// * `samples` - Tensor of shape (batch_size, side * side) in [-1, 1]
/// * `cols` - Number of grid columns
///
/// # Returns
///
/// Tensor of shape (1, height, width) with u8 pixels
pub fn image_grid(samples: &Tensor, cols: i64) -> Result<Tensor> {
    let size = samples.size();
    if size.len() != 2 {
        return Err(anyhow!("Expected a 2-D batch of flattened images, got {:?}", size));
    }

    let n = size[0];
    let image_dim = size[1];
    let side = (image_dim as f64).sqrt() as i64;
    if side * side != image_dim {
        return Err(anyhow!("Image dimension {} is not a square", image_dim));
    }
    if n == 0 || cols <= 0 {
        return Err(anyhow!("Grid needs at least one sample and one column"));
    }

    let rows = (n + cols - 1) / cols;

    // Denormalize [-1, 1] to u8 pixels
    let images = ((samples.view([n, side, side]) + 1.0) * 127.5)
        .clamp(0.0, 255.0)
        .to_kind(Kind::Uint8);

    let height = GRID_PADDING + rows * (side + GRID_PADDING);
    let width = GRID_PADDING + cols * (side + GRID_PADDING);
    let grid = Tensor::zeros([1, height, width], (Kind::Uint8, samples.device()));

    for idx in 0..n {
        let row = idx / cols;
        let col = idx % cols;
        let y = GRID_PADDING + row * (side + GRID_PADDING);
        let x = GRID_PADDING + col * (side + GRID_PADDING);

        let mut cell = grid.narrow(1, y, side).narrow(2, x, side);
        cell.copy_(&images.get(idx).unsqueeze(0));
    }

    Ok(grid)
}

/// Render a batch of samples into a grid and save it as an image file
pub fn save_image_grid(samples: &Tensor, path: &str, cols: i64) -> Result<()> {
    let grid = image_grid(samples, cols)?;
    tch::vision::image::save(&grid, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tch::Device;

    #[test]
    fn test_grid_dimensions() {
        // 4 images of 2x2 pixels, 2 columns -> 2x2 grid of cells
        let samples = Tensor::zeros([4, 4], (Kind::Float, Device::Cpu));
        let grid = image_grid(&samples, 2).unwrap();

        // height = 2 + 2 * (2 + 2) = 10, same for width
        assert_eq!(grid.size(), vec![1, 10, 10]);
    }

    #[test]
    fn test_grid_denormalizes_pixels() {
        // A single all-white image (value 1.0 in tanh range)
        let samples = Tensor::ones([1, 4], (Kind::Float, Device::Cpu));
        let grid = image_grid(&samples, 1).unwrap();

        let max_val: f64 = grid.max().double_value(&[]);
        assert_eq!(max_val, 255.0);

        // Padding stays black
        let corner: f64 = grid.get(0).get(0).get(0).double_value(&[]);
        assert_eq!(corner, 0.0);
    }

    #[test]
    fn test_grid_rejects_non_square() {
        let samples = Tensor::zeros([1, 5], (Kind::Float, Device::Cpu));
        assert!(image_grid(&samples, 1).is_err());
    }

    #[test]
    fn test_grid_rejects_empty_batch() {
        let samples = Tensor::zeros([0, 4], (Kind::Float, Device::Cpu));
        assert!(image_grid(&samples, 1).is_err());
    }
}
