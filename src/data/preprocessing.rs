//! Pixel preprocessing for GAN training
//!
//! The generator ends in tanh, so training images are scaled from the
//! loader's [0, 1] range into [-1, 1]; generated samples are mapped back
//! before being written out as images.

use ndarray::Array2;

/// Scale [0, 1] pixels to the [-1, 1] range
///
/// Formula: x_norm = 2 * x - 1
pub fn normalize_images(pixels: &Array2<f32>) -> Array2<f32> {
    pixels.mapv(|x| 2.0 * x - 1.0)
}

/// Map [-1, 1] samples back to [0, 1] pixels, clamping overshoot
///
/// Formula: x = clamp((x_norm + 1) / 2, 0, 1)
pub fn denormalize_images(data: &Array2<f32>) -> Array2<f32> {
    data.mapv(|x| ((x + 1.0) / 2.0).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_normalize_range() {
        let pixels = array![[0.0, 0.5, 1.0]];
        let normalized = normalize_images(&pixels);

        assert!((normalized[[0, 0]] + 1.0).abs() < 1e-6);
        assert!(normalized[[0, 1]].abs() < 1e-6);
        assert!((normalized[[0, 2]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_denormalize_roundtrip() {
        let pixels = array![[0.0, 0.25, 0.5, 0.75, 1.0]];
        let roundtrip = denormalize_images(&normalize_images(&pixels));

        for (orig, back) in pixels.iter().zip(roundtrip.iter()) {
            assert!((orig - back).abs() < 1e-6);
        }
    }

    #[test]
    fn test_denormalize_clamps_overshoot() {
        let data = array![[-1.5, 1.5]];
        let pixels = denormalize_images(&data);

        assert_eq!(pixels[[0, 0]], 0.0);
        assert_eq!(pixels[[0, 1]], 1.0);
    }
}
