//! MNIST dataset structures and IDX file parsing
//!
//! The IDX format stores a big-endian magic number, big-endian dimension
//! sizes, then raw unsigned bytes. Image files use magic 0x00000803
//! (three dimensions), label files 0x00000801 (one dimension).

use std::path::Path;

use anyhow::{anyhow, Result};
use ndarray::Array2;

/// Magic number of an IDX image file (u8 data, 3 dimensions)
const IMAGES_MAGIC: u32 = 0x0000_0803;
/// Magic number of an IDX label file (u8 data, 1 dimension)
const LABELS_MAGIC: u32 = 0x0000_0801;

/// Conventional IDX file names for a split ("train" or "t10k")
pub fn idx_file_names(split: &str) -> (String, String) {
    (
        format!("{}-images-idx3-ubyte", split),
        format!("{}-labels-idx1-ubyte", split),
    )
}

/// Raw image stack parsed from an IDX image file
#[derive(Debug, Clone)]
pub struct MnistImages {
    /// Number of images
    pub count: usize,
    /// Image height in pixels
    pub rows: usize,
    /// Image width in pixels
    pub cols: usize,
    /// Row-major pixel bytes, `count * rows * cols` long
    pixels: Vec<u8>,
}

impl MnistImages {
    /// Parse an IDX image file from raw bytes
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let magic = read_be_u32(bytes, 0)?;
        if magic != IMAGES_MAGIC {
            return Err(anyhow!(
                "Bad IDX image magic: expected {:#010x}, got {:#010x}",
                IMAGES_MAGIC,
                magic
            ));
        }

        let count = read_be_u32(bytes, 4)? as usize;
        let rows = read_be_u32(bytes, 8)? as usize;
        let cols = read_be_u32(bytes, 12)? as usize;

        let expected = count * rows * cols;
        let pixels = bytes
            .get(16..16 + expected)
            .ok_or_else(|| {
                anyhow!(
                    "Truncated IDX image file: expected {} pixel bytes, got {}",
                    expected,
                    bytes.len().saturating_sub(16)
                )
            })?
            .to_vec();

        Ok(Self {
            count,
            rows,
            cols,
            pixels,
        })
    }

    /// Pixel dimension of one flattened image
    pub fn image_dim(&self) -> usize {
        self.rows * self.cols
    }

    /// Raw pixel bytes of a single image
    pub fn image(&self, idx: usize) -> Option<&[u8]> {
        let dim = self.image_dim();
        self.pixels.get(idx * dim..(idx + 1) * dim)
    }
}

/// Parse an IDX label file from raw bytes
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>> {
    let magic = read_be_u32(bytes, 0)?;
    if magic != LABELS_MAGIC {
        return Err(anyhow!(
            "Bad IDX label magic: expected {:#010x}, got {:#010x}",
            LABELS_MAGIC,
            magic
        ));
    }

    let count = read_be_u32(bytes, 4)? as usize;
    let labels = bytes
        .get(8..8 + count)
        .ok_or_else(|| {
            anyhow!(
                "Truncated IDX label file: expected {} labels, got {}",
                count,
                bytes.len().saturating_sub(8)
            )
        })?
        .to_vec();

    Ok(labels)
}

/// A labeled MNIST split
#[derive(Debug, Clone)]
pub struct MnistDataset {
    /// Split name ("train" or "t10k")
    pub split: String,
    /// Image stack
    pub images: MnistImages,
    /// One digit label per image
    pub labels: Vec<u8>,
}

impl MnistDataset {
    /// Build a dataset from parsed parts, checking image/label agreement
    pub fn new(split: String, images: MnistImages, labels: Vec<u8>) -> Result<Self> {
        if images.count != labels.len() {
            return Err(anyhow!(
                "Image/label count mismatch: {} images vs {} labels",
                images.count,
                labels.len()
            ));
        }
        Ok(Self {
            split,
            images,
            labels,
        })
    }

    /// Load a split from a directory of raw IDX files
    pub fn load_dir(dir: &Path, split: &str) -> Result<Self> {
        let (images_name, labels_name) = idx_file_names(split);

        let images_bytes = std::fs::read(dir.join(&images_name))
            .map_err(|e| anyhow!("Failed to read {}: {}", dir.join(&images_name).display(), e))?;
        let labels_bytes = std::fs::read(dir.join(&labels_name))
            .map_err(|e| anyhow!("Failed to read {}: {}", dir.join(&labels_name).display(), e))?;

        let images = MnistImages::parse(&images_bytes)?;
        let labels = parse_labels(&labels_bytes)?;

        Self::new(split.to_string(), images, labels)
    }

    /// Number of labeled images
    pub fn len(&self) -> usize {
        self.images.count
    }

    /// Check if the split is empty
    pub fn is_empty(&self) -> bool {
        self.images.count == 0
    }

    /// Flatten every image to a row of floats in [0, 1]
    ///
    /// Output shape: (num_images, rows * cols)
    pub fn to_feature_matrix(&self) -> Array2<f32> {
        let dim = self.images.image_dim();
        let mut matrix = Array2::<f32>::zeros((self.len(), dim));

        for i in 0..self.len() {
            if let Some(image) = self.images.image(i) {
                for (j, &px) in image.iter().enumerate() {
                    matrix[[i, j]] = f32::from(px) / 255.0;
                }
            }
        }

        matrix
    }

    /// Count of each digit class
    pub fn label_histogram(&self) -> [usize; 10] {
        let mut hist = [0usize; 10];
        for &label in &self.labels {
            if let Some(slot) = hist.get_mut(label as usize) {
                *slot += 1;
            }
        }
        hist
    }
}

/// Read a big-endian u32 at `offset`
fn read_be_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    let slice = bytes
        .get(offset..offset + 4)
        .ok_or_else(|| anyhow!("Truncated IDX header at offset {}", offset))?;
    Ok(u32::from_be_bytes([slice[0], slice[1], slice[2], slice[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx_images(count: u32, rows: u32, cols: u32, pixels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&IMAGES_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&count.to_be_bytes());
        bytes.extend_from_slice(&rows.to_be_bytes());
        bytes.extend_from_slice(&cols.to_be_bytes());
        bytes.extend_from_slice(pixels);
        bytes
    }

    fn idx_labels(labels: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&LABELS_MAGIC.to_be_bytes());
        bytes.extend_from_slice(&(labels.len() as u32).to_be_bytes());
        bytes.extend_from_slice(labels);
        bytes
    }

    #[test]
    fn test_parse_images() {
        let bytes = idx_images(2, 2, 2, &[0, 64, 128, 255, 1, 2, 3, 4]);
        let images = MnistImages::parse(&bytes).unwrap();

        assert_eq!(images.count, 2);
        assert_eq!(images.image_dim(), 4);
        assert_eq!(images.image(0).unwrap(), &[0, 64, 128, 255]);
        assert_eq!(images.image(1).unwrap(), &[1, 2, 3, 4]);
        assert!(images.image(2).is_none());
    }

    #[test]
    fn test_parse_images_bad_magic() {
        let mut bytes = idx_images(1, 2, 2, &[0; 4]);
        bytes[3] = 0x99;
        assert!(MnistImages::parse(&bytes).is_err());
    }

    #[test]
    fn test_parse_images_truncated() {
        let bytes = idx_images(2, 2, 2, &[0; 4]); // 8 pixels promised, 4 given
        assert!(MnistImages::parse(&bytes).is_err());
    }

    #[test]
    fn test_parse_labels() {
        let bytes = idx_labels(&[7, 2, 1]);
        assert_eq!(parse_labels(&bytes).unwrap(), vec![7, 2, 1]);
    }

    #[test]
    fn test_count_mismatch() {
        let images = MnistImages::parse(&idx_images(2, 2, 2, &[0; 8])).unwrap();
        let result = MnistDataset::new("train".to_string(), images, vec![1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_feature_matrix() {
        let images = MnistImages::parse(&idx_images(1, 2, 2, &[0, 51, 102, 255])).unwrap();
        let dataset = MnistDataset::new("train".to_string(), images, vec![3]).unwrap();

        let matrix = dataset.to_feature_matrix();
        assert_eq!(matrix.shape(), &[1, 4]);
        assert!((matrix[[0, 0]] - 0.0).abs() < 1e-6);
        assert!((matrix[[0, 1]] - 0.2).abs() < 1e-6);
        assert!((matrix[[0, 3]] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_label_histogram() {
        let images = MnistImages::parse(&idx_images(3, 1, 1, &[0, 0, 0])).unwrap();
        let dataset = MnistDataset::new("train".to_string(), images, vec![1, 1, 9]).unwrap();

        let hist = dataset.label_histogram();
        assert_eq!(hist[1], 2);
        assert_eq!(hist[9], 1);
    }
}
