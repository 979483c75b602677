//! Checkpoint save/load utilities
//!
//! Provides functions for saving and loading model checkpoints
//! along with training state.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::Gan;
use crate::training::TrainingMetrics;

/// Checkpoint metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMeta {
    /// Current epoch
    pub epoch: usize,
    /// Generator loss at checkpoint
    pub gen_loss: f64,
    /// Discriminator loss at checkpoint
    pub disc_loss: f64,
    /// Timestamp of checkpoint
    pub timestamp: String,
    /// Model configuration (as JSON)
    pub config: String,
}

/// Save a complete checkpoint (model + metadata)
///
/// # Arguments
///
/// * `model` - GAN model to save
/// * `metrics` - Training metrics
/// * `epoch` - Current epoch number
/// * `dir` - Directory to save checkpoint
///
/// # Returns
///
/// Path to saved checkpoint
pub fn save_checkpoint(
    model: &Gan,
    metrics: &TrainingMetrics,
    epoch: usize,
    dir: &str,
) -> anyhow::Result<String> {
    std::fs::create_dir_all(dir)?;

    let checkpoint_name = format!("checkpoint_epoch_{:04}", epoch);
    let checkpoint_dir = format!("{}/{}", dir, checkpoint_name);
    std::fs::create_dir_all(&checkpoint_dir)?;

    // Save model weights
    let gen_path = format!("{}/generator.pt", checkpoint_dir);
    let disc_path = format!("{}/discriminator.pt", checkpoint_dir);
    model.save(&gen_path, &disc_path)?;

    // Save metadata
    let meta = CheckpointMeta {
        epoch,
        gen_loss: metrics.latest_gen_loss().unwrap_or(0.0),
        disc_loss: metrics.latest_disc_loss().unwrap_or(0.0),
        timestamp: chrono::Utc::now().to_rfc3339(),
        config: serde_json::json!({
            "latent_dim": model.latent_dim(),
            "hidden_dim": model.hidden_dim(),
            "image_dim": model.image_dim(),
        })
        .to_string(),
    };

    let meta_path = format!("{}/meta.json", checkpoint_dir);
    let meta_json = serde_json::to_string_pretty(&meta)?;
    std::fs::write(&meta_path, meta_json)?;

    // Save metrics
    let metrics_path = format!("{}/metrics.csv", checkpoint_dir);
    metrics.save_csv(&metrics_path)?;

    tracing::info!("Saved checkpoint to {}", checkpoint_dir);
    Ok(checkpoint_dir)
}

/// Load checkpoint metadata
pub fn load_checkpoint_meta(checkpoint_dir: &str) -> anyhow::Result<CheckpointMeta> {
    let meta_path = format!("{}/meta.json", checkpoint_dir);
    let content = std::fs::read_to_string(&meta_path)?;
    let meta: CheckpointMeta = serde_json::from_str(&content)?;
    Ok(meta)
}

/// Load a complete checkpoint
///
/// # Arguments
///
/// * `model` - GAN model to load weights into
/// * `checkpoint_dir` - Directory containing checkpoint
///
/// # Returns
///
/// Tuple of (epoch, metrics)
pub fn load_checkpoint(
    model: &mut Gan,
    checkpoint_dir: &str,
) -> anyhow::Result<(usize, TrainingMetrics)> {
    // Load model weights
    let gen_path = format!("{}/generator.pt", checkpoint_dir);
    let disc_path = format!("{}/discriminator.pt", checkpoint_dir);
    model.load(&gen_path, &disc_path)?;

    // Load metadata
    let meta = load_checkpoint_meta(checkpoint_dir)?;

    // Load metrics
    let metrics_path = format!("{}/metrics.csv", checkpoint_dir);
    let metrics = if Path::new(&metrics_path).exists() {
        TrainingMetrics::load_csv(&metrics_path)?
    } else {
        TrainingMetrics::new()
    };

    tracing::info!("Loaded checkpoint from {} (epoch {})", checkpoint_dir, meta.epoch);
    Ok((meta.epoch, metrics))
}

/// Find the latest checkpoint in a directory
pub fn find_latest_checkpoint(dir: &str) -> Option<String> {
    let path = Path::new(dir);
    if !path.exists() {
        return None;
    }

    let mut checkpoints: Vec<_> = std::fs::read_dir(path)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().ok().map(|t| t.is_dir()).unwrap_or(false))
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|n| n.starts_with("checkpoint_epoch_"))
                .unwrap_or(false)
        })
        .collect();

    checkpoints.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

    checkpoints
        .first()
        .map(|e| e.path().to_string_lossy().to_string())
}

/// Resolve the generator weight path for a model argument
///
/// Accepts either a direct weight file, or a checkpoint directory in which
/// case the final weights are preferred and the newest epoch checkpoint is
/// the fallback.
pub fn resolve_generator_path(model_path: &str) -> String {
    if !Path::new(model_path).is_dir() {
        return model_path.to_string();
    }

    let final_path = format!("{}/generator_final.pt", model_path);
    if Path::new(&final_path).exists() {
        return final_path;
    }

    match find_latest_checkpoint(model_path) {
        Some(checkpoint) => format!("{}/generator.pt", checkpoint),
        None => final_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_meta_serialization() {
        let meta = CheckpointMeta {
            epoch: 10,
            gen_loss: 0.5,
            disc_loss: 0.6,
            timestamp: "2026-01-01T00:00:00Z".to_string(),
            config: "{}".to_string(),
        };

        let json = serde_json::to_string(&meta).unwrap();
        let loaded: CheckpointMeta = serde_json::from_str(&json).unwrap();

        assert_eq!(meta.epoch, loaded.epoch);
    }

    #[test]
    fn test_find_latest_checkpoint_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_latest_checkpoint(dir.path().to_str().unwrap()).is_none());
        assert!(find_latest_checkpoint("no/such/dir").is_none());
    }

    #[test]
    fn test_find_latest_checkpoint_picks_highest_epoch() {
        let dir = tempfile::tempdir().unwrap();
        for epoch in [10, 20, 5] {
            let sub = dir.path().join(format!("checkpoint_epoch_{:04}", epoch));
            std::fs::create_dir_all(sub).unwrap();
        }

        let latest = find_latest_checkpoint(dir.path().to_str().unwrap()).unwrap();
        assert!(latest.ends_with("checkpoint_epoch_0020"));
    }

    #[test]
    fn test_resolve_generator_path() {
        // A plain file path passes through untouched
        assert_eq!(resolve_generator_path("weights/generator.pt"), "weights/generator.pt");

        // A directory with final weights resolves to them
        let dir = tempfile::tempdir().unwrap();
        let dir_str = dir.path().to_str().unwrap().to_string();
        std::fs::write(dir.path().join("generator_final.pt"), b"").unwrap();
        assert_eq!(
            resolve_generator_path(&dir_str),
            format!("{}/generator_final.pt", dir_str)
        );

        // Without final weights, the newest epoch checkpoint wins
        let dir2 = tempfile::tempdir().unwrap();
        let dir2_str = dir2.path().to_str().unwrap().to_string();
        std::fs::create_dir_all(dir2.path().join("checkpoint_epoch_0030")).unwrap();
        assert!(resolve_generator_path(&dir2_str).ends_with("checkpoint_epoch_0030/generator.pt"));
    }
}
