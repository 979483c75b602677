//! Training metrics for monitoring GAN progress
//!
//! Provides structures for tracking and logging training progress.

/// Metrics collected during training
#[derive(Debug, Clone, Default)]
pub struct TrainingMetrics {
    /// Generator losses per epoch
    pub gen_losses: Vec<f64>,
    /// Discriminator losses per epoch
    pub disc_losses: Vec<f64>,
    /// Mean D(x) per epoch: discriminator score on real images
    pub real_scores: Vec<f64>,
    /// Mean D(G(z)) per epoch: discriminator score on generated images
    pub fake_scores: Vec<f64>,
}

impl TrainingMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record epoch metrics
    pub fn record_epoch(&mut self, gen_loss: f64, disc_loss: f64, real_score: f64, fake_score: f64) {
        self.gen_losses.push(gen_loss);
        self.disc_losses.push(disc_loss);
        self.real_scores.push(real_score);
        self.fake_scores.push(fake_score);
    }

    /// Get number of recorded epochs
    pub fn num_epochs(&self) -> usize {
        self.gen_losses.len()
    }

    /// Get latest generator loss
    pub fn latest_gen_loss(&self) -> Option<f64> {
        self.gen_losses.last().copied()
    }

    /// Get latest discriminator loss
    pub fn latest_disc_loss(&self) -> Option<f64> {
        self.disc_losses.last().copied()
    }

    /// Calculate moving average of generator loss
    pub fn gen_loss_ma(&self, window: usize) -> f64 {
        moving_average(&self.gen_losses, window)
    }

    /// Calculate moving average of discriminator loss
    pub fn disc_loss_ma(&self, window: usize) -> f64 {
        moving_average(&self.disc_losses, window)
    }

    /// Check if training appears to have collapsed
    ///
    /// Mode collapse indicators:
    /// - Discriminator loss very low (can easily distinguish)
    /// - Generator loss very high (can't fool discriminator)
    pub fn check_mode_collapse(&self, window: usize) -> bool {
        if self.num_epochs() < window {
            return false;
        }

        let disc_ma = self.disc_loss_ma(window);
        let gen_ma = self.gen_loss_ma(window);

        // Heuristic thresholds for mode collapse detection
        disc_ma < 0.1 && gen_ma > 5.0
    }

    /// Check if training is balanced
    ///
    /// A healthy run has D(x) well above 0.5 but not saturated, and
    /// D(G(z)) clearly below D(x) but not pinned at zero.
    pub fn is_balanced(&self, window: usize) -> bool {
        if self.num_epochs() < window {
            return true;
        }

        let n = window.min(self.num_epochs());
        let avg_real: f64 = self.real_scores.iter().rev().take(n).sum::<f64>() / n as f64;
        let avg_fake: f64 = self.fake_scores.iter().rev().take(n).sum::<f64>() / n as f64;

        (0.4..0.95).contains(&avg_real) && (0.05..0.6).contains(&avg_fake)
    }

    /// Save metrics to CSV file
    pub fn save_csv(&self, path: &str) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(["epoch", "gen_loss", "disc_loss", "real_score", "fake_score"])?;

        for i in 0..self.num_epochs() {
            writer.write_record([
                (i + 1).to_string(),
                self.gen_losses[i].to_string(),
                self.disc_losses[i].to_string(),
                self.real_scores[i].to_string(),
                self.fake_scores[i].to_string(),
            ])?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Load metrics from CSV file
    pub fn load_csv(path: &str) -> anyhow::Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut metrics = Self::new();

        for result in reader.records() {
            let record = result?;
            metrics.gen_losses.push(record[1].parse()?);
            metrics.disc_losses.push(record[2].parse()?);
            metrics.real_scores.push(record[3].parse()?);
            metrics.fake_scores.push(record[4].parse()?);
        }

        Ok(metrics)
    }
}

/// Exponential moving average tracker
#[derive(Debug)]
pub struct EmaTracker {
    value: f64,
    alpha: f64,
    initialized: bool,
}

impl EmaTracker {
    /// Create new EMA tracker
    ///
    /// # Arguments
    ///
    /// * `alpha` - Smoothing factor (0 < alpha <= 1). Higher = more weight on recent
    pub fn new(alpha: f64) -> Self {
        Self {
            value: 0.0,
            alpha: alpha.clamp(0.001, 1.0),
            initialized: false,
        }
    }

    /// Update with new value
    pub fn update(&mut self, new_value: f64) {
        if !self.initialized {
            self.value = new_value;
            self.initialized = true;
        } else {
            self.value = self.alpha * new_value + (1.0 - self.alpha) * self.value;
        }
    }

    /// Get current EMA value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Reset tracker
    pub fn reset(&mut self) {
        self.value = 0.0;
        self.initialized = false;
    }
}

/// Calculate moving average of last `window` values
fn moving_average(values: &[f64], window: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = window.min(values.len());
    let sum: f64 = values.iter().rev().take(n).sum();
    sum / n as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_metrics() {
        let mut metrics = TrainingMetrics::new();

        metrics.record_epoch(1.5, 0.8, 0.6, 0.4);
        metrics.record_epoch(1.3, 0.75, 0.65, 0.38);

        assert_eq!(metrics.num_epochs(), 2);
        assert_eq!(metrics.latest_gen_loss(), Some(1.3));
        assert_eq!(metrics.latest_disc_loss(), Some(0.75));
    }

    #[test]
    fn test_ema_tracker() {
        let mut ema = EmaTracker::new(0.5);

        ema.update(10.0);
        assert_eq!(ema.value(), 10.0);

        ema.update(20.0);
        assert_eq!(ema.value(), 15.0); // 0.5 * 20 + 0.5 * 10
    }

    #[test]
    fn test_mode_collapse_detection() {
        let mut metrics = TrainingMetrics::new();
        for _ in 0..10 {
            metrics.record_epoch(8.0, 0.01, 0.99, 0.01);
        }

        assert!(metrics.check_mode_collapse(10));
        assert!(!metrics.is_balanced(10));
    }

    #[test]
    fn test_csv_roundtrip() {
        let mut metrics = TrainingMetrics::new();
        metrics.record_epoch(1.5, 0.8, 0.6, 0.4);
        metrics.record_epoch(1.2, 0.9, 0.55, 0.45);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        metrics.save_csv(path.to_str().unwrap()).unwrap();

        let loaded = TrainingMetrics::load_csv(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.num_epochs(), 2);
        assert_eq!(loaded.latest_gen_loss(), Some(1.2));
        assert_eq!(loaded.real_scores, metrics.real_scores);
    }
}
