//! Stereo phase correlator
//!
//! Accumulates L*R, L*L, and R*R products to derive the normalized stereo
//! correlation (-1 = out of phase, +1 = mono), the energy balance, and a
//! correlation-based width estimate. A zero denominator (silence on either
//! channel) reads as correlation 0 rather than NaN. Accumulators reset
//! periodically so the reading follows the program material.

/// Running stereo correlation/balance analyzer.
pub struct PhaseCorrelator {
    sum_lr: f64,
    sum_ll: f64,
    sum_rr: f64,
    sample_count: u64,
    correlation: f32,
    balance: f32,
    width: f32,
    smoothing: f32,
}

impl PhaseCorrelator {
    pub fn new() -> Self {
        Self {
            sum_lr: 0.0,
            sum_ll: 0.0,
            sum_rr: 0.0,
            sample_count: 0,
            correlation: 0.0,
            balance: 0.0,
            width: 0.0,
            smoothing: 0.95,
        }
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing.clamp(0.0, 0.999);
    }

    pub fn reset(&mut self) {
        self.sum_lr = 0.0;
        self.sum_ll = 0.0;
        self.sum_rr = 0.0;
        self.sample_count = 0;
    }

    /// Feed a stereo block and update the derived readings.
    pub fn analyze(&mut self, left: &[f32], right: &[f32]) {
        let frames = left.len().min(right.len());
        for i in 0..frames {
            self.sum_lr += (left[i] * right[i]) as f64;
            self.sum_ll += (left[i] * left[i]) as f64;
            self.sum_rr += (right[i] * right[i]) as f64;
        }
        self.sample_count += frames as u64;
        if self.sample_count == 0 {
            return;
        }

        let denom = (self.sum_ll * self.sum_rr).sqrt();
        let new_corr = if denom > 0.0 {
            (self.sum_lr / denom) as f32
        } else {
            0.0
        };
        self.correlation = self.smoothing * self.correlation + (1.0 - self.smoothing) * new_corr;

        let energy_l = self.sum_ll / self.sample_count as f64;
        let energy_r = self.sum_rr / self.sample_count as f64;
        let total = energy_l + energy_r;
        if total > 0.0 {
            self.balance = ((energy_r - energy_l) / total) as f32;
        }

        self.width = 1.0 - self.correlation.abs();

        // Keep the window short enough to track changing material
        if self.sample_count > 4096 {
            self.reset();
        }
    }

    /// Correlation in [-1, 1]; +1 mono, 0 uncorrelated, -1 inverted.
    pub fn correlation(&self) -> f32 {
        self.correlation
    }

    /// Energy balance in [-1, 1]; negative = left-heavy.
    pub fn balance(&self) -> f32 {
        self.balance
    }

    pub fn width(&self) -> f32 {
        self.width
    }
}

impl Default for PhaseCorrelator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::TWO_PI;

    fn tone(len: usize, invert: bool) -> (Vec<f32>, Vec<f32>) {
        let l: Vec<f32> = (0..len)
            .map(|i| (i as f32 * 440.0 * TWO_PI / 48000.0).sin())
            .collect();
        let r: Vec<f32> = l.iter().map(|&s| if invert { -s } else { s }).collect();
        (l, r)
    }

    #[test]
    fn test_mono_signal_correlates_positive() {
        let mut pc = PhaseCorrelator::new();
        pc.set_smoothing(0.0);
        let (l, r) = tone(4096, false);
        pc.analyze(&l, &r);
        assert!(pc.correlation() > 0.95, "identical channels: {}", pc.correlation());
        assert!(pc.width() < 0.05);
    }

    #[test]
    fn test_inverted_signal_correlates_negative() {
        let mut pc = PhaseCorrelator::new();
        pc.set_smoothing(0.0);
        let (l, r) = tone(4096, true);
        pc.analyze(&l, &r);
        assert!(pc.correlation() < -0.95, "inverted channels: {}", pc.correlation());
    }

    #[test]
    fn test_silence_reads_zero_not_nan() {
        let mut pc = PhaseCorrelator::new();
        pc.analyze(&[0.0; 1024], &[0.0; 1024]);
        assert_eq!(pc.correlation(), 0.0);
        assert!(pc.correlation().is_finite());
        assert!(pc.balance().is_finite());
    }

    #[test]
    fn test_balance_tracks_louder_channel() {
        let mut pc = PhaseCorrelator::new();
        pc.set_smoothing(0.0);
        let l = vec![0.1; 2048];
        let r = vec![0.8; 2048];
        pc.analyze(&l, &r);
        assert!(pc.balance() > 0.5, "right-heavy balance: {}", pc.balance());
    }

    #[test]
    fn test_accumulators_reset_periodically() {
        let mut pc = PhaseCorrelator::new();
        pc.set_smoothing(0.0);
        // Long mono stretch, then a long inverted stretch: the reading must
        // swing negative rather than being pinned by early history.
        let (l, r) = tone(4096, false);
        for _ in 0..4 {
            pc.analyze(&l, &r);
        }
        let (li, ri) = tone(4096, true);
        for _ in 0..8 {
            pc.analyze(&li, &ri);
        }
        assert!(
            pc.correlation() < -0.9,
            "correlator should follow new material: {}",
            pc.correlation()
        );
    }
}
