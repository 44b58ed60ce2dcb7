//! Pixel-grid rhythm sequencer
//!
//! A luminance grid where each row is a drum lane and each column a step.
//! Advancing moves the step cursor (wrapping at the grid width); a lane
//! triggers when its pixel at the current step is brighter than the
//! threshold, with the normalized brightness as velocity.

/// Image-driven step sequencer.
pub struct PixelRhythm {
    pattern: Vec<u8>,
    width: usize,
    height: usize,
    current_step: usize,
    threshold: f32,
}

impl PixelRhythm {
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            pattern: vec![0; width * height],
            width,
            height,
            current_step: 0,
            threshold: 0.5,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Trigger threshold on normalized luminance, in [0, 1].
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.clamp(0.0, 1.0);
    }

    /// Load a luminance grid (row-major, `width * height` bytes).
    /// Shorter input fills the leading cells; excess is ignored.
    pub fn load(&mut self, luminance: &[u8]) {
        let n = luminance.len().min(self.pattern.len());
        self.pattern[..n].copy_from_slice(&luminance[..n]);
    }

    pub fn set_pixel(&mut self, step: usize, lane: usize, value: u8) {
        if step < self.width && lane < self.height {
            self.pattern[lane * self.width + step] = value;
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn reset(&mut self) {
        self.current_step = 0;
    }

    /// Move the step cursor forward one column, wrapping at the width.
    pub fn advance(&mut self) {
        self.current_step = (self.current_step + 1) % self.width;
    }

    /// Trigger query for one lane at the current step. Returns the velocity
    /// when the pixel clears the threshold.
    pub fn trigger(&self, lane: usize) -> Option<f32> {
        if lane >= self.height {
            return None;
        }
        let value = self.pattern[lane * self.width + self.current_step];
        let normalized = value as f32 / 255.0;
        if normalized > self.threshold {
            Some(normalized)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bright_pixels_trigger_with_velocity() {
        let mut rhythm = PixelRhythm::new(4, 2);
        rhythm.set_pixel(0, 0, 255);
        rhythm.set_pixel(0, 1, 40);

        let velocity = rhythm.trigger(0).expect("bright pixel should trigger");
        assert!((velocity - 1.0).abs() < 1e-3);
        assert_eq!(rhythm.trigger(1), None, "dim pixel stays silent");
    }

    #[test]
    fn test_step_wraps_at_width() {
        let mut rhythm = PixelRhythm::new(3, 1);
        for expected in [1, 2, 0, 1, 2, 0] {
            rhythm.advance();
            assert_eq!(rhythm.current_step(), expected);
        }
    }

    #[test]
    fn test_threshold_is_adjustable() {
        let mut rhythm = PixelRhythm::new(1, 1);
        rhythm.set_pixel(0, 0, 128);
        rhythm.set_threshold(0.9);
        assert_eq!(rhythm.trigger(0), None);
        rhythm.set_threshold(0.1);
        assert!(rhythm.trigger(0).is_some());
    }

    #[test]
    fn test_load_row_major() {
        let mut rhythm = PixelRhythm::new(2, 2);
        rhythm.load(&[0, 255, 255, 0]);
        rhythm.set_threshold(0.5);
        // Step 0: lane 0 dark, lane 1 bright
        assert_eq!(rhythm.trigger(0), None);
        assert!(rhythm.trigger(1).is_some());
        rhythm.advance();
        // Step 1: lane 0 bright, lane 1 dark
        assert!(rhythm.trigger(0).is_some());
        assert_eq!(rhythm.trigger(1), None);
    }

    #[test]
    fn test_out_of_range_lane_is_none() {
        let rhythm = PixelRhythm::new(4, 2);
        assert_eq!(rhythm.trigger(5), None);
    }
}
