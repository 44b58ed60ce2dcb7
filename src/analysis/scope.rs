//! Oscilloscope ring buffer
//!
//! Stores the most recent stereo samples in a fixed ring and tracks the
//! latest trigger point (a rising or falling crossing of the trigger
//! level), so a display can draw a phase-stable waveform instead of a
//! rolling smear. `display` decimates the ring into a fixed point count
//! starting from the trigger.

pub const SCOPE_BUFFER_SIZE: usize = 2048;

/// Triggered stereo waveform scope.
pub struct WaveformScope {
    buffer_l: [f32; SCOPE_BUFFER_SIZE],
    buffer_r: [f32; SCOPE_BUFFER_SIZE],
    write_pos: usize,
    trigger_pos: usize,
    trigger_level: f32,
    trigger_rising: bool,
    time_scale: f32,
}

impl WaveformScope {
    pub fn new() -> Self {
        Self {
            buffer_l: [0.0; SCOPE_BUFFER_SIZE],
            buffer_r: [0.0; SCOPE_BUFFER_SIZE],
            write_pos: 0,
            trigger_pos: 0,
            trigger_level: 0.0,
            trigger_rising: true,
            time_scale: 1.0,
        }
    }

    pub fn set_trigger(&mut self, level: f32, rising: bool) {
        self.trigger_level = level;
        self.trigger_rising = rising;
    }

    /// Horizontal zoom: 1.0 shows the whole ring, 2.0 half of it.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.25);
    }

    /// Feed a processed stereo block. Never blocks.
    pub fn write(&mut self, left: &[f32], right: &[f32]) {
        for i in 0..left.len() {
            let l = left[i];
            let r = right.get(i).copied().unwrap_or(l);

            let prev = self.buffer_l[(self.write_pos + SCOPE_BUFFER_SIZE - 1) % SCOPE_BUFFER_SIZE];
            self.buffer_l[self.write_pos] = l;
            self.buffer_r[self.write_pos] = r;

            let crossed = if self.trigger_rising {
                prev < self.trigger_level && l >= self.trigger_level
            } else {
                prev > self.trigger_level && l <= self.trigger_level
            };
            if crossed {
                self.trigger_pos = self.write_pos;
            }

            self.write_pos = (self.write_pos + 1) % SCOPE_BUFFER_SIZE;
        }
    }

    /// Decimated display extraction from the last trigger point.
    pub fn display(&self, out_l: &mut [f32], out_r: &mut [f32]) {
        let points = out_l.len().min(out_r.len());
        if points == 0 {
            return;
        }
        let step = (SCOPE_BUFFER_SIZE as f32 / self.time_scale) / points as f32;

        for i in 0..points {
            let idx = (self.trigger_pos + (i as f32 * step) as usize) % SCOPE_BUFFER_SIZE;
            out_l[i] = self.buffer_l[idx];
            out_r[i] = self.buffer_r[idx];
        }
    }
}

impl Default for WaveformScope {
    fn default() -> Self {
        Self::new()
    }
}
