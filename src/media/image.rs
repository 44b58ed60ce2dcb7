//! Image-to-spectrum synthesis
//!
//! Treats an image as a spectrogram: each row is one spectral frame, each
//! column a sine partial whose amplitude is the pixel's luminance (Rec.601
//! weights). Playback scans rows over about four seconds per image,
//! additively synthesizing the current row, and loops by default.

use crate::math::TWO_PI;

/// Additive image sonifier.
pub struct ImageSpectrum {
    spectrum: Vec<f32>,
    num_bins: usize,
    num_frames: usize,
    phases: Vec<f32>,
    current_frame: usize,
    frame_accum: f32,
    base_freq: f32,
    freq_scale: f32,
    looping: bool,
    sample_rate: f32,
}

impl ImageSpectrum {
    pub fn new(sample_rate: f32, bins: usize) -> Self {
        let bins = bins.max(1);
        Self {
            spectrum: Vec::new(),
            num_bins: bins,
            num_frames: 0,
            phases: vec![0.0; bins],
            current_frame: 0,
            frame_accum: 0.0,
            base_freq: 55.0,
            freq_scale: 8000.0 / bins as f32,
            looping: true,
            sample_rate,
        }
    }

    /// Load an RGB8 image (row-major, 3 bytes per pixel). Width becomes the
    /// partial count, height the frame count.
    pub fn load_rgb(&mut self, rgb: &[u8], width: usize, height: usize) -> bool {
        if rgb.len() < width * height * 3 || width == 0 || height == 0 {
            return false;
        }

        self.num_bins = width;
        self.num_frames = height;
        self.spectrum = vec![0.0; width * height];

        for y in 0..height {
            for x in 0..width {
                let idx = (y * width + x) * 3;
                let lum = (0.299 * rgb[idx] as f32
                    + 0.587 * rgb[idx + 1] as f32
                    + 0.114 * rgb[idx + 2] as f32)
                    / 255.0;
                self.spectrum[y * width + x] = lum;
            }
        }

        self.phases = vec![0.0; width];
        self.freq_scale = 8000.0 / width as f32;
        self.current_frame = 0;
        self.frame_accum = 0.0;
        true
    }

    /// Map the column range onto [min_hz, max_hz].
    pub fn set_frequency_range(&mut self, min_hz: f32, max_hz: f32) {
        self.base_freq = min_hz;
        self.freq_scale = (max_hz - min_hz).max(0.0) / self.num_bins as f32;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    /// Render mono samples from the current frame, advancing the row scan.
    /// With no image loaded this writes silence.
    pub fn process(&mut self, buffer: &mut [f32]) {
        if self.spectrum.is_empty() || self.num_frames == 0 {
            buffer.fill(0.0);
            return;
        }

        // Whole image scanned in ~4 seconds
        let frame_inc = self.num_frames as f32 / (self.sample_rate * 4.0);

        for sample in buffer.iter_mut() {
            let frame = self.current_frame % self.num_frames;
            let row = &self.spectrum[frame * self.num_bins..(frame + 1) * self.num_bins];

            let mut out = 0.0;
            for (bin, (&amp, phase)) in row.iter().zip(self.phases.iter_mut()).enumerate() {
                let freq = self.base_freq + bin as f32 * self.freq_scale;
                out += amp * phase.sin();

                *phase += TWO_PI * freq / self.sample_rate;
                if *phase > TWO_PI {
                    *phase -= TWO_PI;
                }
            }
            *sample = out / self.num_bins as f32;

            self.frame_accum += frame_inc;
            if self.frame_accum >= 1.0 {
                self.current_frame += 1;
                if self.looping && self.current_frame >= self.num_frames {
                    self.current_frame = 0;
                }
                self.frame_accum -= 1.0;
            }
        }
    }
}
