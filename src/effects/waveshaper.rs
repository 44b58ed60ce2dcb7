//! Waveshaper distortion - eight shaping algorithms
//!
//! Drive gain ahead of a selectable nonlinearity, a lowpass tone control
//! after it, and a dry/wet blend. The algorithms range from gentle (soft
//! clip, tube) to destructive (foldback, bitcrush quantize) to spectral
//! (Chebyshev polynomials, which map a sine input onto its Nth harmonic).

use super::svf::StateVariableFilter;
use crate::math::{clamp, fast_tanh, lerp};

/// Shaping algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaperAlgorithm {
    SoftClip,
    HardClip,
    Tube,
    Foldback,
    Bitcrush,
    Rectify,
    Chebyshev,
    Asymmetric,
}

/// Chebyshev polynomial of the first kind, orders 1-5.
fn chebyshev(x: f32, order: u32) -> f32 {
    match order {
        1 => x,
        2 => 2.0 * x * x - 1.0,
        3 => 4.0 * x * x * x - 3.0 * x,
        4 => 8.0 * x * x * x * x - 8.0 * x * x + 1.0,
        5 => 16.0 * x * x * x * x * x - 20.0 * x * x * x + 5.0 * x,
        _ => x,
    }
}

/// Multi-algorithm waveshaper with drive, tone, and mix.
pub struct Waveshaper {
    algorithm: ShaperAlgorithm,
    drive: f32,
    mix: f32,
    bit_depth: u32,
    chebyshev_order: u32,
    bias: f32,
    tone_filter: StateVariableFilter,
}

impl Waveshaper {
    pub fn new(sample_rate: f32) -> Self {
        let mut tone_filter = StateVariableFilter::new(sample_rate);
        tone_filter.set_cutoff(8000.0);
        Self {
            algorithm: ShaperAlgorithm::SoftClip,
            drive: 1.0,
            mix: 1.0,
            bit_depth: 8,
            chebyshev_order: 3,
            bias: 0.2,
            tone_filter,
        }
    }

    pub fn set_algorithm(&mut self, algorithm: ShaperAlgorithm) {
        self.algorithm = algorithm;
    }

    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.max(0.0);
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = clamp(mix, 0.0, 1.0);
    }

    /// Tone lowpass cutoff applied after shaping.
    pub fn set_tone(&mut self, cutoff: f32) {
        self.tone_filter.set_cutoff(cutoff);
    }

    pub fn set_bit_depth(&mut self, bits: u32) {
        self.bit_depth = bits.clamp(1, 24);
    }

    pub fn set_chebyshev_order(&mut self, order: u32) {
        self.chebyshev_order = order.clamp(1, 5);
    }

    /// DC bias for the asymmetric algorithm.
    pub fn set_bias(&mut self, bias: f32) {
        self.bias = bias;
    }

    pub fn reset(&mut self) {
        self.tone_filter.reset();
    }

    pub fn process(&mut self, input: f32) -> f32 {
        let mut x = input * self.drive;

        let shaped = match self.algorithm {
            ShaperAlgorithm::SoftClip => fast_tanh(x),
            ShaperAlgorithm::HardClip => clamp(x, -1.0, 1.0),
            ShaperAlgorithm::Tube => {
                // Asymmetric exponential saturation with a little clean blend
                let curved = if x >= 0.0 {
                    1.0 - (-x).exp()
                } else {
                    -1.0 + x.exp()
                };
                curved * 0.9 + x * 0.1
            }
            ShaperAlgorithm::Foldback => {
                let threshold = 1.0;
                while x > threshold || x < -threshold {
                    if x > threshold {
                        x = 2.0 * threshold - x;
                    }
                    if x < -threshold {
                        x = -2.0 * threshold - x;
                    }
                }
                x
            }
            ShaperAlgorithm::Bitcrush => {
                let quant = 2.0_f32.powi(self.bit_depth as i32 - 1);
                (x * quant).round() / quant
            }
            ShaperAlgorithm::Rectify => x.abs(),
            ShaperAlgorithm::Chebyshev => chebyshev(clamp(x, -1.0, 1.0), self.chebyshev_order),
            ShaperAlgorithm::Asymmetric => fast_tanh(x + self.bias) - fast_tanh(self.bias),
        };

        let toned = self.tone_filter.process(shaped);
        lerp(input, toned, self.mix)
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
