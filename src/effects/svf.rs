//! State-variable filter - trapezoidal integrator topology
//!
//! Produces lowpass, highpass, bandpass, and notch outputs simultaneously
//! from two integrator states per sample; the selected output type decides
//! the returned value. The trapezoidal (zero-delay-feedback) structure stays
//! stable under audio-rate cutoff modulation, which is why this filter also
//! serves as the damping/tone block inside the delay, reverb, and waveshaper.

use crate::math::clamp;

/// Which of the simultaneous filter outputs is returned by `process`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutput {
    Lowpass,
    Highpass,
    Bandpass,
    Notch,
}

/// Trapezoidal state-variable filter.
pub struct StateVariableFilter {
    output: FilterOutput,
    cutoff: f32,
    resonance: f32,
    sample_rate: f32,
    // Coefficients derived from cutoff/resonance
    g: f32,
    k: f32,
    a1: f32,
    a2: f32,
    a3: f32,
    // Integrator state
    ic1eq: f32,
    ic2eq: f32,
    // Last computed outputs (all four available after each process call)
    lowpass: f32,
    highpass: f32,
    bandpass: f32,
    notch: f32,
}

impl StateVariableFilter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            output: FilterOutput::Lowpass,
            cutoff: 1000.0,
            resonance: 0.5,
            sample_rate,
            g: 0.0,
            k: 0.0,
            a1: 0.0,
            a2: 0.0,
            a3: 0.0,
            ic1eq: 0.0,
            ic2eq: 0.0,
            lowpass: 0.0,
            highpass: 0.0,
            bandpass: 0.0,
            notch: 0.0,
        };
        filter.set_cutoff(1000.0);
        filter
    }

    pub fn set_output(&mut self, output: FilterOutput) {
        self.output = output;
    }

    /// Cutoff in Hz, clamped to [20, 0.49 * sample_rate].
    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff = clamp(cutoff, 20.0, self.sample_rate * 0.49);
        self.g = (std::f32::consts::PI * self.cutoff / self.sample_rate).tan();
        self.update_coefficients();
    }

    /// Resonance in [0, 1]; damping k = 2 - 2 * resonance.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = clamp(resonance, 0.0, 1.0);
        self.update_coefficients();
    }

    fn update_coefficients(&mut self) {
        self.k = 2.0 - 2.0 * self.resonance;
        self.a1 = 1.0 / (1.0 + self.g * (self.g + self.k));
        self.a2 = self.g * self.a1;
        self.a3 = self.g * self.a2;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    /// Advance one sample; returns the selected output.
    pub fn process(&mut self, input: f32) -> f32 {
        let v3 = input - self.ic2eq;
        let v1 = self.a1 * self.ic1eq + self.a2 * v3;
        let v2 = self.ic2eq + self.a2 * self.ic1eq + self.a3 * v3;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        self.lowpass = v2;
        self.bandpass = v1;
        self.highpass = input - self.k * v1 - v2;
        self.notch = self.lowpass + self.highpass;

        match self.output {
            FilterOutput::Lowpass => self.lowpass,
            FilterOutput::Highpass => self.highpass,
            FilterOutput::Bandpass => self.bandpass,
            FilterOutput::Notch => self.notch,
        }
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
