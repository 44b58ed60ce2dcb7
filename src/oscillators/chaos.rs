//! Chaotic oscillator - Lorenz attractor integrated at audio rate
//!
//! Integrates the Lorenz system with a fixed-step Euler integrator and emits
//! one axis of the trajectory, scaled down to audio range. The output is
//! deterministic for a given starting point but diverges sensitively from
//! any perturbation, which is what makes it musically interesting.
//!
//! State is kept in `f64`: the attractor runs for minutes at a time and
//! single-precision drift audibly changes the trajectory.

/// Which axis of the Lorenz trajectory is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaosAxis {
    X,
    Y,
    Z,
}

/// Lorenz-attractor oscillator.
///
/// Classic parameters sigma=10, rho=28, beta=8/3, dt=0.01, starting at
/// (0.1, 0, 0). Output scale defaults to 0.05, which keeps the X axis
/// (range roughly +/-20) inside audio range.
pub struct ChaosOscillator {
    x: f64,
    y: f64,
    z: f64,
    sigma: f64,
    rho: f64,
    beta: f64,
    dt: f64,
    output_scale: f32,
    output_axis: ChaosAxis,
    #[allow(dead_code)]
    sample_rate: f32,
}

impl ChaosOscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            x: 0.1,
            y: 0.0,
            z: 0.0,
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
            dt: 0.01,
            output_scale: 0.05,
            output_axis: ChaosAxis::X,
            sample_rate,
        }
    }

    pub fn set_params(&mut self, sigma: f64, rho: f64, beta: f64) {
        self.sigma = sigma;
        self.rho = rho;
        self.beta = beta;
    }

    pub fn set_time_step(&mut self, dt: f64) {
        self.dt = dt.max(1e-6);
    }

    pub fn set_output_axis(&mut self, axis: ChaosAxis) {
        self.output_axis = axis;
    }

    pub fn set_output_scale(&mut self, scale: f32) {
        self.output_scale = scale;
    }

    /// Restore the exact initial coordinates (0.1, 0, 0).
    pub fn reset(&mut self) {
        self.x = 0.1;
        self.y = 0.0;
        self.z = 0.0;
    }

    pub fn process(&mut self) -> f32 {
        // Lorenz system differential equations, fixed-step Euler
        let dx = self.sigma * (self.y - self.x);
        let dy = self.x * (self.rho - self.z) - self.y;
        let dz = self.x * self.y - self.beta * self.z;

        self.x += dx * self.dt;
        self.y += dy * self.dt;
        self.z += dz * self.dt;

        let out = match self.output_axis {
            ChaosAxis::X => self.x,
            ChaosAxis::Y => self.y,
            ChaosAxis::Z => self.z,
        };
        (out as f32) * self.output_scale
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_from_reset() {
        let mut osc = ChaosOscillator::new(48000.0);
        let first: Vec<f32> = (0..2048).map(|_| osc.process()).collect();

        osc.reset();
        let second: Vec<f32> = (0..2048).map(|_| osc.process()).collect();

        assert_eq!(first, second, "reset must restore the exact trajectory");
    }

    #[test]
    fn test_trajectory_stays_on_attractor() {
        let mut osc = ChaosOscillator::new(48000.0);
        // A minute of samples must neither blow up nor collapse to zero
        let mut energy = 0.0f64;
        for _ in 0..48_000 {
            let s = osc.process();
            assert!(s.is_finite(), "Lorenz integration produced non-finite output");
            assert!(s.abs() < 4.0, "output escaped the scaled attractor: {}", s);
            energy += (s as f64) * (s as f64);
        }
        assert!(energy > 1.0, "attractor unexpectedly collapsed to silence");
    }

    #[test]
    fn test_axis_selection_changes_output() {
        let mut x = ChaosOscillator::new(48000.0);
        let mut z = ChaosOscillator::new(48000.0);
        z.set_output_axis(ChaosAxis::Z);

        // Warm both up past the initial transient, then compare
        for _ in 0..1000 {
            x.process();
            z.process();
        }
        let differs = (0..256).any(|_| (x.process() - z.process()).abs() > 1e-6);
        assert!(differs, "X and Z axes should trace different signals");
    }
}
