//! Simulation clock.
//!
//! [`SimTime`] is advanced once per [`Simulation::tick`](crate::sim::Simulation::tick)
//! with the caller's raw delta, which is clamped before any system sees it.

use std::time::Duration;

/// Tick timing state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimTime {
    /// Clamped delta of the last tick, in seconds.
    delta: f32,
    /// Sum of clamped deltas.
    elapsed: f64,
    /// Ticks run so far.
    tick: u64,
    /// Ticks whose raw delta exceeded the cap.
    clamped_ticks: u64,
}

impl SimTime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tick and return the delta systems should use.
    ///
    /// Negative or non-finite input counts as zero; anything above
    /// `max_delta` is cut down to it.
    pub fn advance(&mut self, raw: f32, max_delta: f32) -> f32 {
        let raw = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
        let dt = if raw > max_delta {
            self.clamped_ticks += 1;
            max_delta
        } else {
            raw
        };
        self.delta = dt;
        self.elapsed += f64::from(dt);
        self.tick += 1;
        dt
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta
    }

    pub fn delta(&self) -> Duration {
        Duration::from_secs_f32(self.delta)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// How many ticks had their delta cut down.
    pub fn clamped_ticks(&self) -> u64 {
        self.clamped_ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_deltas_pass_through() {
        let mut time = SimTime::new();
        assert_eq!(time.advance(0.016, 0.05), 0.016);
        assert_eq!(time.tick(), 1);
        assert_eq!(time.clamped_ticks(), 0);
    }

    #[test]
    fn large_deltas_are_capped() {
        let mut time = SimTime::new();
        assert_eq!(time.advance(0.5, 0.05), 0.05);
        assert_eq!(time.advance(0.05, 0.05), 0.05);
        assert_eq!(time.clamped_ticks(), 1);
        assert!((time.elapsed_secs() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn bad_input_is_zero() {
        let mut time = SimTime::new();
        assert_eq!(time.advance(-1.0, 0.05), 0.0);
        assert_eq!(time.advance(f32::NAN, 0.05), 0.0);
        assert_eq!(time.advance(f32::INFINITY, 0.05), 0.0);
        assert_eq!(time.tick(), 3);
        assert_eq!(time.delta(), Duration::ZERO);
    }
}
