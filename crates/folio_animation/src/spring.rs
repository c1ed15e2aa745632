//! Spring physics
//!
//! Springs integrate with RK4. Lagged scrubbing uses a critically damped
//! spring so progress eases toward the scroll position without overshoot.

/// Spring configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Critically damped spring that catches up within roughly `lag` seconds
    pub fn critically_damped(lag: f32) -> Self {
        // e^(-wt)(1 + wt) drops below 2% at wt ~= 5.8
        let omega = 6.0 / lag.max(1e-3);
        Self {
            stiffness: omega * omega,
            damping: 2.0 * omega,
            mass: 1.0,
        }
    }

    /// Damping ratio; 1.0 is critical
    pub fn damping_ratio(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::critically_damped(1.0)
    }
}

/// Largest integration step; longer frames are subdivided
const MAX_STEP: f32 = 1.0 / 240.0;
/// Subdivision cap; a frame longer than `MAX_SUBSTEPS * MAX_STEP` only
/// simulates that much time
const MAX_SUBSTEPS: u32 = 1024;
const REST_DELTA: f32 = 1e-4;
const REST_VELOCITY: f32 = 1e-3;

/// A single animated value pulled toward a target
#[derive(Clone, Debug, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to `value` and stop
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < REST_DELTA && self.velocity.abs() < REST_VELOCITY
    }

    /// Advance by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        if !self.is_settled() {
            let dt = dt.min(MAX_SUBSTEPS as f32 * MAX_STEP);
            let steps = ((dt / MAX_STEP).ceil() as u32).clamp(1, MAX_SUBSTEPS);
            let h = dt / steps as f32;
            for _ in 0..steps {
                self.rk4(h);
            }
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let SpringConfig {
            stiffness,
            damping,
            mass,
        } = self.config;
        (-stiffness * (x - self.target) - damping * v) / mass
    }

    fn rk4(&mut self, h: f32) {
        let (x, v) = (self.value, self.velocity);

        let k1x = v;
        let k1v = self.acceleration(x, v);
        let k2x = v + 0.5 * h * k1v;
        let k2v = self.acceleration(x + 0.5 * h * k1x, k2x);
        let k3x = v + 0.5 * h * k2v;
        let k3v = self.acceleration(x + 0.5 * h * k2x, k3x);
        let k4x = v + h * k3v;
        let k4v = self.acceleration(x + h * k3x, k4x);

        self.value = x + h / 6.0 * (k1x + 2.0 * k2x + 2.0 * k3x + k4x);
        self.velocity = v + h / 6.0 * (k1v + 2.0 * k2v + 2.0 * k3v + k4v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_damping_ratio() {
        let config = SpringConfig::critically_damped(1.5);
        assert!((config.damping_ratio() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_catches_up_within_lag_without_overshoot() {
        let mut spring = Spring::new(SpringConfig::critically_damped(1.5), 0.0);
        spring.set_target(1.0);

        let mut max_value = 0.0f32;
        for _ in 0..(60 * 2) {
            spring.step(1.0 / 60.0);
            max_value = max_value.max(spring.value());
        }

        assert!(max_value <= 1.0 + 1e-4);
        assert!((spring.value() - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_lags_behind_target_early() {
        let mut spring = Spring::new(SpringConfig::critically_damped(1.5), 0.0);
        spring.set_target(1.0);
        spring.step(0.1);
        assert!(spring.value() > 0.0);
        assert!(spring.value() < 0.5);
    }

    #[test]
    fn test_settles_exactly() {
        let mut spring = Spring::new(SpringConfig::critically_damped(0.2), 0.0);
        spring.set_target(100.0);
        for _ in 0..600 {
            spring.step(1.0 / 60.0);
        }
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_huge_step_stays_finite() {
        let mut spring = Spring::new(SpringConfig::critically_damped(1.5), 0.0);
        spring.set_target(1.0);
        spring.step(1e6);
        assert!(spring.value().is_finite());
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 1.0);

        spring.set_target(0.0);
        spring.step(f32::NAN);
        assert_eq!(spring.value(), 1.0);
    }
}
