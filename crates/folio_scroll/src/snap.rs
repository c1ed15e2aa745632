//! Snap points
//!
//! Once scroll input has been idle for the settle interval, progress animates
//! to the nearest snap fraction. Any new input cancels the animation.

use folio_animation::Easing;
use folio_core::{FolioError, Result};

/// Snap settle interval in seconds
pub const DEFAULT_SETTLE: f32 = 0.1;
/// Snap animation duration in seconds
pub const DEFAULT_DURATION: f32 = 0.3;

#[derive(Clone, Debug, PartialEq)]
pub struct SnapConfig {
    fractions: Vec<f32>,
    pub settle: f32,
    pub duration: f32,
    pub ease: Easing,
}

impl SnapConfig {
    /// Snap points as progress fractions in `[0, 1]`
    pub fn new(fractions: &[f32]) -> Result<Self> {
        if fractions.is_empty() {
            return Err(FolioError::invalid("snap needs at least one fraction"));
        }
        if let Some(bad) = fractions
            .iter()
            .find(|f| !f.is_finite() || !(0.0..=1.0).contains(*f))
        {
            return Err(FolioError::invalid(format!(
                "snap fraction {bad} is outside [0, 1]"
            )));
        }

        let mut fractions = fractions.to_vec();
        fractions.sort_by(f32::total_cmp);
        fractions.dedup();

        Ok(Self {
            fractions,
            settle: DEFAULT_SETTLE,
            duration: DEFAULT_DURATION,
            ease: Easing::EaseInOutQuad,
        })
    }

    /// Builder: override timing
    pub fn timing(mut self, settle: f32, duration: f32, ease: Easing) -> Self {
        self.settle = settle.max(0.0);
        self.duration = duration.max(0.0);
        self.ease = ease;
        self
    }

    pub fn fractions(&self) -> &[f32] {
        &self.fractions
    }

    /// Closest fraction to `progress`; ties go to the lower one
    pub fn nearest(&self, progress: f32) -> f32 {
        self.fractions
            .iter()
            .copied()
            .min_by(|a, b| (a - progress).abs().total_cmp(&(b - progress).abs()))
            .unwrap_or(progress)
    }
}

/// What a snap did during one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapStep {
    /// Waiting for input to settle, or already resting on a snap point
    Idle,
    /// Animation toward `to` began this frame
    Started { to: f32 },
    /// Progress override while animating
    Animating(f32),
    /// Animation reached its target
    Finished(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct SnapAnimation {
    from: f32,
    to: f32,
    elapsed: f32,
}

/// Per-subscription snap state
#[derive(Clone, Debug, PartialEq)]
pub struct SnapState {
    config: SnapConfig,
    idle_for: f32,
    animation: Option<SnapAnimation>,
    resting: bool,
}

impl SnapState {
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            idle_for: 0.0,
            animation: None,
            resting: false,
        }
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// New scroll input: restart the settle timer and cancel any animation
    pub fn reset(&mut self) {
        self.idle_for = 0.0;
        self.animation = None;
        self.resting = false;
    }

    /// Advance by `dt`. `progress` is the current progress and `ready` tells
    /// whether it has stopped moving on its own.
    pub fn advance(&mut self, dt: f32, progress: f32, ready: bool) -> SnapStep {
        if let Some(animation) = &mut self.animation {
            animation.elapsed += dt;
            if animation.elapsed >= self.config.duration {
                let to = animation.to;
                self.animation = None;
                self.resting = true;
                return SnapStep::Finished(to);
            }
            let t = self.config.ease.apply(animation.elapsed / self.config.duration);
            return SnapStep::Animating(animation.from + (animation.to - animation.from) * t);
        }

        if self.resting || !ready {
            return SnapStep::Idle;
        }

        self.idle_for += dt;
        if self.idle_for < self.config.settle {
            return SnapStep::Idle;
        }

        let to = self.config.nearest(progress);
        if (to - progress).abs() <= f32::EPSILON {
            self.resting = true;
            return SnapStep::Idle;
        }
        self.animation = Some(SnapAnimation {
            from: progress,
            to,
            elapsed: 0.0,
        });
        SnapStep::Started { to }
    }
}
