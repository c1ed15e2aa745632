//! Animation scheduler
//!
//! Drives time-based playheads (idle loops) on a fixed time step, independent
//! of scroll input. Frame deltas are accumulated and consumed in whole steps.

use slotmap::{new_key_type, SlotMap};

use crate::timeline::Playhead;

new_key_type! {
    pub struct PlayheadId;
}

/// Default step: one 60 Hz frame
pub const DEFAULT_FIXED_STEP: f32 = 1.0 / 60.0;

/// Most fixed steps one tick may take; time beyond that is dropped
pub const MAX_STEPS_PER_TICK: u32 = 240;

/// The animation scheduler that ticks all time-driven playheads
pub struct AnimationScheduler {
    playheads: SlotMap<PlayheadId, Playhead>,
    fixed_step: f32,
    accumulator: f32,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::with_fixed_step(DEFAULT_FIXED_STEP)
    }

    pub fn with_fixed_step(step: f32) -> Self {
        Self {
            playheads: SlotMap::with_key(),
            fixed_step: if step > 0.0 { step } else { DEFAULT_FIXED_STEP },
            accumulator: 0.0,
        }
    }

    pub fn fixed_step(&self) -> f32 {
        self.fixed_step
    }

    /// Add a playhead and start it
    pub fn add(&mut self, mut playhead: Playhead) -> PlayheadId {
        playhead.start();
        self.playheads.insert(playhead)
    }

    pub fn get(&self, id: PlayheadId) -> Option<&Playhead> {
        self.playheads.get(id)
    }

    pub fn remove(&mut self, id: PlayheadId) -> Option<Playhead> {
        self.playheads.remove(id)
    }

    /// Accumulate `dt` seconds and advance every playhead by whole fixed steps.
    ///
    /// Returns the number of steps taken.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if dt <= 0.0 || !dt.is_finite() {
            return 0;
        }
        self.accumulator += dt;

        // tolerate float drift so 60 frames of 1/60 s make 60 steps
        let due = ((self.accumulator + 1e-6) / self.fixed_step).floor();
        if due < 1.0 {
            return 0;
        }
        let steps = if due > MAX_STEPS_PER_TICK as f32 {
            tracing::debug!(
                dt,
                dropped = self.accumulator - MAX_STEPS_PER_TICK as f32 * self.fixed_step,
                "frame too long, dropping scheduler backlog"
            );
            self.accumulator = 0.0;
            MAX_STEPS_PER_TICK
        } else {
            self.accumulator = (self.accumulator - due * self.fixed_step).max(0.0);
            due as u32
        };

        for (_, playhead) in self.playheads.iter_mut() {
            for _ in 0..steps {
                playhead.tick(self.fixed_step);
            }
        }
        steps
    }

    pub fn len(&self) -> usize {
        self.playheads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playheads.is_empty()
    }

    pub fn clear(&mut self) {
        self.playheads.clear();
        self.accumulator = 0.0;
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}
