//! Timeline orchestration for multiple tweens
//!
//! A [`Timeline`] is an ordered list of tweens. Laying it out against the number
//! of elements each tween targets produces a [`Schedule`]: absolute start
//! times, per-target stagger offsets and the total duration that scroll
//! progress (or a [`Playhead`]) is mapped onto.

use slotmap::{new_key_type, SlotMap};

use folio_core::{Result, Selector};

use crate::easing::Easing;
use crate::tween::{Tween, TweenVars};

new_key_type! {
    pub struct TimelineEntryId;
}

/// An ordered sequence of tweens
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    entries: SlotMap<TimelineEntryId, Tween>,
    order: Vec<TimelineEntryId>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tween
    pub fn add(&mut self, tween: Tween) -> TimelineEntryId {
        let id = self.entries.insert(tween);
        self.order.push(id);
        id
    }

    /// Builder: append a tween
    pub fn with(mut self, tween: Tween) -> Self {
        self.add(tween);
        self
    }

    /// Builder: append a `to` tween with default timing
    pub fn to(self, target: Selector, vars: TweenVars) -> Self {
        self.with(Tween::to(target, vars))
    }

    pub fn get(&self, id: TimelineEntryId) -> Option<&Tween> {
        self.entries.get(id)
    }

    /// Tweens in insertion order
    pub fn tweens(&self) -> impl Iterator<Item = &Tween> {
        self.order.iter().filter_map(|id| self.entries.get(*id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        self.tweens().try_for_each(Tween::validate)
    }

    /// Lay the timeline out for the given number of targets per tween.
    ///
    /// `counts` is indexed like [`Timeline::tweens`]. Stagger offsets are
    /// computed here once, so random orders stay fixed for the schedule's life.
    pub fn schedule(&self, counts: &[usize]) -> Result<Schedule> {
        self.validate()?;

        let mut entries = Vec::with_capacity(self.len());
        let mut duration = 0.0f32;

        for (tween, &count) in self.tweens().zip(counts) {
            let offsets = match &tween.stagger {
                Some(stagger) => stagger.offsets(count)?,
                None => vec![0.0; count],
            };
            let start = tween.position.unwrap_or(duration);
            let entry = ScheduledTween {
                start,
                duration: tween.duration,
                ease: tween.ease,
                offsets,
            };
            duration = duration.max(entry.end());
            entries.push(entry);
        }

        tracing::trace!(tweens = entries.len(), duration, "timeline scheduled");
        Ok(Schedule { entries, duration })
    }
}

/// A tween placed on the timeline
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledTween {
    /// Start of the first target, in seconds
    pub start: f32,
    /// Duration per target, in seconds
    pub duration: f32,
    pub ease: Easing,
    /// Per-target start offsets relative to `start`
    pub offsets: Vec<f32>,
}

impl ScheduledTween {
    /// Time at which the last target finishes
    pub fn end(&self) -> f32 {
        let spread = self.offsets.iter().copied().fold(0.0f32, f32::max);
        self.start + spread + self.duration
    }

    /// Eased progress of one target at timeline `time`, or `None` before it starts
    pub fn progress(&self, target: usize, time: f32) -> Option<f32> {
        let start = self.start + self.offsets.get(target).copied().unwrap_or(0.0);
        if time < start {
            return None;
        }
        if self.duration <= 0.0 {
            return Some(1.0);
        }
        let local = ((time - start) / self.duration).clamp(0.0, 1.0);
        Some(self.ease.apply(local))
    }
}

/// A timeline laid out against concrete target counts
#[derive(Clone, Debug, PartialEq)]
pub struct Schedule {
    pub entries: Vec<ScheduledTween>,
    /// Total duration in seconds
    pub duration: f32,
}

impl Schedule {
    /// Map normalized progress (0..=1) to timeline time
    pub fn time_at(&self, progress: f32) -> f32 {
        progress.clamp(0.0, 1.0) * self.duration
    }
}

/// Time-driven playback position, used for idle loops and non-scrubbed windows
#[derive(Clone, Debug, PartialEq)]
pub struct Playhead {
    time: f32,
    duration: f32,
    repeat: i32, // -1 for infinite
    yoyo: bool,
    iteration: u32,
    playing: bool,
}

impl Playhead {
    pub fn new(duration: f32) -> Self {
        Self {
            time: 0.0,
            duration: duration.max(0.0),
            repeat: 0,
            yoyo: false,
            iteration: 0,
            playing: false,
        }
    }

    /// Builder: number of extra iterations, -1 for infinite
    pub fn repeat(mut self, count: i32) -> Self {
        self.repeat = count;
        self
    }

    /// Builder: reverse direction on every other iteration
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn start(&mut self) {
        self.time = 0.0;
        self.iteration = 0;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        if self.duration <= 0.0 {
            self.playing = false;
            return;
        }

        if dt <= 0.0 || !dt.is_finite() {
            return;
        }

        self.time += dt;
        if self.time < self.duration {
            return;
        }

        let wraps = (self.time / self.duration).floor();
        let remaining = if self.repeat == -1 {
            f32::INFINITY
        } else {
            (self.repeat as i64 - self.iteration as i64).max(0) as f32
        };
        if wraps <= remaining {
            self.time = (self.time - wraps * self.duration).clamp(0.0, self.duration);
            if self.time >= self.duration {
                self.time = 0.0;
            }
            // saturating cast; parity only matters for yoyo
            self.iteration = self.iteration.saturating_add(wraps as u32);
        } else {
            self.time = self.duration;
            self.iteration = self.repeat.max(0) as u32;
            self.playing = false;
        }
    }

    /// Normalized progress of the current iteration, mirrored on yoyo passes
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let raw = (self.time / self.duration).clamp(0.0, 1.0);
        if self.yoyo && self.iteration % 2 == 1 {
            1.0 - raw
        } else {
            raw
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stagger::Stagger;

    fn piece() -> Selector {
        Selector::class("piece")
    }

    #[test]
    fn test_tweens_append_sequentially() {
        let timeline = Timeline::new()
            .with(Tween::to(piece(), TweenVars::new().opacity(1.0)).duration(1.0))
            .with(Tween::to(piece(), TweenVars::new().scale(2.0)).duration(0.5));

        let schedule = timeline.schedule(&[1, 1]).unwrap();
        assert_eq!(schedule.entries[0].start, 0.0);
        assert_eq!(schedule.entries[1].start, 1.0);
        assert_eq!(schedule.duration, 1.5);
    }

    #[test]
    fn test_explicit_position_overlaps() {
        let timeline = Timeline::new()
            .with(Tween::to(piece(), TweenVars::new().opacity(1.0)).duration(1.0))
            .with(
                Tween::to(piece(), TweenVars::new().scale(2.0))
                    .duration(0.5)
                    .at(0.25),
            );
        let schedule = timeline.schedule(&[1, 1]).unwrap();
        assert_eq!(schedule.entries[1].start, 0.25);
        assert_eq!(schedule.duration, 1.0);
    }

    #[test]
    fn test_stagger_extends_duration() {
        let timeline = Timeline::new().with(
            Tween::to(piece(), TweenVars::new().scale(1.05)).stagger(Stagger::linear(1.0)),
        );
        let schedule = timeline.schedule(&[5]).unwrap();
        assert_eq!(schedule.duration, 1.5);
        assert_eq!(schedule.entries[0].offsets.len(), 5);
    }

    #[test]
    fn test_scheduled_progress() {
        let tween = ScheduledTween {
            start: 1.0,
            duration: 2.0,
            ease: Easing::Linear,
            offsets: vec![0.0, 1.0],
        };
        assert_eq!(tween.progress(0, 0.5), None);
        assert_eq!(tween.progress(0, 2.0), Some(0.5));
        assert_eq!(tween.progress(1, 2.0), Some(0.0));
        assert_eq!(tween.progress(1, 10.0), Some(1.0));
        assert_eq!(tween.end(), 4.0);
    }

    #[test]
    fn test_zero_duration_is_a_threshold() {
        let tween = ScheduledTween {
            start: 0.5,
            duration: 0.0,
            ease: Easing::Linear,
            offsets: vec![0.0],
        };
        assert_eq!(tween.progress(0, 0.4), None);
        assert_eq!(tween.progress(0, 0.5), Some(1.0));
    }

    #[test]
    fn test_playhead_yoyo_loops() {
        let mut playhead = Playhead::new(1.0).repeat(-1).yoyo(true);
        playhead.start();

        playhead.tick(0.25);
        assert!((playhead.progress() - 0.25).abs() < 1e-6);

        playhead.tick(1.0);
        assert_eq!(playhead.iteration(), 1);
        assert!((playhead.progress() - 0.75).abs() < 1e-6);
        assert!(playhead.is_playing());
    }

    #[test]
    fn test_playhead_finishes_after_repeats() {
        let mut playhead = Playhead::new(1.0).repeat(1);
        playhead.start();
        playhead.tick(5.0);
        assert!(!playhead.is_playing());
        assert_eq!(playhead.progress(), 1.0);
    }

    #[test]
    fn test_playhead_skips_many_iterations_at_once() {
        let mut looping = Playhead::new(1e-4).repeat(-1).yoyo(true);
        looping.start();
        looping.tick(600_000.0);
        assert!(looping.is_playing());
        assert!(looping.progress().is_finite());

        let mut finite = Playhead::new(0.5).repeat(3);
        finite.start();
        finite.tick(1.25);
        assert_eq!(finite.iteration(), 2);
        assert!((finite.progress() - 0.5).abs() < 1e-5);
        finite.tick(1e9);
        assert!(!finite.is_playing());
        assert_eq!(finite.iteration(), 3);
    }
}
