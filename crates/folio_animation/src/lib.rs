//! Folio Animation System
//!
//! Tweens, stagger distribution, timelines and spring physics used by the
//! scroll choreographer.
//!
//! # Features
//!
//! - **Easing**: polynomial, sine and CSS cubic-bezier curves, parsed from
//!   tween-library names such as `power2.inOut`
//! - **Tweens**: from/to property sets with viewport-relative lengths
//! - **Stagger**: linear, grid and random start-offset distribution
//! - **Timelines**: ordered tweens laid out into a [`Schedule`]
//! - **Springs**: RK4-integrated springs; critically damped ones smooth lagged scrubbing
//! - **Scheduler**: fixed-step driver for time-based idle loops

pub mod easing;
pub mod props;
pub mod scheduler;
pub mod spring;
pub mod stagger;
pub mod timeline;
pub mod tween;

pub use easing::Easing;
pub use props::Props;
pub use scheduler::{AnimationScheduler, PlayheadId};
pub use spring::{Spring, SpringConfig};
pub use stagger::{Stagger, StaggerOrigin, StaggerPattern};
pub use timeline::{Playhead, Schedule, ScheduledTween, Timeline, TimelineEntryId};
pub use tween::{Tween, TweenVars};
