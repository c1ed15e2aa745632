//! Tweens
//!
//! A tween animates every element matched by one selector from a start
//! property set to an end property set over a fixed duration.

use folio_core::{FolioError, Length, Result, Selector, Size};

use crate::easing::Easing;
use crate::props::Props;
use crate::stagger::Stagger;

/// Default tween duration in seconds
pub const DEFAULT_DURATION: f32 = 0.5;

/// Property values as authored, before viewport-relative lengths are resolved
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TweenVars {
    pub opacity: Option<f32>,
    pub x: Option<Length>,
    pub y: Option<Length>,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    pub rotate: Option<f32>,
}

impl TweenVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }

    pub fn x(mut self, value: impl Into<Length>) -> Self {
        self.x = Some(value.into());
        self
    }

    pub fn y(mut self, value: impl Into<Length>) -> Self {
        self.y = Some(value.into());
        self
    }

    /// Uniform scale
    pub fn scale(mut self, value: f32) -> Self {
        self.scale_x = Some(value);
        self.scale_y = Some(value);
        self
    }

    pub fn scale_x(mut self, value: f32) -> Self {
        self.scale_x = Some(value);
        self
    }

    pub fn scale_y(mut self, value: f32) -> Self {
        self.scale_y = Some(value);
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }

    /// True if any length depends on the viewport
    pub fn is_viewport_relative(&self) -> bool {
        self.x.is_some_and(Length::is_relative) || self.y.is_some_and(Length::is_relative)
    }

    /// Resolve lengths against the viewport
    pub fn resolve(&self, viewport: Size) -> Props {
        Props {
            opacity: self.opacity,
            translate_x: self.x.map(|l| l.resolve(viewport)),
            translate_y: self.y.map(|l| l.resolve(viewport)),
            scale_x: self.scale_x,
            scale_y: self.scale_y,
            rotate: self.rotate,
        }
    }

    fn is_finite(&self) -> bool {
        let lengths = [self.x, self.y].into_iter().flatten().all(|l| match l {
            Length::Px(v) | Length::Vw(v) | Length::Vh(v) => v.is_finite(),
        });
        let scalars = [self.opacity, self.scale_x, self.scale_y, self.rotate]
            .into_iter()
            .flatten()
            .all(f32::is_finite);
        lengths && scalars
    }
}

/// One step of a timeline
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    pub target: Selector,
    /// Explicit start values; unset properties continue from the target's
    /// current state
    pub from: Option<TweenVars>,
    pub to: TweenVars,
    pub ease: Easing,
    /// Duration per target in seconds
    pub duration: f32,
    pub stagger: Option<Stagger>,
    /// Absolute start time in the timeline; `None` appends after the previous step
    pub position: Option<f32>,
}

impl Tween {
    /// Animate `target` to `to`
    pub fn to(target: Selector, to: TweenVars) -> Self {
        Self {
            target,
            from: None,
            to,
            ease: Easing::EaseOutQuad,
            duration: DEFAULT_DURATION,
            stagger: None,
            position: None,
        }
    }

    /// Animate `target` from `from` to `to`
    pub fn from_to(target: Selector, from: TweenVars, to: TweenVars) -> Self {
        Self {
            from: Some(from),
            ..Self::to(target, to)
        }
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = seconds;
        self
    }

    pub fn stagger(mut self, stagger: Stagger) -> Self {
        self.stagger = Some(stagger);
        self
    }

    pub fn at(mut self, position: f32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(FolioError::invalid(format!(
                "tween on `{}` has invalid duration {}",
                self.target, self.duration
            )));
        }
        if let Some(position) = self.position {
            if !position.is_finite() || position < 0.0 {
                return Err(FolioError::invalid(format!(
                    "tween on `{}` has invalid position {position}",
                    self.target
                )));
            }
        }
        if !self.to.is_finite() || !self.from.map_or(true, |from| from.is_finite()) {
            return Err(FolioError::invalid(format!(
                "tween on `{}` has non-finite property values",
                self.target
            )));
        }
        if let Some(stagger) = &self.stagger {
            stagger.validate()?;
        }
        Ok(())
    }

    pub fn is_viewport_relative(&self) -> bool {
        self.to.is_viewport_relative() || self.from.is_some_and(|f| f.is_viewport_relative())
    }
}
