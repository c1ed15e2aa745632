//! Scroll windows
//!
//! A [`ScrollWindow`] is the scroll range over which a timeline's progress runs
//! from 0 to 1. Positions are either absolute document offsets or anchors of
//! a trigger element matched against anchors of the viewport:
//!
//! ```text
//! "70% top"  ->  trigger.top + 0.7 * trigger.height - 0.0 * viewport.height
//! ```

use std::str::FromStr;

use folio_core::{FolioError, Result, Selector, Size};

use crate::scene::{ElementId, Scene};

/// A point on an element or on the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Fraction of the extent, in percent (`top` = 0, `center` = 50, `bottom` = 100)
    Percent(f32),
    /// Pixels from the leading edge
    Px(f32),
}

impl Anchor {
    pub const TOP: Anchor = Anchor::Percent(0.0);
    pub const CENTER: Anchor = Anchor::Percent(50.0);
    pub const BOTTOM: Anchor = Anchor::Percent(100.0);

    pub fn resolve(self, extent: f32) -> f32 {
        match self {
            Anchor::Percent(pct) => extent * pct / 100.0,
            Anchor::Px(px) => px,
        }
    }
}

impl FromStr for Anchor {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FolioError::invalid(format!("invalid anchor `{s}`"));
        let anchor = match s {
            "top" | "left" => Anchor::TOP,
            "center" => Anchor::CENTER,
            "bottom" | "right" => Anchor::BOTTOM,
            _ => {
                if let Some(pct) = s.strip_suffix('%') {
                    Anchor::Percent(pct.parse().map_err(|_| invalid())?)
                } else {
                    let px = s.strip_suffix("px").unwrap_or(s);
                    Anchor::Px(px.parse().map_err(|_| invalid())?)
                }
            }
        };
        match anchor {
            Anchor::Percent(v) | Anchor::Px(v) if !v.is_finite() => Err(invalid()),
            _ => Ok(anchor),
        }
    }
}

/// A window boundary
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollPosition {
    /// Absolute document scroll offset in pixels
    Absolute(f32),
    /// Scroll offset at which `element` (on the trigger) meets `viewport`
    Relative { element: Anchor, viewport: Anchor },
}

impl ScrollPosition {
    pub fn relative(element: Anchor, viewport: Anchor) -> Self {
        ScrollPosition::Relative { element, viewport }
    }

    fn is_finite(&self) -> bool {
        match self {
            ScrollPosition::Absolute(v) => v.is_finite(),
            ScrollPosition::Relative { .. } => true,
        }
    }
}

impl FromStr for ScrollPosition {
    type Err = FolioError;

    /// Parse `"400"` (absolute) or `"<element anchor> <viewport anchor>"`
    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.as_slice() {
            [single] => single
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(ScrollPosition::Absolute)
                .ok_or_else(|| FolioError::invalid(format!("invalid scroll position `{s}`"))),
            [element, viewport] => Ok(ScrollPosition::Relative {
                element: element.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(FolioError::invalid(format!(
                "scroll position `{s}` must be an offset or two anchors"
            ))),
        }
    }
}

/// How scroll position drives progress
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Scrub {
    /// Progress plays forward in time once the window start is reached
    Off,
    /// Progress tracks the position immediately and exactly
    #[default]
    Exact,
    /// Progress catches up with the position over roughly this many seconds
    Lag(f32),
}

impl From<bool> for Scrub {
    fn from(scrub: bool) -> Self {
        if scrub {
            Scrub::Exact
        } else {
            Scrub::Off
        }
    }
}

impl From<f32> for Scrub {
    fn from(lag: f32) -> Self {
        Scrub::Lag(lag)
    }
}

/// A scroll range bound to a timeline
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollWindow {
    pub trigger: Option<Selector>,
    pub start: ScrollPosition,
    pub end: ScrollPosition,
    pub scrub: Scrub,
    /// Element held in place while the position is inside the window
    pub pin: Option<Selector>,
}

impl ScrollWindow {
    pub fn new(start: ScrollPosition, end: ScrollPosition) -> Self {
        Self {
            trigger: None,
            start,
            end,
            scrub: Scrub::Exact,
            pin: None,
        }
    }

    /// Window between two absolute offsets
    pub fn absolute(start: f32, end: f32) -> Self {
        Self::new(ScrollPosition::Absolute(start), ScrollPosition::Absolute(end))
    }

    /// Window relative to a trigger element, e.g. `("top top", "bottom top")`
    pub fn triggered(trigger: Selector, start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(start.parse()?, end.parse()?).trigger(trigger))
    }

    /// Builder: set the trigger element
    pub fn trigger(mut self, trigger: Selector) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Builder: set the scrub mode
    pub fn scrub(mut self, scrub: impl Into<Scrub>) -> Self {
        self.scrub = scrub.into();
        self
    }

    /// Builder: pin an element for the window's duration
    pub fn pin(mut self, pin: Selector) -> Self {
        self.pin = Some(pin);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Scrub::Lag(lag) = self.scrub {
            if !lag.is_finite() || lag < 0.0 {
                return Err(FolioError::invalid(format!(
                    "scrub lag must be a non-negative duration, got {lag}"
                )));
            }
        }
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(FolioError::invalid("window bounds must be finite"));
        }
        let relative = |p: &ScrollPosition| matches!(p, ScrollPosition::Relative { .. });
        if self.trigger.is_none() && (relative(&self.start) || relative(&self.end)) {
            return Err(FolioError::invalid(
                "relative window positions need a trigger element",
            ));
        }
        Ok(())
    }

    /// Resolve both bounds against the live scene.
    ///
    /// Fails with `ReferenceNotFound` when the trigger matches nothing.
    pub fn resolve(&self, scene: &Scene, viewport: Size) -> Result<ResolvedWindow> {
        self.validate()?;

        let trigger = match &self.trigger {
            Some(selector) => Some(
                scene
                    .select_first(selector)
                    .ok_or_else(|| FolioError::not_found(selector))?,
            ),
            None => None,
        };
        let rect = trigger.and_then(|id| scene.get(id)).map(|e| e.rect());

        let resolve = |position: ScrollPosition| match (position, rect) {
            (ScrollPosition::Absolute(offset), _) => offset,
            (ScrollPosition::Relative { element, viewport: anchor }, Some(rect)) => {
                rect.y() + element.resolve(rect.height()) - anchor.resolve(viewport.height)
            }
            // validate() rules out relative positions without a trigger
            (ScrollPosition::Relative { .. }, None) => 0.0,
        };

        let start = resolve(self.start);
        let end = resolve(self.end);
        if end < start {
            return Err(FolioError::invalid(format!(
                "window ends at {end} before it starts at {start}"
            )));
        }

        Ok(ResolvedWindow {
            start,
            end,
            trigger,
        })
    }
}

/// A window with concrete scroll offsets
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedWindow {
    pub start: f32,
    pub end: f32,
    pub trigger: Option<ElementId>,
}

impl ResolvedWindow {
    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    /// `clamp((position - start) / (end - start), 0, 1)`; a zero-length window
    /// is a threshold at `start`.
    pub fn progress(&self, position: f32) -> f32 {
        let length = self.length();
        if length <= 0.0 {
            return if position < self.start { 0.0 } else { 1.0 };
        }
        ((position - self.start) / length).clamp(0.0, 1.0)
    }

    /// Scroll position at which progress equals `progress`
    pub fn position_at(&self, progress: f32) -> f32 {
        self.start + self.length() * progress.clamp(0.0, 1.0)
    }

    pub fn contains(&self, position: f32) -> bool {
        position >= self.start && position <= self.end
    }
}
