//! Geometry primitives
//!
//! Scene elements are laid out in document coordinates: `y` grows downward from
//! the top of the scrollable document, independent of the current scroll offset.

use std::fmt;
use std::str::FromStr;

use crate::error::FolioError;

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Convert to a Rect at the origin (0, 0)
    pub const fn to_rect(self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self,
        }
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Document offset of the bottom edge
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }
}

/// A length that may be relative to the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    /// Absolute pixels
    Px(f32),
    /// Percentage of the viewport width
    Vw(f32),
    /// Percentage of the viewport height
    Vh(f32),
}

impl Length {
    /// Resolve to pixels against the current viewport
    pub fn resolve(self, viewport: Size) -> f32 {
        match self {
            Length::Px(px) => px,
            Length::Vw(pct) => viewport.width * pct / 100.0,
            Length::Vh(pct) => viewport.height * pct / 100.0,
        }
    }

    /// Whether this length changes when the viewport is resized
    pub fn is_relative(self) -> bool {
        !matches!(self, Length::Px(_))
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Px(0.0)
    }
}

impl From<f32> for Length {
    fn from(px: f32) -> Self {
        Length::Px(px)
    }
}

impl FromStr for Length {
    type Err = FolioError;

    /// Parse `"40vw"`, `"40vh"`, `"12px"` or a bare number of pixels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse = |number: &str| -> Result<f32, FolioError> {
            let value: f32 = number
                .trim()
                .parse()
                .map_err(|_| FolioError::invalid(format!("invalid length `{s}`")))?;
            if !value.is_finite() {
                return Err(FolioError::invalid(format!("non-finite length `{s}`")));
            }
            Ok(value)
        };

        if let Some(n) = s.strip_suffix("vw") {
            parse(n).map(Length::Vw)
        } else if let Some(n) = s.strip_suffix("vh") {
            parse(n).map(Length::Vh)
        } else if let Some(n) = s.strip_suffix("px") {
            parse(n).map(Length::Px)
        } else {
            parse(s).map(Length::Px)
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{v}px"),
            Length::Vw(v) => write!(f, "{v}vw"),
            Length::Vh(v) => write!(f, "{v}vh"),
        }
    }
}
