//! Animatable property sets
//!
//! [`Props`] is the set of visual properties a scene element exposes to the
//! choreographer. Every field is optional: an unset property is left untouched
//! when the set is written to an element.

/// Properties that can be animated on a scene element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Props {
    /// Opacity (0.0 to 1.0)
    pub opacity: Option<f32>,
    /// Translation X in pixels
    pub translate_x: Option<f32>,
    /// Translation Y in pixels
    pub translate_y: Option<f32>,
    /// Scale X factor
    pub scale_x: Option<f32>,
    /// Scale Y factor
    pub scale_y: Option<f32>,
    /// Rotation in degrees
    pub rotate: Option<f32>,
}

impl Props {
    /// Identity values for every property
    pub const IDENTITY: Props = Props {
        opacity: Some(1.0),
        translate_x: Some(0.0),
        translate_y: Some(0.0),
        scale_x: Some(1.0),
        scale_y: Some(1.0),
        rotate: Some(0.0),
    };

    /// Create properties with only opacity set
    pub fn opacity(value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..Default::default()
        }
    }

    /// Create properties with uniform scale
    pub fn scale(value: f32) -> Self {
        Self {
            scale_x: Some(value),
            scale_y: Some(value),
            ..Default::default()
        }
    }

    /// Create properties with translation
    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            translate_x: Some(x),
            translate_y: Some(y),
            ..Default::default()
        }
    }

    /// Builder: set opacity
    pub fn with_opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }

    /// Builder: set scale x and y separately
    pub fn with_scale_xy(mut self, x: f32, y: f32) -> Self {
        self.scale_x = Some(x);
        self.scale_y = Some(y);
        self
    }

    /// Builder: set translation
    pub fn with_translate(mut self, x: f32, y: f32) -> Self {
        self.translate_x = Some(x);
        self.translate_y = Some(y);
        self
    }

    /// Builder: set rotation
    pub fn with_rotate(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Props::default()
    }

    /// Interpolate between two property sets
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: lerp_opt(self.opacity, other.opacity, t),
            translate_x: lerp_opt(self.translate_x, other.translate_x, t),
            translate_y: lerp_opt(self.translate_y, other.translate_y, t),
            scale_x: lerp_opt(self.scale_x, other.scale_x, t),
            scale_y: lerp_opt(self.scale_y, other.scale_y, t),
            rotate: lerp_opt(self.rotate, other.rotate, t),
        }
    }

    /// Overwrite every property that `other` sets
    pub fn merge(&mut self, other: &Props) {
        self.opacity = other.opacity.or(self.opacity);
        self.translate_x = other.translate_x.or(self.translate_x);
        self.translate_y = other.translate_y.or(self.translate_y);
        self.scale_x = other.scale_x.or(self.scale_x);
        self.scale_y = other.scale_y.or(self.scale_y);
        self.rotate = other.rotate.or(self.rotate);
    }

    /// Keep only the properties that `mask` sets, taking values from `self`
    /// and falling back to `fallback` where `self` has none.
    pub fn masked(&self, mask: &Props, fallback: &Props) -> Props {
        fn pick(mask: Option<f32>, value: Option<f32>, fallback: Option<f32>) -> Option<f32> {
            mask.and(value.or(fallback))
        }
        Props {
            opacity: pick(mask.opacity, self.opacity, fallback.opacity),
            translate_x: pick(mask.translate_x, self.translate_x, fallback.translate_x),
            translate_y: pick(mask.translate_y, self.translate_y, fallback.translate_y),
            scale_x: pick(mask.scale_x, self.scale_x, fallback.scale_x),
            scale_y: pick(mask.scale_y, self.scale_y, fallback.scale_y),
            rotate: pick(mask.rotate, self.rotate, fallback.rotate),
        }
    }

    /// Get the resolved opacity (defaults to 1.0 if not set)
    pub fn resolved_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0)
    }

    /// Get the resolved scale (defaults to 1.0 if not set)
    pub fn resolved_scale(&self) -> (f32, f32) {
        (self.scale_x.unwrap_or(1.0), self.scale_y.unwrap_or(1.0))
    }

    /// Get the resolved translation (defaults to 0.0 if not set)
    pub fn resolved_translate(&self) -> (f32, f32) {
        (
            self.translate_x.unwrap_or(0.0),
            self.translate_y.unwrap_or(0.0),
        )
    }

    /// Get the resolved rotation (defaults to 0.0 if not set)
    pub fn resolved_rotate(&self) -> f32 {
        self.rotate.unwrap_or(0.0)
    }
}

/// Helper to interpolate optional values
fn lerp_opt(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}
