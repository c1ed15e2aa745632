//! Horizontal slide gallery
//!
//! A gallery is a track of `count` full-viewport slides laid out side by side
//! (`count * 100vw` wide) and translated horizontally. The track's offset as a
//! percentage of its own width is `-100 * index / count`; scrolled through a
//! window, the same travel is `-(count - 1) * 100vw`.

use folio_animation::{Easing, Timeline, Tween, TweenVars};
use folio_core::{Length, Selector};

/// Translate of the track, in percent of its own width, showing slide `index`
pub fn slide_offset(index: usize, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    -100.0 * index.min(count - 1) as f32 / count as f32
}

/// Progress fractions at which each slide is fully in view
pub fn snap_fractions(count: usize) -> Vec<f32> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        n => (0..n).map(|i| i as f32 / (n - 1) as f32).collect(),
    }
}

/// Slide closest to `progress`
pub fn slide_at(progress: f32, count: usize) -> usize {
    if count <= 1 {
        return 0;
    }
    let last = count - 1;
    ((progress.clamp(0.0, 1.0) * last as f32).round() as usize).min(last)
}

/// Linear tween sliding `track` from the first slide to the last
pub fn gallery_tween(track: Selector, count: usize) -> Tween {
    let travel = count.saturating_sub(1) as f32 * 100.0;
    Tween::to(track, TweenVars::new().x(Length::Vw(-travel)))
        .ease(Easing::Linear)
        .duration(1.0)
}

pub fn gallery_timeline(track: Selector, count: usize) -> Timeline {
    Timeline::new().with(gallery_tween(track, count))
}
