//! Folio Scroll
//!
//! Scroll-synchronized choreography over a DOM-like [`Scene`].
//!
//! - [`Choreographer`]: binds scroll windows to timelines, pins, snaps and idle loops
//! - [`ScrollWindow`]: trigger-relative or absolute scroll ranges with scrub modes
//! - Subscription contexts: everything a branch registers, disposed in one step
//! - [`Stage`]: switches between content branches and toggles the overlay
//! - [`gallery`]: horizontal slide track helpers

pub mod choreographer;
pub mod context;
pub mod gallery;
pub mod pin;
pub mod scene;
pub mod snap;
pub mod stage;
pub mod track;
pub mod window;

pub use choreographer::{
    Choreographer, ChoreographerConfig, FrameReport, IdleHandle, Phase, SubscriptionHandle,
    SubscriptionId,
};
pub use context::{ContextGuard, ContextId, SubscriptionContext};
pub use pin::{PinHandle, PinId};
pub use scene::{Branch, Element, ElementId, Flow, Scene};
pub use snap::SnapConfig;
pub use stage::{OverlayState, Stage, StageBuilder};
pub use track::Track;
pub use window::{Anchor, ResolvedWindow, ScrollPosition, ScrollWindow, Scrub};
