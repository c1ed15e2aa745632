//! Folio Core
//!
//! Foundational primitives shared by the Folio scroll choreography crates:
//!
//! - **Geometry**: points, sizes, rects and viewport-relative lengths
//! - **Selectors**: stable identifiers for animation targets (`.class`, `#id`)
//! - **Events**: the upstream input vocabulary (scroll, resize, frame)
//! - **State Machines**: small typed statecharts for view and lifecycle state
//! - **Errors**: the shared error taxonomy
//!
//! # Example
//!
//! ```rust
//! use folio_core::{Length, Selector, Size};
//!
//! let viewport = Size::new(1280.0, 800.0);
//! assert_eq!(Length::Vw(40.0).resolve(viewport), 512.0);
//!
//! let selector: Selector = ".puzzle-piece".parse().unwrap();
//! assert!(selector.matches(None, &["puzzle-piece"]));
//! ```

pub mod error;
pub mod events;
pub mod fsm;
pub mod geometry;
pub mod selector;

pub use error::{FolioError, Result};
pub use events::{Event, EventData, EventType};
pub use fsm::StateMachine;
pub use geometry::{Length, Point, Rect, Size};
pub use selector::Selector;
