//! Input events
//!
//! The hosting environment drives choreography with three kinds of input:
//! scroll positions, viewport resizes and per-frame ticks.

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const SCROLL: EventType = 30;
    pub const RESIZE: EventType = 40;
    /// Rendered-frame callback carrying the elapsed time
    pub const FRAME: EventType = 45;
}

/// An input event with associated data
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
    /// Milliseconds since the host started
    pub timestamp: u64,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Scroll {
        /// Absolute scroll offset of the document, in pixels
        position: f32,
    },
    Resize {
        width: f32,
        height: f32,
    },
    Frame {
        /// Seconds elapsed since the previous frame
        dt: f32,
    },
    None,
}

impl Event {
    pub fn scroll(position: f32) -> Self {
        Self {
            event_type: event_types::SCROLL,
            data: EventData::Scroll { position },
            timestamp: 0,
        }
    }

    pub fn resize(width: f32, height: f32) -> Self {
        Self {
            event_type: event_types::RESIZE,
            data: EventData::Resize { width, height },
            timestamp: 0,
        }
    }

    pub fn frame(dt: f32) -> Self {
        Self {
            event_type: event_types::FRAME,
            data: EventData::Frame { dt },
            timestamp: 0,
        }
    }

    /// Attach a host timestamp
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}
