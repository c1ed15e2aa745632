//! Pinning
//!
//! A pinned element is held in place while the scroll position is inside its
//! window; its layout flow becomes [`Flow::Pinned`] and reverts to the flow
//! it had before pinning once the position leaves the window or the pin is
//! removed.

use slotmap::new_key_type;

use crate::context::ContextId;
use crate::scene::{ElementId, Flow, Scene};
use crate::window::{ResolvedWindow, ScrollWindow};

new_key_type! {
    pub struct PinId;
}

/// Handle returned by `Choreographer::pin`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PinHandle(pub(crate) PinId);

impl PinHandle {
    pub fn id(&self) -> PinId {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Pin {
    pub element: ElementId,
    pub window: ScrollWindow,
    pub resolved: ResolvedWindow,
    pub original: Flow,
    pub engaged: bool,
    pub context: Option<ContextId>,
}

impl Pin {
    pub fn new(element: ElementId, window: ScrollWindow, resolved: ResolvedWindow, original: Flow) -> Self {
        Self {
            element,
            window,
            resolved,
            original,
            engaged: false,
            context: None,
        }
    }

    /// Engage or release the pin for `position`
    pub fn update(&mut self, position: f32, scene: &mut Scene) {
        if self.resolved.contains(position) {
            let offset = position - self.resolved.start;
            if scene.set_flow(self.element, Flow::Pinned { offset }).is_none() {
                tracing::warn!(element = ?self.element, "pinned element is no longer mounted");
            }
            self.engaged = true;
        } else if self.engaged {
            scene.set_flow(self.element, self.original);
            self.engaged = false;
        }
    }

    /// Put the element back into its pre-pin flow
    pub fn restore(&self, scene: &mut Scene) {
        scene.set_flow(self.element, self.original);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Element;
    use folio_core::Rect;

    #[test]
    fn test_engages_inside_window_only() {
        let mut scene = Scene::new();
        let id = scene.insert(Element::new(Rect::new(0.0, 200.0, 100.0, 100.0)).flow(Flow::Fixed));
        let window = ScrollWindow::absolute(200.0, 600.0);
        let resolved = ResolvedWindow {
            start: 200.0,
            end: 600.0,
            trigger: None,
        };
        let mut pin = Pin::new(id, window, resolved, Flow::Fixed);

        pin.update(100.0, &mut scene);
        assert_eq!(scene.get(id).unwrap().layout_flow(), Flow::Fixed);

        pin.update(350.0, &mut scene);
        assert_eq!(
            scene.get(id).unwrap().layout_flow(),
            Flow::Pinned { offset: 150.0 }
        );

        pin.update(700.0, &mut scene);
        assert_eq!(scene.get(id).unwrap().layout_flow(), Flow::Fixed);

        pin.update(400.0, &mut scene);
        pin.restore(&mut scene);
        assert_eq!(scene.get(id).unwrap().layout_flow(), Flow::Fixed);
    }
}
