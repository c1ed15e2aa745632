//! Subscription contexts
//!
//! A context groups everything registered on behalf of one branch so it can
//! be torn down in one step. [`ContextGuard`] disposes its context when
//! dropped unless [`ContextGuard::keep`] is called.

use slotmap::new_key_type;

use folio_animation::{PlayheadId, Timeline};
use folio_core::{Result, Selector};

use crate::choreographer::{Choreographer, IdleHandle, SubscriptionHandle, SubscriptionId};
use crate::pin::{PinHandle, PinId};
use crate::scene::Branch;
use crate::window::ScrollWindow;

new_key_type! {
    pub struct ContextId;
}

/// Everything owned by one branch activation
#[derive(Clone, Debug)]
pub struct SubscriptionContext {
    pub(crate) branch: Branch,
    pub(crate) subscriptions: Vec<SubscriptionId>,
    pub(crate) pins: Vec<PinId>,
    pub(crate) loops: Vec<PlayheadId>,
}

impl SubscriptionContext {
    pub(crate) fn new(branch: Branch) -> Self {
        Self {
            branch,
            subscriptions: Vec::new(),
            pins: Vec::new(),
            loops: Vec::new(),
        }
    }

    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty() && self.pins.is_empty() && self.loops.is_empty()
    }
}

/// Scoped access to a live context
pub struct ContextGuard<'a> {
    choreo: &'a mut Choreographer,
    id: ContextId,
    armed: bool,
}

impl<'a> ContextGuard<'a> {
    pub(crate) fn new(choreo: &'a mut Choreographer, id: ContextId) -> Self {
        Self {
            choreo,
            id,
            armed: true,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn choreographer(&mut self) -> &mut Choreographer {
        self.choreo
    }

    pub fn register_timeline(
        &mut self,
        window: ScrollWindow,
        timeline: Timeline,
    ) -> Result<SubscriptionHandle> {
        self.choreo.register_in(self.id, window, timeline)
    }

    pub fn pin(&mut self, element: &Selector, window: ScrollWindow) -> Result<PinHandle> {
        self.choreo.pin_in(self.id, element, window)
    }

    pub fn snap(&mut self, handle: SubscriptionHandle, fractions: &[f32]) -> Result<()> {
        self.choreo.snap(handle, fractions)
    }

    pub fn add_idle_loop(&mut self, timeline: Timeline, repeat: i32, yoyo: bool) -> Result<IdleHandle> {
        self.choreo.add_idle_loop_in(self.id, timeline, repeat, yoyo)
    }

    /// Leave the context alive after the guard goes away
    pub fn keep(mut self) -> ContextId {
        self.armed = false;
        self.id
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.choreo.dispose(self.id);
        }
    }
}
