//! Scroll choreographer
//!
//! Binds the scroll position to registered timelines. Each subscription maps
//! its [`ScrollWindow`] onto timeline progress and writes the resulting
//! property values into the [`Scene`].
//!
//! # Evaluation order
//!
//! Subscriptions are evaluated in registration order, so when windows overlap
//! on the same element the later registration wins. Idle loops are evaluated
//! after all scroll subscriptions.
//!
//! # Example
//!
//! ```
//! use folio_animation::{Easing, Timeline, Tween, TweenVars};
//! use folio_core::{Rect, Selector, Size};
//! use folio_scroll::{Choreographer, Element, Scene, ScrollWindow};
//!
//! let mut scene = Scene::new();
//! let id = scene.insert(Element::new(Rect::new(0.0, 0.0, 100.0, 100.0)).class("pane"));
//!
//! let mut choreo = Choreographer::new(scene, Size::new(1280.0, 800.0));
//! let timeline = Timeline::new().with(
//!     Tween::from_to(
//!         Selector::class("pane"),
//!         TweenVars::new().opacity(0.0),
//!         TweenVars::new().opacity(1.0),
//!     )
//!     .ease(Easing::Linear),
//! );
//! choreo
//!     .register_timeline(ScrollWindow::absolute(0.0, 100.0), timeline)
//!     .unwrap();
//!
//! choreo.on_scroll(50.0);
//! assert_eq!(choreo.scene().get(id).unwrap().current().opacity, Some(0.5));
//! ```

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use folio_animation::{
    AnimationScheduler, Easing, Playhead, PlayheadId, Spring, SpringConfig, Timeline,
};
use folio_core::{FolioError, Result, Selector, Size};

use crate::context::{ContextGuard, ContextId, SubscriptionContext};
use crate::pin::{Pin, PinHandle, PinId};
use crate::scene::{Branch, ElementId, Scene};
use crate::snap::{self, SnapConfig, SnapState, SnapStep};
use crate::track::Track;
use crate::window::{ResolvedWindow, ScrollWindow, Scrub};

new_key_type! {
    pub struct SubscriptionId;
}

/// Handle returned by `register_timeline`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(SubscriptionId);

impl SubscriptionHandle {
    pub fn id(&self) -> SubscriptionId {
        self.0
    }
}

/// Handle returned by `add_idle_loop`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IdleHandle(PlayheadId);

/// Lifecycle of a subscription
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Unregistered,
    /// Registered but not yet evaluated
    Registered,
    /// Evaluated at least once
    Active,
    /// Removed; terminal
    Released,
}

/// Tunables
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChoreographerConfig {
    /// Idle loop time step in seconds
    pub fixed_step: f32,
    /// Input quiet time before a snap starts
    pub snap_settle: f32,
    /// Snap animation duration
    pub snap_duration: f32,
    pub snap_ease: Easing,
}

impl Default for ChoreographerConfig {
    fn default() -> Self {
        Self {
            fixed_step: folio_animation::scheduler::DEFAULT_FIXED_STEP,
            snap_settle: snap::DEFAULT_SETTLE,
            snap_duration: snap::DEFAULT_DURATION,
            snap_ease: Easing::EaseInOutQuad,
        }
    }
}

/// What one `on_scroll`/`frame`/`resize` call did
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Property sets written to elements
    pub writes: usize,
    /// Writes skipped because the element was unmounted
    pub skipped: usize,
    /// Scroll position a snap wants the host to move to
    pub scroll_request: Option<f32>,
}

impl FrameReport {
    fn absorb(&mut self, (writes, skipped): (usize, usize)) {
        self.writes += writes;
        self.skipped += skipped;
    }
}

/// Time-driven playback for `Scrub::Off`
#[derive(Clone, Debug)]
struct Playback {
    playhead: Playhead,
    triggered: bool,
}

#[derive(Clone, Debug)]
struct Subscription {
    window: ScrollWindow,
    resolved: ResolvedWindow,
    track: Track,
    /// Progress straight from the scroll position
    raw: f32,
    /// Progress last applied (or about to be)
    progress: f32,
    follower: Option<Spring>,
    playback: Option<Playback>,
    snap: Option<SnapState>,
    pin: Option<PinId>,
    context: Option<ContextId>,
    phase: Phase,
}

impl Subscription {
    /// Feed a new raw progress; returns true if applied progress changed
    fn retarget(&mut self, position: f32) -> bool {
        self.raw = self.resolved.progress(position);
        match (&mut self.follower, &mut self.playback) {
            (Some(follower), _) => {
                follower.set_target(self.raw);
                false
            }
            (None, Some(playback)) => {
                if !playback.triggered && position >= self.resolved.start {
                    playback.triggered = true;
                    tracing::debug!(start = self.resolved.start, "playback triggered");
                }
                false
            }
            (None, None) => {
                let changed = self.progress != self.raw;
                self.progress = self.raw;
                changed
            }
        }
    }

    /// Advance time-based state; returns true if applied progress changed
    fn step(&mut self, dt: f32, report: &mut FrameReport) -> bool {
        let before = self.progress;

        if let Some(follower) = &mut self.follower {
            if !self.snap.as_ref().is_some_and(SnapState::is_animating) {
                follower.step(dt);
                self.progress = follower.value().clamp(0.0, 1.0);
            }
        }
        if let Some(playback) = &mut self.playback {
            if playback.triggered && playback.playhead.is_playing() {
                playback.playhead.tick(dt);
                self.progress = playback.playhead.progress();
            }
        }
        if let Some(snap) = &mut self.snap {
            let ready = self.follower.as_ref().map_or(true, Spring::is_settled);
            match snap.advance(dt, self.progress, ready) {
                SnapStep::Idle => {}
                SnapStep::Started { to } => {
                    report.scroll_request = Some(self.resolved.position_at(to));
                }
                SnapStep::Animating(value) => self.progress = value,
                SnapStep::Finished(value) => {
                    self.progress = value;
                    if let Some(follower) = &mut self.follower {
                        follower.snap_to(value);
                    }
                }
            }
        }

        self.progress != before
    }
}

#[derive(Clone, Debug)]
struct IdleLoop {
    track: Track,
    context: Option<ContextId>,
}

/// The scroll choreographer
pub struct Choreographer {
    scene: Scene,
    viewport: Size,
    config: ChoreographerConfig,
    position: f32,
    subscriptions: SlotMap<SubscriptionId, Subscription>,
    order: Vec<SubscriptionId>,
    contexts: SlotMap<ContextId, SubscriptionContext>,
    pins: SlotMap<PinId, Pin>,
    pinned: FxHashMap<ElementId, PinId>,
    idle: AnimationScheduler,
    loops: IndexMap<PlayheadId, IdleLoop>,
}

impl Choreographer {
    pub fn new(scene: Scene, viewport: Size) -> Self {
        Self::with_config(scene, viewport, ChoreographerConfig::default())
    }

    pub fn with_config(scene: Scene, viewport: Size, config: ChoreographerConfig) -> Self {
        Self {
            scene,
            viewport,
            config,
            position: 0.0,
            subscriptions: SlotMap::with_key(),
            order: Vec::new(),
            contexts: SlotMap::with_key(),
            pins: SlotMap::with_key(),
            pinned: FxHashMap::default(),
            idle: AnimationScheduler::with_fixed_step(config.fixed_step),
            loops: IndexMap::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for mounting and unmounting; call
    /// [`Choreographer::refresh`] afterwards if layout changed
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn config(&self) -> &ChoreographerConfig {
        &self.config
    }

    /// Last scroll position received
    pub fn position(&self) -> f32 {
        self.position
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Bind `timeline` to `window`.
    ///
    /// Nothing is registered on failure.
    pub fn register_timeline(
        &mut self,
        window: ScrollWindow,
        timeline: Timeline,
    ) -> Result<SubscriptionHandle> {
        self.register(None, window, timeline)
    }

    /// Like [`Choreographer::register_timeline`], owned by `context`
    pub fn register_in(
        &mut self,
        context: ContextId,
        window: ScrollWindow,
        timeline: Timeline,
    ) -> Result<SubscriptionHandle> {
        self.register(Some(context), window, timeline)
    }

    fn owner_branch(&self, context: Option<ContextId>) -> Result<Option<Branch>> {
        match context {
            None => Ok(None),
            Some(id) => self
                .contexts
                .get(id)
                .map(|ctx| Some(ctx.branch.clone()))
                .ok_or_else(|| FolioError::invalid("context has been disposed")),
        }
    }

    fn check_branch(&self, element: ElementId, owner: Option<&Branch>, selector: &Selector) -> Result<()> {
        match self.scene.get(element).and_then(|e| e.branch()) {
            Some(branch) if owner != Some(branch) => Err(FolioError::invalid(format!(
                "`{selector}` belongs to branch `{branch}` outside its context"
            ))),
            _ => Ok(()),
        }
    }

    fn register(
        &mut self,
        context: Option<ContextId>,
        window: ScrollWindow,
        timeline: Timeline,
    ) -> Result<SubscriptionHandle> {
        let owner = self.owner_branch(context)?;
        let resolved = window.resolve(&self.scene, self.viewport)?;
        let track = Track::build(timeline, &self.scene, self.viewport, owner.as_ref())?;

        let pin_target = match &window.pin {
            Some(selector) => {
                let element = self
                    .scene
                    .select_first(selector)
                    .ok_or_else(|| FolioError::not_found(selector))?;
                self.check_branch(element, owner.as_ref(), selector)?;
                Some((element, window.clone()))
            }
            None => None,
        };

        let raw = resolved.progress(self.position);
        let (follower, playback, progress) = match window.scrub {
            Scrub::Lag(lag) if lag > 0.0 => (
                Some(Spring::new(SpringConfig::critically_damped(lag), raw)),
                None,
                raw,
            ),
            Scrub::Off => (
                None,
                Some(Playback {
                    playhead: {
                        let mut playhead = Playhead::new(track.schedule().duration);
                        playhead.start();
                        playhead
                    },
                    triggered: self.position >= resolved.start,
                }),
                0.0,
            ),
            Scrub::Exact | Scrub::Lag(_) => (None, None, raw),
        };

        let id = self.subscriptions.insert(Subscription {
            window,
            resolved,
            track,
            raw,
            progress,
            follower,
            playback,
            snap: None,
            pin: None,
            context,
            phase: Phase::Registered,
        });
        self.order.push(id);
        if let Some(ctx) = context.and_then(|c| self.contexts.get_mut(c)) {
            ctx.subscriptions.push(id);
        }

        if let Some((element, pin_window)) = pin_target {
            if self.pinned.contains_key(&element) {
                tracing::warn!(?element, "element already pinned; window pin not owned");
            } else {
                let pin = self.insert_pin(element, pin_window, resolved, None);
                if let Some(subscription) = self.subscriptions.get_mut(id) {
                    subscription.pin = Some(pin);
                }
            }
        }

        tracing::debug!(
            ?id,
            start = resolved.start,
            end = resolved.end,
            "timeline registered"
        );
        Ok(SubscriptionHandle(id))
    }

    /// Remove a subscription and restore any pin it owned.
    ///
    /// Returns false if it was already released.
    pub fn release(&mut self, handle: SubscriptionHandle) -> bool {
        let Some(subscription) = self.subscriptions.remove(handle.0) else {
            return false;
        };
        self.order.retain(|id| *id != handle.0);
        if let Some(ctx) = subscription.context.and_then(|c| self.contexts.get_mut(c)) {
            ctx.subscriptions.retain(|id| *id != handle.0);
        }
        if let Some(pin) = subscription.pin {
            self.remove_pin(pin);
        }
        tracing::debug!(id = ?handle.0, "timeline released");
        true
    }

    pub fn phase(&self, handle: SubscriptionHandle) -> Phase {
        self.subscriptions
            .get(handle.0)
            .map_or(Phase::Released, |s| s.phase)
    }

    /// Progress last applied, `None` once released
    pub fn progress(&self, handle: SubscriptionHandle) -> Option<f32> {
        self.subscriptions.get(handle.0).map(|s| s.progress)
    }

    /// Resolved scroll offsets of a subscription's window
    pub fn window(&self, handle: SubscriptionHandle) -> Option<ResolvedWindow> {
        self.subscriptions.get(handle.0).map(|s| s.resolved)
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Feed a new scroll position. Exact windows are applied immediately.
    pub fn on_scroll(&mut self, position: f32) -> FrameReport {
        if !position.is_finite() {
            tracing::warn!(position, "ignoring non-finite scroll position");
            return FrameReport::default();
        }

        let moved = position != self.position;
        self.position = position;

        let mut dirty = false;
        for subscription in self.subscriptions.values_mut() {
            if moved {
                if let Some(snap) = &mut subscription.snap {
                    snap.reset();
                }
                dirty |= subscription.retarget(position);
            }
            dirty |= subscription.phase == Phase::Registered;
        }
        self.update_pins();

        let mut report = FrameReport::default();
        if dirty {
            self.apply_subscriptions(&mut report);
        }
        report
    }

    /// Advance time by `dt` seconds: lag followers, snaps, non-scrubbed
    /// playback and idle loops.
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        let mut report = FrameReport::default();
        if !dt.is_finite() || dt < 0.0 {
            tracing::warn!(dt, "ignoring invalid frame delta");
            return report;
        }

        let mut dirty = false;
        for subscription in self.subscriptions.values_mut() {
            dirty |= subscription.step(dt, &mut report);
            dirty |= subscription.phase == Phase::Registered;
        }
        if dirty {
            self.apply_subscriptions(&mut report);
        }

        let steps = self.idle.tick(dt);
        if steps > 0 {
            self.apply_idle_loops(&mut report);
        }

        report
    }

    /// Re-resolve windows and viewport-relative values for a new viewport
    pub fn resize(&mut self, viewport: Size) -> FrameReport {
        let Size { width, height } = viewport;
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            tracing::warn!(width, height, "ignoring invalid viewport size");
            return FrameReport::default();
        }
        self.viewport = viewport;
        let bases_moved = self.scene.rebase(viewport);

        for (id, subscription) in self.subscriptions.iter_mut() {
            match subscription.window.resolve(&self.scene, viewport) {
                Ok(resolved) => subscription.resolved = resolved,
                Err(error) => {
                    tracing::warn!(?id, %error, "keeping previous window after resize");
                }
            }
            subscription.track.rebind(&self.scene, viewport, bases_moved);
            if let Some(snap) = &mut subscription.snap {
                snap.reset();
            }
            subscription.retarget(self.position);
        }
        for (id, pin) in self.pins.iter_mut() {
            match pin.window.resolve(&self.scene, viewport) {
                Ok(resolved) => pin.resolved = resolved,
                Err(error) => tracing::warn!(?id, %error, "keeping previous pin window"),
            }
        }
        for idle in self.loops.values_mut() {
            idle.track.rebind(&self.scene, viewport, bases_moved);
        }
        self.update_pins();

        let mut report = FrameReport::default();
        self.apply_subscriptions(&mut report);
        self.apply_idle_loops(&mut report);
        report
    }

    /// Re-measure after the scene changed
    pub fn refresh(&mut self) -> FrameReport {
        self.resize(self.viewport)
    }

    fn apply_subscriptions(&mut self, report: &mut FrameReport) {
        for id in &self.order {
            let Some(subscription) = self.subscriptions.get_mut(*id) else {
                continue;
            };
            report.absorb(subscription.track.apply(subscription.progress, &mut self.scene));
            if subscription.phase == Phase::Registered {
                subscription.phase = Phase::Active;
            }
        }
    }

    fn apply_idle_loops(&mut self, report: &mut FrameReport) {
        for (id, idle) in &self.loops {
            if let Some(playhead) = self.idle.get(*id) {
                report.absorb(idle.track.apply(playhead.progress(), &mut self.scene));
            }
        }
    }

    fn update_pins(&mut self) {
        for pin in self.pins.values_mut() {
            pin.update(self.position, &mut self.scene);
        }
    }

    // =========================================================================
    // Pins
    // =========================================================================

    /// Pin the first element matching `element` while the position is inside
    /// `window`. A window without a trigger is measured against the element.
    pub fn pin(&mut self, element: &Selector, window: ScrollWindow) -> Result<PinHandle> {
        self.pin_with(None, element, window)
    }

    pub fn pin_in(
        &mut self,
        context: ContextId,
        element: &Selector,
        window: ScrollWindow,
    ) -> Result<PinHandle> {
        self.pin_with(Some(context), element, window)
    }

    fn pin_with(
        &mut self,
        context: Option<ContextId>,
        selector: &Selector,
        mut window: ScrollWindow,
    ) -> Result<PinHandle> {
        let owner = self.owner_branch(context)?;
        let element = self
            .scene
            .select_first(selector)
            .ok_or_else(|| FolioError::not_found(selector))?;
        self.check_branch(element, owner.as_ref(), selector)?;

        if let Some(existing) = self.pinned.get(&element) {
            tracing::warn!(%selector, "element already pinned");
            return Ok(PinHandle(*existing));
        }

        if window.trigger.is_none() {
            window.trigger = Some(selector.clone());
        }
        let resolved = window.resolve(&self.scene, self.viewport)?;
        let id = self.insert_pin(element, window, resolved, context);
        if let Some(ctx) = context.and_then(|c| self.contexts.get_mut(c)) {
            ctx.pins.push(id);
        }
        Ok(PinHandle(id))
    }

    fn insert_pin(
        &mut self,
        element: ElementId,
        window: ScrollWindow,
        resolved: ResolvedWindow,
        context: Option<ContextId>,
    ) -> PinId {
        let original = self
            .scene
            .get(element)
            .map(|e| e.layout_flow())
            .unwrap_or_default();
        let mut pin = Pin::new(element, window, resolved, original);
        pin.context = context;
        pin.update(self.position, &mut self.scene);

        let id = self.pins.insert(pin);
        self.pinned.insert(element, id);
        tracing::debug!(?element, start = resolved.start, end = resolved.end, "element pinned");
        id
    }

    fn remove_pin(&mut self, id: PinId) -> bool {
        let Some(pin) = self.pins.remove(id) else {
            return false;
        };
        pin.restore(&mut self.scene);
        self.pinned.remove(&pin.element);
        if let Some(ctx) = pin.context.and_then(|c| self.contexts.get_mut(c)) {
            ctx.pins.retain(|p| *p != id);
        }
        true
    }

    /// Remove a pin and restore the element's pre-pin flow
    pub fn unpin(&mut self, handle: PinHandle) -> bool {
        self.remove_pin(handle.0)
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }

    pub fn is_pinned(&self, element: ElementId) -> bool {
        self.pinned.contains_key(&element)
    }

    // =========================================================================
    // Snap
    // =========================================================================

    /// Snap a scrubbed subscription's progress to `fractions` once input settles
    pub fn snap(&mut self, handle: SubscriptionHandle, fractions: &[f32]) -> Result<()> {
        let config = SnapConfig::new(fractions)?.timing(
            self.config.snap_settle,
            self.config.snap_duration,
            self.config.snap_ease,
        );
        let subscription = self
            .subscriptions
            .get_mut(handle.0)
            .ok_or_else(|| FolioError::invalid("cannot snap a released subscription"))?;
        if subscription.window.scrub == Scrub::Off {
            return Err(FolioError::invalid("snap requires a scrubbed window"));
        }
        subscription.snap = Some(SnapState::new(config));
        Ok(())
    }

    // =========================================================================
    // Idle loops
    // =========================================================================

    /// Play `timeline` on the fixed time step, independent of scroll.
    /// `repeat` is the number of extra iterations, -1 for infinite.
    pub fn add_idle_loop(&mut self, timeline: Timeline, repeat: i32, yoyo: bool) -> Result<IdleHandle> {
        self.add_idle(None, timeline, repeat, yoyo)
    }

    pub fn add_idle_loop_in(
        &mut self,
        context: ContextId,
        timeline: Timeline,
        repeat: i32,
        yoyo: bool,
    ) -> Result<IdleHandle> {
        self.add_idle(Some(context), timeline, repeat, yoyo)
    }

    fn add_idle(
        &mut self,
        context: Option<ContextId>,
        timeline: Timeline,
        repeat: i32,
        yoyo: bool,
    ) -> Result<IdleHandle> {
        let owner = self.owner_branch(context)?;
        let track = Track::build(timeline, &self.scene, self.viewport, owner.as_ref())?;
        let playhead = Playhead::new(track.schedule().duration)
            .repeat(repeat)
            .yoyo(yoyo);

        let id = self.idle.add(playhead);
        self.loops.insert(id, IdleLoop { track, context });
        if let Some(ctx) = context.and_then(|c| self.contexts.get_mut(c)) {
            ctx.loops.push(id);
        }
        tracing::debug!(?id, repeat, yoyo, "idle loop added");
        Ok(IdleHandle(id))
    }

    pub fn remove_idle_loop(&mut self, handle: IdleHandle) -> bool {
        let Some(idle) = self.loops.shift_remove(&handle.0) else {
            return false;
        };
        self.idle.remove(handle.0);
        if let Some(ctx) = idle.context.and_then(|c| self.contexts.get_mut(c)) {
            ctx.loops.retain(|l| *l != handle.0);
        }
        true
    }

    pub fn idle_loop_count(&self) -> usize {
        self.loops.len()
    }

    // =========================================================================
    // Contexts
    // =========================================================================

    /// Open a context for `branch`. Only one live context per branch.
    pub fn create_context(&mut self, branch: Branch) -> Result<ContextId> {
        if self.context_for(&branch).is_some() {
            return Err(FolioError::invalid(format!(
                "branch `{branch}` already has a live context"
            )));
        }
        tracing::debug!(%branch, "context created");
        Ok(self.contexts.insert(SubscriptionContext::new(branch)))
    }

    /// Release everything the context owns; returns how many items were torn down
    pub fn dispose(&mut self, context: ContextId) -> usize {
        let Some(ctx) = self.contexts.remove(context) else {
            return 0;
        };

        let mut released = 0;
        for id in ctx.subscriptions.iter().rev() {
            released += usize::from(self.release(SubscriptionHandle(*id)));
        }
        for id in &ctx.pins {
            released += usize::from(self.remove_pin(*id));
        }
        for id in &ctx.loops {
            released += usize::from(self.remove_idle_loop(IdleHandle(*id)));
        }
        tracing::debug!(branch = %ctx.branch, released, "context disposed");
        released
    }

    pub fn context_for(&self, branch: &Branch) -> Option<ContextId> {
        self.contexts
            .iter()
            .find(|(_, ctx)| &ctx.branch == branch)
            .map(|(id, _)| id)
    }

    pub fn context(&self, id: ContextId) -> Option<&SubscriptionContext> {
        self.contexts.get(id)
    }

    /// Open a context that is disposed when the guard drops
    pub fn scoped(&mut self, branch: Branch) -> Result<ContextGuard<'_>> {
        let id = self.create_context(branch)?;
        Ok(ContextGuard::new(self, id))
    }

    /// Tear down every subscription, pin, idle loop and context
    pub fn kill_all(&mut self) -> usize {
        let contexts: Vec<ContextId> = self.contexts.keys().collect();
        let mut released: usize = contexts.into_iter().map(|c| self.dispose(c)).sum();

        for id in std::mem::take(&mut self.order).into_iter().rev() {
            released += usize::from(self.release(SubscriptionHandle(id)));
        }
        let pins: Vec<PinId> = self.pins.keys().collect();
        for id in pins {
            released += usize::from(self.remove_pin(id));
        }
        let loops: Vec<PlayheadId> = self.loops.keys().copied().collect();
        for id in loops {
            released += usize::from(self.remove_idle_loop(IdleHandle(id)));
        }
        self.idle.clear();

        tracing::debug!(released, "all animations killed");
        released
    }

    pub fn active_subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Live subscriptions owned by `context`; 0 once disposed
    pub fn active_count_in(&self, context: ContextId) -> usize {
        self.contexts
            .get(context)
            .map_or(0, SubscriptionContext::subscription_count)
    }
}
