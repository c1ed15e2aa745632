//! Stage: branch view state
//!
//! The [`Stage`] owns the choreographer and the set of mutually exclusive
//! content branches. Each branch is an element subtree plus a setup callback
//! that registers the branch's animations. Switching branches tears the old
//! subscriptions down before the new subtree is mounted and set up.
//!
//! ```text
//! switch_branch("about")
//!   dispose(context of "work")      -- subscriptions, pins, loops
//!   unmount elements of "work"
//!   mount elements of "about"
//!   scoped("about") -> setup(&mut guard)
//! ```

use indexmap::IndexMap;

use folio_core::{Event, EventData, FolioError, Result, Size, StateMachine};

use crate::choreographer::{Choreographer, ChoreographerConfig, FrameReport};
use crate::context::{ContextGuard, ContextId};
use crate::scene::{Branch, Element, Scene};

/// Registers a branch's animations inside its context
pub type BranchSetup = Box<dyn FnMut(&mut ContextGuard<'_>) -> Result<()>>;

struct BranchDef {
    elements: Vec<Element>,
    setup: Option<BranchSetup>,
}

/// Branch selection, by index into the stage's branch list
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SelectBranch(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayState {
    Hidden,
    Visible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayEvent {
    Show,
    Hide,
}

/// Builder for [`Stage`]
pub struct StageBuilder {
    scene: Scene,
    viewport: Size,
    config: ChoreographerConfig,
    branches: IndexMap<Branch, BranchDef>,
}

impl StageBuilder {
    pub fn config(mut self, config: ChoreographerConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a branch with its subtree and no animations
    pub fn branch(mut self, name: impl Into<Branch>, elements: Vec<Element>) -> Self {
        self.branches.insert(
            name.into(),
            BranchDef {
                elements,
                setup: None,
            },
        );
        self
    }

    /// Add a branch whose animations are registered by `setup`
    pub fn branch_with<F>(mut self, name: impl Into<Branch>, elements: Vec<Element>, setup: F) -> Self
    where
        F: FnMut(&mut ContextGuard<'_>) -> Result<()> + 'static,
    {
        self.branches.insert(
            name.into(),
            BranchDef {
                elements,
                setup: Some(Box::new(setup)),
            },
        );
        self
    }

    /// Build the stage and activate `initial`
    pub fn build(self, initial: &Branch) -> Result<Stage> {
        let index = self
            .branches
            .get_index_of(initial)
            .ok_or_else(|| FolioError::invalid(format!("unknown branch `{initial}`")))?;

        let count = self.branches.len();
        let mut view = StateMachine::builder(index);
        for from in 0..count {
            for to in (0..count).filter(|to| *to != from) {
                view = view.on(from, SelectBranch(to), to);
            }
        }

        let overlay = StateMachine::builder(OverlayState::Hidden)
            .on(OverlayState::Hidden, OverlayEvent::Show, OverlayState::Visible)
            .on(OverlayState::Visible, OverlayEvent::Hide, OverlayState::Hidden)
            .build();

        let mut stage = Stage {
            choreo: Choreographer::with_config(self.scene, self.viewport, self.config),
            branches: self.branches,
            view: view.build(),
            overlay,
            active: None,
        };
        stage.mount(index)?;
        Ok(stage)
    }
}

/// View-state holder for branches and the overlay
pub struct Stage {
    choreo: Choreographer,
    branches: IndexMap<Branch, BranchDef>,
    view: StateMachine<usize, SelectBranch>,
    overlay: StateMachine<OverlayState, OverlayEvent>,
    active: Option<ContextId>,
}

impl Stage {
    /// Start a stage over `scene`, which holds the elements shared by all branches
    pub fn builder(scene: Scene, viewport: Size) -> StageBuilder {
        StageBuilder {
            scene,
            viewport,
            config: ChoreographerConfig::default(),
            branches: IndexMap::new(),
        }
    }

    pub fn choreographer(&self) -> &Choreographer {
        &self.choreo
    }

    pub fn choreographer_mut(&mut self) -> &mut Choreographer {
        &mut self.choreo
    }

    pub fn active_branch(&self) -> Option<&Branch> {
        self.branches
            .get_index(self.view.current_state())
            .map(|(name, _)| name)
    }

    /// Context of the active branch, if its setup succeeded
    pub fn active_context(&self) -> Option<ContextId> {
        self.active
    }

    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.keys()
    }

    /// Activate `branch`. Returns false if it is already active.
    pub fn switch_branch(&mut self, branch: &Branch) -> Result<bool> {
        let next = self
            .branches
            .get_index_of(branch)
            .ok_or_else(|| FolioError::invalid(format!("unknown branch `{branch}`")))?;
        let current = self.view.current_state();
        if next == current && self.active.is_some() {
            return Ok(false);
        }

        if let Some(context) = self.active.take() {
            self.choreo.dispose(context);
        }
        if let Some((old, _)) = self.branches.get_index(current) {
            let removed = self.choreo.scene_mut().remove_branch(old);
            tracing::debug!(branch = %old, removed, "branch unmounted");
        }

        self.view.send(SelectBranch(next));
        self.mount(next)?;
        Ok(true)
    }

    fn mount(&mut self, index: usize) -> Result<()> {
        let Some((name, def)) = self.branches.get_index_mut(index) else {
            return Err(FolioError::invalid(format!("no branch at index {index}")));
        };

        for element in &def.elements {
            self.choreo
                .scene_mut()
                .insert(element.clone().in_branch(name.clone()));
        }
        self.choreo.refresh();

        let mut guard = self.choreo.scoped(name.clone())?;
        if let Some(setup) = def.setup.as_mut() {
            setup(&mut guard)?;
        }
        let context = guard.keep();
        self.active = Some(context);

        tracing::info!(
            branch = %name,
            subscriptions = self.choreo.active_count_in(context),
            "branch activated"
        );
        Ok(())
    }

    pub fn toggle_overlay(&mut self) -> OverlayState {
        let event = if self.overlay.is_in(OverlayState::Hidden) {
            OverlayEvent::Show
        } else {
            OverlayEvent::Hide
        };
        self.overlay.send(event)
    }

    pub fn set_overlay(&mut self, visible: bool) -> OverlayState {
        self.overlay.send(if visible {
            OverlayEvent::Show
        } else {
            OverlayEvent::Hide
        })
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_in(OverlayState::Visible)
    }

    /// Route an input event to the choreographer
    pub fn dispatch(&mut self, event: &Event) -> FrameReport {
        match event.data {
            EventData::Scroll { position } => self.choreo.on_scroll(position),
            EventData::Resize { width, height } => self.choreo.resize(Size::new(width, height)),
            EventData::Frame { dt } => self.choreo.frame(dt),
            EventData::None => FrameReport::default(),
        }
    }

    /// Unmount: kill every animation
    pub fn teardown(&mut self) -> usize {
        self.active = None;
        self.choreo.kill_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::ScrollWindow;
    use folio_animation::{Timeline, TweenVars};
    use folio_core::{Rect, Selector};

    fn card(class: &str) -> Element {
        Element::new(Rect::new(0.0, 0.0, 100.0, 100.0)).class(class)
    }

    fn fade(class: &'static str) -> impl FnMut(&mut ContextGuard<'_>) -> Result<()> {
        move |ctx| {
            let timeline = Timeline::new().to(Selector::class(class), TweenVars::new().opacity(0.0));
            ctx.register_timeline(ScrollWindow::absolute(0.0, 100.0), timeline)?;
            ctx.register_timeline(
                ScrollWindow::absolute(100.0, 200.0),
                Timeline::new().to(Selector::class(class), TweenVars::new().opacity(1.0)),
            )?;
            Ok(())
        }
    }

    fn stage() -> Stage {
        Stage::builder(Scene::new(), Size::new(1000.0, 800.0))
            .branch_with("work", vec![card("work-card")], fade("work-card"))
            .branch_with("about", vec![card("about-card")], fade("about-card"))
            .build(&Branch::from("work"))
            .unwrap()
    }

    #[test]
    fn test_switch_replaces_subscriptions() {
        let mut stage = stage();
        assert_eq!(stage.choreographer().active_subscription_count(), 2);
        let work_ctx = stage.active_context().unwrap();

        assert!(stage.switch_branch(&Branch::from("about")).unwrap());
        assert_eq!(stage.active_branch(), Some(&Branch::from("about")));
        assert_eq!(stage.choreographer().active_count_in(work_ctx), 0);
        assert_eq!(stage.choreographer().active_subscription_count(), 2);
        assert!(stage
            .choreographer()
            .scene()
            .select(&Selector::class("work-card"))
            .is_empty());

        assert!(!stage.switch_branch(&Branch::from("about")).unwrap());
        assert!(stage.switch_branch(&Branch::from("nope")).is_err());
    }

    #[test]
    fn test_failed_setup_disposes_context() {
        let mut stage = Stage::builder(Scene::new(), Size::new(1000.0, 800.0))
            .branch("work", vec![card("work-card")])
            .branch_with("broken", vec![card("broken-card")], |ctx: &mut ContextGuard<'_>| {
                ctx.register_timeline(
                    ScrollWindow::absolute(0.0, 100.0),
                    Timeline::new().to(Selector::class("broken-card"), TweenVars::new().opacity(0.0)),
                )?;
                ctx.register_timeline(
                    ScrollWindow::absolute(0.0, 100.0),
                    Timeline::new().to(Selector::id("missing"), TweenVars::new().opacity(0.0)),
                )?;
                Ok(())
            })
            .build(&Branch::from("work"))
            .unwrap();

        assert!(stage.switch_branch(&Branch::from("broken")).is_err());
        assert_eq!(stage.choreographer().active_subscription_count(), 0);
        assert!(stage
            .choreographer()
            .context_for(&Branch::from("broken"))
            .is_none());
    }

    #[test]
    fn test_overlay_toggle() {
        let mut stage = stage();
        assert!(!stage.overlay_visible());
        assert_eq!(stage.toggle_overlay(), OverlayState::Visible);
        assert!(stage.overlay_visible());
        assert_eq!(stage.set_overlay(true), OverlayState::Visible);
        assert_eq!(stage.toggle_overlay(), OverlayState::Hidden);
    }

    #[test]
    fn test_dispatch_and_teardown() {
        let mut stage = stage();
        let report = stage.dispatch(&Event::scroll(50.0));
        assert_eq!(report.writes, 2);
        assert_eq!(stage.teardown(), 2);
        assert_eq!(stage.choreographer().active_subscription_count(), 0);
        assert_eq!(stage.dispatch(&Event::frame(0.016)), FrameReport::default());
    }
}
