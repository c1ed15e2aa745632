//! Scene of animation targets
//!
//! A [`Scene`] is the DOM-like set of mounted elements the choreographer may
//! read (bounding boxes) and write (animated properties, layout flow). Elements
//! keep document order so selectors resolve deterministically.

use std::fmt;

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use folio_animation::{Props, TweenVars};
use folio_core::{Rect, Selector, Size};

new_key_type! {
    /// Unique identifier for a mounted element
    pub struct ElementId;
}

/// One of the mutually exclusive top-level content modes
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Branch(String);

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Branch {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Layout flow of an element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Flow {
    /// Scrolls with the document
    #[default]
    Normal,
    /// Fixed to the viewport by its own styling
    Fixed,
    /// Held in place by a pin; `offset` is the scroll distance absorbed so far
    Pinned { offset: f32 },
}

/// A DOM-like visual target
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    id: Option<String>,
    classes: SmallVec<[String; 2]>,
    rect: Rect,
    branch: Option<Branch>,
    flow: Flow,
    base: Props,
    /// Base values with viewport-relative lengths, re-resolved on resize
    relative_base: Option<TweenVars>,
    applied: Props,
}

impl Element {
    pub fn new(rect: Rect) -> Self {
        Self {
            id: None,
            classes: SmallVec::new(),
            rect,
            branch: None,
            flow: Flow::Normal,
            base: Props::IDENTITY,
            relative_base: None,
            applied: Props::default(),
        }
    }

    /// Builder: set the element id
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: add a class
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Builder: mark the element as part of a branch subtree
    pub fn in_branch(mut self, branch: Branch) -> Self {
        self.branch = Some(branch);
        self
    }

    /// Builder: set the initial layout flow
    pub fn flow(mut self, flow: Flow) -> Self {
        self.flow = flow;
        self
    }

    /// Builder: override base values that may use `vw`/`vh` lengths. They are
    /// resolved against `viewport` now and again by [`Scene::rebase`].
    pub fn base_vars(mut self, vars: TweenVars, viewport: Size) -> Self {
        self.base.merge(&vars.resolve(viewport));
        if vars.is_viewport_relative() {
            self.relative_base = Some(vars);
        }
        self
    }

    fn rebase(&mut self, viewport: Size) -> bool {
        match &self.relative_base {
            Some(vars) => {
                self.base.merge(&vars.resolve(viewport));
                true
            }
            None => false,
        }
    }

    pub fn element_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn branch(&self) -> Option<&Branch> {
        self.branch.as_ref()
    }

    pub fn layout_flow(&self) -> Flow {
        self.flow
    }

    pub fn base_props(&self) -> &Props {
        &self.base
    }

    /// Properties written by animations so far
    pub fn applied(&self) -> &Props {
        &self.applied
    }

    /// Base properties with animated values layered on top
    pub fn current(&self) -> Props {
        let mut props = self.base;
        props.merge(&self.applied);
        props
    }

    pub fn matches(&self, selector: &Selector) -> bool {
        selector.matches(self.id.as_deref(), self.classes.as_slice())
    }

    /// Label used in logs
    pub fn label(&self) -> String {
        match (&self.id, self.classes.first()) {
            (Some(id), _) => format!("#{id}"),
            (None, Some(class)) => format!(".{class}"),
            (None, None) => "<anonymous>".to_string(),
        }
    }
}

/// The set of mounted elements
#[derive(Clone, Debug, Default)]
pub struct Scene {
    elements: SlotMap<ElementId, Element>,
    order: Vec<ElementId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount an element at the end of the document
    pub fn insert(&mut self, element: Element) -> ElementId {
        let id = self.elements.insert(element);
        self.order.push(id);
        id
    }

    /// Re-resolve viewport-relative base values. Returns true if any element
    /// has some.
    pub fn rebase(&mut self, viewport: Size) -> bool {
        let mut rebased = false;
        for element in self.elements.values_mut() {
            rebased |= element.rebase(viewport);
        }
        rebased
    }

    /// Unmount an element
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let element = self.elements.remove(id)?;
        self.order.retain(|e| *e != id);
        Some(element)
    }

    /// Unmount every element of a branch subtree, returning how many were removed
    pub fn remove_branch(&mut self, branch: &Branch) -> usize {
        let doomed: Vec<ElementId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.elements[*id].branch.as_ref() == Some(branch))
            .collect();
        for id in &doomed {
            self.elements.remove(*id);
        }
        self.order.retain(|id| self.elements.contains_key(*id));
        doomed.len()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// All elements matching `selector`, in document order
    pub fn select(&self, selector: &Selector) -> SmallVec<[ElementId; 8]> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.elements[*id].matches(selector))
            .collect()
    }

    /// First element matching `selector`
    pub fn select_first(&self, selector: &Selector) -> Option<ElementId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.elements[*id].matches(selector))
    }

    /// Elements in document order
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.order.iter().map(|id| (*id, &self.elements[*id]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Merge animated properties into an element; false if it is gone
    pub fn apply(&mut self, id: ElementId, props: &Props) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => {
                element.applied.merge(props);
                true
            }
            None => false,
        }
    }

    /// Replace an element's layout flow, returning the previous one
    pub fn set_flow(&mut self, id: ElementId, flow: Flow) -> Option<Flow> {
        let element = self.elements.get_mut(id)?;
        Some(std::mem::replace(&mut element.flow, flow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece(i: usize) -> Element {
        Element::new(Rect::new(i as f32 * 10.0, 0.0, 10.0, 10.0)).class("piece")
    }

    #[test]
    fn test_select_keeps_document_order() {
        let mut scene = Scene::new();
        let a = scene.insert(piece(0));
        let b = scene.insert(piece(1));
        scene.insert(Element::new(Rect::ZERO).id("pane"));
        let c = scene.insert(piece(2));

        assert_eq!(
            scene.select(&Selector::class("piece")).as_slice(),
            &[a, b, c]
        );

        scene.remove(b);
        let d = scene.insert(piece(3));
        assert_eq!(
            scene.select(&Selector::class("piece")).as_slice(),
            &[a, c, d]
        );
    }

    #[test]
    fn test_remove_branch_unmounts_subtree() {
        let mut scene = Scene::new();
        let work = Branch::from("work");
        scene.insert(piece(0).in_branch(work.clone()));
        scene.insert(piece(1).in_branch(Branch::from("about")));
        scene.insert(piece(2));

        assert_eq!(scene.remove_branch(&work), 1);
        assert_eq!(scene.len(), 2);
        assert!(scene.iter().all(|(_, e)| e.branch() != Some(&work)));
    }

    #[test]
    fn test_apply_and_flow() {
        let mut scene = Scene::new();
        let id = scene.insert(piece(0).flow(Flow::Fixed));

        assert!(scene.apply(id, &Props::opacity(0.5)));
        assert_eq!(scene.get(id).unwrap().current().opacity, Some(0.5));
        assert_eq!(scene.get(id).unwrap().current().scale_x, Some(1.0));

        assert_eq!(
            scene.set_flow(id, Flow::Pinned { offset: 0.0 }),
            Some(Flow::Fixed)
        );

        scene.remove(id);
        assert!(!scene.apply(id, &Props::opacity(1.0)));
        assert_eq!(scene.set_flow(id, Flow::Normal), None);
    }

    #[test]
    fn test_relative_base_follows_viewport() {
        let mut scene = Scene::new();
        let vars = TweenVars::new().x(folio_core::Length::Vw(10.0)).opacity(0.0);
        let id = scene.insert(piece(0).base_vars(vars, Size::new(1000.0, 800.0)));
        let fixed = scene.insert(piece(1).base_vars(TweenVars::new().x(5.0), Size::ZERO));

        let base = *scene.get(id).unwrap().base_props();
        assert_eq!(base.translate_x, Some(100.0));
        assert_eq!(base.opacity, Some(0.0));

        assert!(scene.rebase(Size::new(500.0, 800.0)));
        let base = *scene.get(id).unwrap().base_props();
        assert_eq!(base.translate_x, Some(50.0));
        assert_eq!(base.opacity, Some(0.0));
        assert_eq!(scene.get(fixed).unwrap().base_props().translate_x, Some(5.0));

        scene.remove(id);
        assert!(!scene.rebase(Size::new(200.0, 200.0)));
    }
}
