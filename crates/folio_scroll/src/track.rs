//! Timeline tracks
//!
//! A [`Track`] is a timeline bound to concrete scene elements: targets are
//! selected once, stagger offsets are fixed in the schedule, and every
//! (tween, element) pair gets resolved start and end property values.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use folio_animation::{Props, Schedule, Timeline};
use folio_core::{FolioError, Result, Size};

use crate::scene::{Branch, ElementId, Scene};

/// Resolved endpoints of one tween on one element
#[derive(Clone, Copy, Debug, PartialEq)]
struct Binding {
    element: ElementId,
    from: Props,
    to: Props,
    /// First tween touching this element; it owns the pre-start state
    leading: bool,
}

#[derive(Clone, Debug)]
pub struct Track {
    timeline: Timeline,
    schedule: Schedule,
    targets: Vec<SmallVec<[ElementId; 8]>>,
    bindings: Vec<Vec<Binding>>,
}

impl Track {
    /// Select targets and lay the timeline out.
    ///
    /// With `owner` set, targets may belong to that branch or to no branch;
    /// without it, targets must not belong to any branch.
    pub fn build(
        timeline: Timeline,
        scene: &Scene,
        viewport: Size,
        owner: Option<&Branch>,
    ) -> Result<Self> {
        timeline.validate()?;

        let mut targets = Vec::with_capacity(timeline.len());
        for tween in timeline.tweens() {
            let selected = scene.select(&tween.target);
            if selected.is_empty() {
                return Err(FolioError::not_found(&tween.target));
            }
            for id in &selected {
                let Some(branch) = scene.get(*id).and_then(|e| e.branch()) else {
                    continue;
                };
                if owner != Some(branch) {
                    return Err(FolioError::invalid(format!(
                        "`{}` targets an element of branch `{branch}` outside its context",
                        tween.target
                    )));
                }
            }
            targets.push(selected);
        }

        let counts: Vec<usize> = targets.iter().map(SmallVec::len).collect();
        let schedule = timeline.schedule(&counts)?;

        let mut track = Self {
            timeline,
            schedule,
            targets,
            bindings: Vec::new(),
        };
        track.bind(scene, viewport);
        Ok(track)
    }

    fn bind(&mut self, scene: &Scene, viewport: Size) {
        let mut state: FxHashMap<ElementId, Props> = FxHashMap::default();

        self.bindings = self
            .timeline
            .tweens()
            .zip(&self.targets)
            .map(|(tween, targets)| {
                let to = tween.to.resolve(viewport);
                let from = tween.from.map(|f| f.resolve(viewport)).unwrap_or_default();
                let mut mask = to;
                mask.merge(&from);

                targets
                    .iter()
                    .map(|&element| {
                        let leading = !state.contains_key(&element);
                        let current = state.entry(element).or_insert_with(|| {
                            scene
                                .get(element)
                                .map(|e| *e.base_props())
                                .unwrap_or(Props::IDENTITY)
                        });
                        let binding = Binding {
                            element,
                            from: from.masked(&mask, current),
                            to: to.masked(&mask, current),
                            leading,
                        };
                        current.merge(&binding.to);
                        binding
                    })
                    .collect()
            })
            .collect();
    }

    /// Re-resolve viewport-relative values after a resize. `bases_moved`
    /// forces a rebind when element base values changed with the viewport.
    pub fn rebind(&mut self, scene: &Scene, viewport: Size, bases_moved: bool) {
        if bases_moved || self.timeline.tweens().any(|t| t.is_viewport_relative()) {
            self.bind(scene, viewport);
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Every element this track writes to, possibly with repeats
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.targets.iter().flatten().copied()
    }

    /// Write the state at `progress` into the scene.
    ///
    /// Returns `(writes, skipped)`; elements unmounted since registration are
    /// skipped and logged.
    pub fn apply(&self, progress: f32, scene: &mut Scene) -> (usize, usize) {
        let time = self.schedule.time_at(progress);
        let mut writes = 0;
        let mut skipped = 0;

        for (entry, bindings) in self.schedule.entries.iter().zip(&self.bindings) {
            for (index, binding) in bindings.iter().enumerate() {
                let props = match entry.progress(index, time) {
                    Some(k) => binding.from.lerp(&binding.to, k),
                    None if binding.leading => binding.from,
                    None => continue,
                };
                if scene.apply(binding.element, &props) {
                    writes += 1;
                } else {
                    let missing = FolioError::TransientTargetMissing {
                        target: format!("{:?}", binding.element),
                    };
                    tracing::warn!(error = %missing, "skipping write");
                    skipped += 1;
                }
            }
        }

        (writes, skipped)
    }
}
