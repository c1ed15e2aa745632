//! Script replay

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;

use folio_core::Event;
use folio_scroll::{Branch, Flow, Stage};

use crate::config::ScriptStep;

/// Final state of one mounted element
#[derive(Debug, Clone, Serialize)]
pub struct ElementState {
    pub label: String,
    pub branch: Option<String>,
    pub flow: String,
    pub opacity: f32,
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotate: f32,
}

/// Outcome of replaying a script
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub steps: usize,
    pub frames: u32,
    pub writes: usize,
    pub skipped: usize,
    /// Scroll positions requested by snapping, in order
    pub scroll_requests: Vec<f32>,
    pub position: f32,
    pub active_branch: Option<String>,
    pub overlay_visible: bool,
    pub subscriptions: usize,
    pub pins: usize,
    pub idle_loops: usize,
    pub elements: Vec<ElementState>,
}

/// Replay `steps` against `stage`.
///
/// With `follow_snaps`, a snap's scroll request is fed back as a scroll
/// event, the way a host page scrolls when asked to.
pub fn run(stage: &mut Stage, steps: &[ScriptStep], follow_snaps: bool) -> Result<RunReport> {
    let mut frames = 0u32;
    let mut writes = 0usize;
    let mut skipped = 0usize;
    let mut scroll_requests = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        tracing::debug!(step = index, ?step, "replaying");
        let mut reports = Vec::new();
        match step {
            ScriptStep::Scroll { scroll } => reports.push(stage.dispatch(&Event::scroll(*scroll))),
            ScriptStep::Frames { frames: count, dt } => {
                let dt = dt.unwrap_or(stage.choreographer().config().fixed_step);
                for _ in 0..*count {
                    let report = stage.dispatch(&Event::frame(dt));
                    frames += 1;
                    if let Some(target) = report.scroll_request {
                        scroll_requests.push(target);
                        if follow_snaps {
                            reports.push(stage.dispatch(&Event::scroll(target)));
                        }
                    }
                    reports.push(report);
                }
            }
            ScriptStep::Resize {
                resize: [width, height],
            } => reports.push(stage.dispatch(&Event::resize(*width, *height))),
            ScriptStep::Switch { switch } => {
                stage
                    .switch_branch(&Branch::new(switch.clone()))
                    .with_context(|| format!("step {index}: switching to `{switch}`"))?;
            }
            ScriptStep::Overlay { overlay } => {
                stage.set_overlay(*overlay);
            }
        }
        for report in reports {
            writes += report.writes;
            skipped += report.skipped;
        }
    }

    let choreo = stage.choreographer();
    let elements = choreo
        .scene()
        .iter()
        .map(|(_, element)| {
            let props = element.current();
            let (x, y) = props.resolved_translate();
            let (scale_x, scale_y) = props.resolved_scale();
            ElementState {
                label: element.label(),
                branch: element.branch().map(|b| b.name().to_string()),
                flow: match element.layout_flow() {
                    Flow::Normal => "normal".to_string(),
                    Flow::Fixed => "fixed".to_string(),
                    Flow::Pinned { offset } => format!("pinned({offset})"),
                },
                opacity: props.resolved_opacity(),
                x,
                y,
                scale_x,
                scale_y,
                rotate: props.resolved_rotate(),
            }
        })
        .collect();

    Ok(RunReport {
        steps: steps.len(),
        frames,
        writes,
        skipped,
        scroll_requests,
        position: choreo.position(),
        active_branch: stage.active_branch().map(|b| b.name().to_string()),
        overlay_visible: stage.overlay_visible(),
        subscriptions: choreo.active_subscription_count(),
        pins: choreo.pin_count(),
        idle_loops: choreo.idle_loop_count(),
        elements,
    })
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "branch: {}  overlay: {}  position: {}",
            self.active_branch.as_deref().unwrap_or("-"),
            if self.overlay_visible { "visible" } else { "hidden" },
            self.position
        )?;
        writeln!(
            f,
            "steps: {}  frames: {}  writes: {}  skipped: {}",
            self.steps, self.frames, self.writes, self.skipped
        )?;
        writeln!(
            f,
            "subscriptions: {}  pins: {}  idle loops: {}  snap requests: {:?}",
            self.subscriptions, self.pins, self.idle_loops, self.scroll_requests
        )?;
        writeln!(f)?;
        for e in &self.elements {
            writeln!(
                f,
                "{:<20} {:<12} {:<14} opacity {:.2}  translate ({:.1}, {:.1})  scale ({:.3}, {:.3})  rotate {:.1}",
                e.label,
                e.branch.as_deref().unwrap_or("-"),
                e.flow,
                e.opacity,
                e.x,
                e.y,
                e.scale_x,
                e.scale_y,
                e.rotate
            )?;
        }
        Ok(())
    }
}
