//! Scene file handling (folio.toml)
//!
//! A scene file describes the viewport, the shared elements, the content
//! branches and the animations registered on each, plus an optional input
//! script that `folio run` replays.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use folio_animation::{Easing, Stagger, StaggerOrigin, Timeline, Tween, TweenVars};
use folio_core::{FolioError, Length, Rect, Selector, Size};
use folio_scroll::{
    gallery, Branch, Choreographer, ChoreographerConfig, ContextGuard, Element, Flow, IdleHandle,
    PinHandle, Scene, ScrollPosition, ScrollWindow, Scrub, Stage, SubscriptionHandle,
};

/// Branch used when a scene declares none
pub const DEFAULT_BRANCH: &str = "main";

/// Scene file contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,

    #[serde(default)]
    pub choreographer: ChoreographerSection,

    /// Branch mounted first; defaults to the first declared branch
    #[serde(default)]
    pub initial_branch: Option<String>,

    /// Elements shared by every branch
    #[serde(default)]
    pub elements: Vec<ElementConfig>,

    /// Global scroll timelines
    #[serde(default)]
    pub timelines: Vec<TimelineConfig>,

    #[serde(default)]
    pub pins: Vec<PinConfig>,

    #[serde(default)]
    pub idle: Vec<IdleConfig>,

    #[serde(default)]
    pub branches: Vec<BranchConfig>,

    /// Input replayed by `folio run`
    #[serde(default)]
    pub script: Vec<ScriptStep>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    800.0
}

/// Choreographer timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoreographerSection {
    #[serde(default = "default_fixed_step")]
    pub fixed_step: f32,
    #[serde(default = "default_snap_settle")]
    pub snap_settle: f32,
    #[serde(default = "default_snap_duration")]
    pub snap_duration: f32,
    #[serde(default = "default_snap_ease")]
    pub snap_ease: String,
}

impl Default for ChoreographerSection {
    fn default() -> Self {
        Self {
            fixed_step: default_fixed_step(),
            snap_settle: default_snap_settle(),
            snap_duration: default_snap_duration(),
            snap_ease: default_snap_ease(),
        }
    }
}

impl ChoreographerSection {
    pub fn to_config(&self) -> folio_core::Result<ChoreographerConfig> {
        if !(self.fixed_step.is_finite() && self.fixed_step > 0.0) {
            return Err(FolioError::invalid(format!(
                "fixed_step must be positive, got {}",
                self.fixed_step
            )));
        }
        if self.snap_settle < 0.0 || self.snap_duration < 0.0 {
            return Err(FolioError::invalid("snap timings must not be negative"));
        }
        Ok(ChoreographerConfig {
            fixed_step: self.fixed_step,
            snap_settle: self.snap_settle,
            snap_duration: self.snap_duration,
            snap_ease: self.snap_ease.parse()?,
        })
    }
}

fn default_fixed_step() -> f32 {
    1.0 / 60.0
}

fn default_snap_settle() -> f32 {
    folio_scroll::snap::DEFAULT_SETTLE
}

fn default_snap_duration() -> f32 {
    folio_scroll::snap::DEFAULT_DURATION
}

fn default_snap_ease() -> String {
    "power1.inOut".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowConfig {
    #[default]
    Normal,
    Fixed,
}

/// One element, or a grid of `count` copies laid out `cols` per row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// `[x, y, width, height]` in document pixels
    pub rect: [f32; 4],
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub base: Option<VarsConfig>,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub cols: Option<usize>,
    /// Offset between copies, `[dx, dy]`
    #[serde(default)]
    pub step: [f32; 2],
}

fn default_count() -> usize {
    1
}

impl ElementConfig {
    /// Expand into scene elements. Copies get `-<index>` appended to the id.
    pub fn to_elements(&self, viewport: Size) -> folio_core::Result<Vec<Element>> {
        if self.count == 0 {
            return Err(FolioError::invalid("element count must be at least 1"));
        }
        let [x, y, width, height] = self.rect;
        if !(width >= 0.0 && height >= 0.0) {
            return Err(FolioError::invalid(format!(
                "element size must not be negative, got {width}x{height}"
            )));
        }
        let base = self.base.as_ref().map(VarsConfig::to_vars).transpose()?;
        let cols = self.cols.unwrap_or(self.count).max(1);

        let elements = (0..self.count)
            .map(|i| {
                let rect = Rect::new(
                    x + (i % cols) as f32 * self.step[0],
                    y + (i / cols) as f32 * self.step[1],
                    width,
                    height,
                );
                let mut element = Element::new(rect).flow(match self.flow {
                    FlowConfig::Normal => Flow::Normal,
                    FlowConfig::Fixed => Flow::Fixed,
                });
                if let Some(id) = &self.id {
                    element = if self.count == 1 {
                        element.id(id.clone())
                    } else {
                        element.id(format!("{id}-{i}"))
                    };
                }
                for class in &self.classes {
                    element = element.class(class.clone());
                }
                if let Some(base) = base {
                    element = element.base_vars(base, viewport);
                }
                element
            })
            .collect();
        Ok(elements)
    }
}

/// A length given as pixels (`12`) or with a unit (`"40vw"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LengthValue {
    Px(f32),
    Css(String),
}

impl LengthValue {
    pub fn to_length(&self) -> folio_core::Result<Length> {
        match self {
            LengthValue::Px(px) => Ok(Length::Px(*px)),
            LengthValue::Css(text) => text.parse(),
        }
    }
}

/// Animatable properties; unset fields are left alone
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VarsConfig {
    #[serde(default)]
    pub opacity: Option<f32>,
    #[serde(default)]
    pub x: Option<LengthValue>,
    #[serde(default)]
    pub y: Option<LengthValue>,
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub scale_x: Option<f32>,
    #[serde(default)]
    pub scale_y: Option<f32>,
    #[serde(default)]
    pub rotate: Option<f32>,
}

impl VarsConfig {
    pub fn to_vars(&self) -> folio_core::Result<TweenVars> {
        let mut vars = TweenVars::new();
        if let Some(opacity) = self.opacity {
            vars = vars.opacity(opacity);
        }
        if let Some(x) = &self.x {
            vars = vars.x(x.to_length()?);
        }
        if let Some(y) = &self.y {
            vars = vars.y(y.to_length()?);
        }
        if let Some(scale) = self.scale {
            vars = vars.scale(scale);
        }
        if let Some(sx) = self.scale_x {
            vars = vars.scale_x(sx);
        }
        if let Some(sy) = self.scale_y {
            vars = vars.scale_y(sy);
        }
        if let Some(degrees) = self.rotate {
            vars = vars.rotate(degrees);
        }
        Ok(vars)
    }
}

/// Stagger origin: a keyword or a target index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OriginValue {
    Index(usize),
    Name(String),
}

impl OriginValue {
    fn to_origin(&self) -> folio_core::Result<StaggerOrigin> {
        match self {
            OriginValue::Index(i) => Ok(StaggerOrigin::Index(*i)),
            OriginValue::Name(name) => match name.as_str() {
                "start" => Ok(StaggerOrigin::Start),
                "center" => Ok(StaggerOrigin::Center),
                "end" => Ok(StaggerOrigin::End),
                "edges" => Ok(StaggerOrigin::Edges),
                "random" => Ok(StaggerOrigin::Random),
                other => Err(FolioError::invalid(format!(
                    "unknown stagger origin `{other}`"
                ))),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaggerConfig {
    /// Total spread in seconds
    pub amount: f32,
    /// `[rows, cols]`
    #[serde(default)]
    pub grid: Option<[usize; 2]>,
    /// Rank targets in a shuffled order
    #[serde(default)]
    pub random: bool,
    #[serde(default)]
    pub from: Option<OriginValue>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl StaggerConfig {
    pub fn to_stagger(&self) -> folio_core::Result<Stagger> {
        let mut stagger = match (self.grid, self.random) {
            (Some(_), true) => {
                return Err(FolioError::invalid(
                    "stagger cannot be both a grid and random",
                ))
            }
            (Some([rows, cols]), false) => Stagger::grid(rows, cols, self.amount),
            (None, true) => Stagger::random(self.amount),
            (None, false) => Stagger::linear(self.amount),
        };
        if let Some(origin) = &self.from {
            stagger = stagger.from(origin.to_origin()?);
        }
        if let Some(seed) = self.seed {
            stagger = stagger.seeded(seed);
        }
        stagger.validate()?;
        Ok(stagger)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TweenConfig {
    /// `#id` or `.class`
    pub target: String,
    /// Start values; without them the tween runs from the current state
    #[serde(default)]
    pub from: Option<VarsConfig>,
    #[serde(default)]
    pub to: VarsConfig,
    #[serde(default)]
    pub ease: Option<String>,
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub stagger: Option<StaggerConfig>,
    /// Absolute start time; appended after the previous tween when unset
    #[serde(default)]
    pub position: Option<f32>,
}

impl TweenConfig {
    pub fn to_tween(&self) -> folio_core::Result<Tween> {
        let target: Selector = self.target.parse()?;
        let to = self.to.to_vars()?;
        let mut tween = match &self.from {
            Some(from) => Tween::from_to(target, from.to_vars()?, to),
            None => Tween::to(target, to),
        };
        if let Some(ease) = &self.ease {
            tween = tween.ease(ease.parse::<Easing>()?);
        }
        if let Some(duration) = self.duration {
            tween = tween.duration(duration);
        }
        if let Some(stagger) = &self.stagger {
            tween = tween.stagger(stagger.to_stagger()?);
        }
        if let Some(position) = self.position {
            tween = tween.at(position);
        }
        Ok(tween)
    }
}

fn build_timeline(tweens: &[TweenConfig]) -> folio_core::Result<Timeline> {
    tweens
        .iter()
        .try_fold(Timeline::new(), |timeline, tween| Ok(timeline.with(tween.to_tween()?)))
}

/// Window edge: an absolute offset or `"<element anchor> <viewport anchor>"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionValue {
    Offset(f32),
    Anchors(String),
}

impl PositionValue {
    fn to_position(&self) -> folio_core::Result<ScrollPosition> {
        match self {
            PositionValue::Offset(offset) => Ok(ScrollPosition::Absolute(*offset)),
            PositionValue::Anchors(text) => text.parse(),
        }
    }
}

/// `true`/`false`, or a lag in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrubValue {
    Flag(bool),
    Lag(f32),
}

impl Default for ScrubValue {
    fn default() -> Self {
        ScrubValue::Flag(true)
    }
}

impl From<ScrubValue> for Scrub {
    fn from(value: ScrubValue) -> Self {
        match value {
            ScrubValue::Flag(flag) => Scrub::from(flag),
            ScrubValue::Lag(lag) => Scrub::from(lag),
        }
    }
}

fn build_window(
    trigger: Option<&str>,
    start: &PositionValue,
    end: &PositionValue,
) -> folio_core::Result<ScrollWindow> {
    let mut window = ScrollWindow::new(start.to_position()?, end.to_position()?);
    if let Some(trigger) = trigger {
        window = window.trigger(trigger.parse()?);
    }
    Ok(window)
}

/// A scroll window bound to a timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
    pub start: PositionValue,
    pub end: PositionValue,
    #[serde(default)]
    pub scrub: ScrubValue,
    /// Element held in place while the window is active
    #[serde(default)]
    pub pin: Option<String>,
    /// Progress fractions to settle on once scrolling stops
    #[serde(default)]
    pub snap: Option<Vec<f32>>,
    /// Horizontal slide track driven by this window
    #[serde(default)]
    pub gallery: Option<GalleryConfig>,
    #[serde(default)]
    pub tweens: Vec<TweenConfig>,
}

impl TimelineConfig {
    pub fn label(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.trigger.clone())
            .unwrap_or_else(|| "<timeline>".to_string())
    }

    pub fn window(&self) -> folio_core::Result<ScrollWindow> {
        let mut window = build_window(self.trigger.as_deref(), &self.start, &self.end)?
            .scrub(self.scrub);
        if let Some(pin) = &self.pin {
            window = window.pin(pin.parse()?);
        }
        Ok(window)
    }

    pub fn timeline(&self) -> folio_core::Result<Timeline> {
        let timeline = build_timeline(&self.tweens)?;
        match &self.gallery {
            Some(slides) => Ok(timeline.with(gallery::gallery_tween(
                slides.track.parse()?,
                slides.slides,
            ))),
            None => Ok(timeline),
        }
    }

    /// Snap fractions, explicit or derived from `gallery`
    pub fn snap_points(&self) -> folio_core::Result<Option<Vec<f32>>> {
        match (&self.snap, &self.gallery) {
            (Some(_), Some(_)) => Err(FolioError::invalid(format!(
                "timeline `{}` sets both snap and gallery",
                self.label()
            ))),
            (Some(points), None) => Ok(Some(points.clone())),
            (None, Some(slides)) => Ok(Some(gallery::snap_fractions(slides.slides))),
            (None, None) => Ok(None),
        }
    }
}

/// Full-viewport slides side by side, snapping to each slide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    pub track: String,
    pub slides: usize,
}

/// A pin without a timeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinConfig {
    pub target: String,
    #[serde(default)]
    pub trigger: Option<String>,
    pub start: PositionValue,
    pub end: PositionValue,
}

/// A time-driven loop, independent of scroll
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleConfig {
    /// Extra iterations; -1 loops forever
    #[serde(default = "default_repeat")]
    pub repeat: i32,
    #[serde(default)]
    pub yoyo: bool,
    pub tweens: Vec<TweenConfig>,
}

fn default_repeat() -> i32 {
    -1
}

/// A content branch: its subtree and the animations scoped to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchConfig {
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
    #[serde(default)]
    pub timelines: Vec<TimelineConfig>,
    #[serde(default)]
    pub pins: Vec<PinConfig>,
    #[serde(default)]
    pub idle: Vec<IdleConfig>,
}

impl BranchConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
            timelines: Vec::new(),
            pins: Vec::new(),
            idle: Vec::new(),
        }
    }
}

/// One scripted input. Tables are matched by their key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    Scroll {
        scroll: f32,
    },
    Frames {
        frames: u32,
        /// Defaults to the choreographer's fixed step
        #[serde(default)]
        dt: Option<f32>,
    },
    Resize {
        resize: [f32; 2],
    },
    Switch {
        switch: String,
    },
    Overlay {
        overlay: bool,
    },
}

/// Registration target shared by global and branch-scoped animations
trait Registrar {
    fn add_timeline(
        &mut self,
        window: ScrollWindow,
        timeline: Timeline,
    ) -> folio_core::Result<SubscriptionHandle>;
    fn add_pin(&mut self, element: &Selector, window: ScrollWindow) -> folio_core::Result<PinHandle>;
    fn add_snap(&mut self, handle: SubscriptionHandle, fractions: &[f32]) -> folio_core::Result<()>;
    fn add_idle(&mut self, timeline: Timeline, repeat: i32, yoyo: bool) -> folio_core::Result<IdleHandle>;
}

impl Registrar for Choreographer {
    fn add_timeline(
        &mut self,
        window: ScrollWindow,
        timeline: Timeline,
    ) -> folio_core::Result<SubscriptionHandle> {
        self.register_timeline(window, timeline)
    }

    fn add_pin(&mut self, element: &Selector, window: ScrollWindow) -> folio_core::Result<PinHandle> {
        self.pin(element, window)
    }

    fn add_snap(&mut self, handle: SubscriptionHandle, fractions: &[f32]) -> folio_core::Result<()> {
        self.snap(handle, fractions)
    }

    fn add_idle(&mut self, timeline: Timeline, repeat: i32, yoyo: bool) -> folio_core::Result<IdleHandle> {
        self.add_idle_loop(timeline, repeat, yoyo)
    }
}

impl Registrar for ContextGuard<'_> {
    fn add_timeline(
        &mut self,
        window: ScrollWindow,
        timeline: Timeline,
    ) -> folio_core::Result<SubscriptionHandle> {
        self.register_timeline(window, timeline)
    }

    fn add_pin(&mut self, element: &Selector, window: ScrollWindow) -> folio_core::Result<PinHandle> {
        self.pin(element, window)
    }

    fn add_snap(&mut self, handle: SubscriptionHandle, fractions: &[f32]) -> folio_core::Result<()> {
        self.snap(handle, fractions)
    }

    fn add_idle(&mut self, timeline: Timeline, repeat: i32, yoyo: bool) -> folio_core::Result<IdleHandle> {
        self.add_idle_loop(timeline, repeat, yoyo)
    }
}

fn install<R: Registrar>(
    target: &mut R,
    timelines: &[TimelineConfig],
    pins: &[PinConfig],
    idle: &[IdleConfig],
) -> folio_core::Result<()> {
    for config in timelines {
        let handle = target.add_timeline(config.window()?, config.timeline()?)?;
        if let Some(points) = config.snap_points()? {
            target.add_snap(handle, &points)?;
        }
        tracing::debug!(timeline = %config.label(), "timeline registered");
    }
    for pin in pins {
        let window = build_window(pin.trigger.as_deref(), &pin.start, &pin.end)?;
        target.add_pin(&pin.target.parse()?, window)?;
    }
    for config in idle {
        target.add_idle(build_timeline(&config.tweens)?, config.repeat, config.yoyo)?;
    }
    Ok(())
}

impl SceneConfig {
    /// Load a scene file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Branches as mounted: the declared ones, or a single empty default
    pub fn branch_list(&self) -> Vec<BranchConfig> {
        if self.branches.is_empty() {
            vec![BranchConfig::named(DEFAULT_BRANCH)]
        } else {
            self.branches.clone()
        }
    }

    pub fn initial(&self) -> Branch {
        match &self.initial_branch {
            Some(name) => Branch::new(name.clone()),
            None => self
                .branches
                .first()
                .map(|b| Branch::new(b.name.clone()))
                .unwrap_or_else(|| Branch::from(DEFAULT_BRANCH)),
        }
    }

    /// Build a stage with the initial branch mounted and every global
    /// animation registered
    pub fn build(&self) -> Result<Stage> {
        let viewport = self.viewport.size();
        if !(viewport.width > 0.0 && viewport.height > 0.0) {
            anyhow::bail!(
                "viewport must have a positive size, got {}x{}",
                viewport.width,
                viewport.height
            );
        }

        let mut scene = Scene::new();
        for config in &self.elements {
            for element in config.to_elements(viewport)? {
                scene.insert(element);
            }
        }

        let mut builder = Stage::builder(scene, viewport).config(self.choreographer.to_config()?);
        for branch in self.branch_list() {
            let mut elements = Vec::new();
            for config in &branch.elements {
                elements.extend(
                    config
                        .to_elements(viewport)
                        .with_context(|| format!("in branch `{}`", branch.name))?,
                );
            }
            let name = Branch::new(branch.name.clone());
            builder = builder.branch_with(name, elements, move |ctx: &mut ContextGuard<'_>| {
                install(ctx, &branch.timelines, &branch.pins, &branch.idle)
            });
        }

        let initial = self.initial();
        let mut stage = builder
            .build(&initial)
            .with_context(|| format!("Failed to mount branch `{initial}`"))?;
        install(stage.choreographer_mut(), &self.timelines, &self.pins, &self.idle)
            .context("Failed to register global animations")?;
        Ok(stage)
    }
}
