//! End-to-end choreography scenarios
//!
//! These drive the choreographer the way a page would: a hero section with a
//! staggered puzzle grid and a lagged floating pane, a snapping gallery, and
//! content branches swapped through the stage.

use folio_animation::{Easing, Stagger, StaggerOrigin, Timeline, Tween, TweenVars};
use folio_core::{FolioError, Length, Rect, Selector, Size};
use folio_scroll::gallery::{gallery_timeline, slide_at, snap_fractions};
use folio_scroll::{
    Branch, Choreographer, ContextGuard, Element, ElementId, Flow, Phase, Scene, ScrollPosition,
    ScrollWindow, Stage,
};

const VIEWPORT: Size = Size::new(1280.0, 800.0);

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

/// A 180vh hero trigger holding a 5x5 puzzle and a floating pane
fn hero_scene() -> Scene {
    let mut scene = Scene::new();
    scene.insert(Element::new(Rect::new(0.0, 0.0, 1280.0, 1440.0)).class("hero-trigger"));
    for i in 0..25 {
        let (row, col) = ((i / 5) as f32, (i % 5) as f32);
        scene.insert(
            Element::new(Rect::new(col * 100.0, row * 100.0, 100.0, 100.0)).class("puzzle-piece"),
        );
    }
    scene.insert(
        Element::new(Rect::new(400.0, 200.0, 480.0, 400.0))
            .class("floating-pane")
            .flow(Flow::Fixed),
    );
    scene
}

fn hero() -> Selector {
    Selector::class("hero-trigger")
}

fn puzzle_timeline() -> Timeline {
    Timeline::new().with(
        Tween::to(Selector::class("puzzle-piece"), TweenVars::new().scale(1.05))
            .ease("power2.inOut".parse().unwrap())
            .stagger(
                Stagger::grid(5, 5, 1.0)
                    .from(StaggerOrigin::Random)
                    .seeded(42),
            ),
    )
}

fn pane_timeline() -> Timeline {
    Timeline::new().with(
        Tween::from_to(
            Selector::class("floating-pane"),
            TweenVars::new()
                .x(Length::Vw(40.0))
                .y(Length::Vh(40.0))
                .opacity(0.0),
            TweenVars::new().x(0.0).y(0.0).opacity(1.0),
        )
        .ease("power3.out".parse().unwrap()),
    )
}

fn fade_scene() -> (Scene, ElementId) {
    let mut scene = Scene::new();
    let id = scene.insert(Element::new(Rect::new(0.0, 0.0, 100.0, 100.0)).id("box"));
    (scene, id)
}

fn fade_in(target: Selector) -> Timeline {
    Timeline::new().with(
        Tween::from_to(
            target,
            TweenVars::new().opacity(0.0),
            TweenVars::new().opacity(1.0),
        )
        .ease(Easing::Linear),
    )
}

fn opacity(choreo: &Choreographer, id: ElementId) -> f32 {
    choreo
        .scene()
        .get(id)
        .map(|e| e.current().resolved_opacity())
        .unwrap_or(f32::NAN)
}

#[test]
fn test_exact_scrub_opacity_at_window_points() {
    let (scene, id) = fade_scene();
    let mut choreo = Choreographer::new(scene, VIEWPORT);
    let handle = choreo
        .register_timeline(
            ScrollWindow::absolute(0.0, 100.0).scrub(true),
            fade_in(Selector::id("box")),
        )
        .unwrap();

    choreo.on_scroll(0.0);
    assert_eq!(opacity(&choreo, id), 0.0);
    assert_eq!(choreo.progress(handle), Some(0.0));

    choreo.on_scroll(50.0);
    assert_eq!(opacity(&choreo, id), 0.5);

    choreo.on_scroll(150.0);
    assert_eq!(opacity(&choreo, id), 1.0);
    assert_eq!(choreo.progress(handle), Some(1.0));

    choreo.on_scroll(100.0);
    assert_eq!(choreo.progress(handle), Some(1.0));
    choreo.on_scroll(-30.0);
    assert_eq!(choreo.progress(handle), Some(0.0));
    assert_eq!(opacity(&choreo, id), 0.0);
}

#[test]
fn test_hero_sequence() {
    let mut choreo = Choreographer::new(hero_scene(), VIEWPORT);
    let puzzle = choreo
        .register_timeline(
            ScrollWindow::triggered(hero(), "top top", "bottom top").unwrap(),
            puzzle_timeline(),
        )
        .unwrap();
    let pane = choreo
        .register_timeline(
            ScrollWindow::triggered(hero(), "70% top", "120% top")
                .unwrap()
                .scrub(1.5),
            pane_timeline(),
        )
        .unwrap();

    let report = choreo.on_scroll(0.0);
    assert_eq!(report.writes, 26);
    assert_eq!(choreo.phase(puzzle), Phase::Active);

    let pane_id = choreo
        .scene()
        .select_first(&Selector::class("floating-pane"))
        .unwrap();
    let start = choreo.scene().get(pane_id).unwrap().current();
    assert_eq!(start.translate_x, Some(512.0));
    assert_eq!(start.translate_y, Some(320.0));
    assert_eq!(start.opacity, Some(0.0));

    // scroll past the whole hero, then let the lagged pane catch up
    choreo.on_scroll(2000.0);
    for piece in choreo.scene().select(&Selector::class("puzzle-piece")) {
        let props = choreo.scene().get(piece).unwrap().current();
        assert!(approx(props.scale_x.unwrap(), 1.05));
        assert!(approx(props.scale_y.unwrap(), 1.05));
    }
    assert_eq!(choreo.progress(pane), Some(0.0));

    for _ in 0..240 {
        choreo.frame(1.0 / 60.0);
    }
    let end = choreo.scene().get(pane_id).unwrap().current();
    assert!(end.translate_x.unwrap().abs() < 0.5);
    assert!(approx(end.opacity.unwrap(), 1.0));
    // fixed positioning is untouched by property writes
    assert_eq!(choreo.scene().get(pane_id).unwrap().layout_flow(), Flow::Fixed);
}

#[test]
fn test_random_grid_stagger_is_stable_across_frames() {
    let mut choreo = Choreographer::new(hero_scene(), VIEWPORT);
    choreo
        .register_timeline(
            ScrollWindow::triggered(hero(), "top top", "bottom top").unwrap(),
            puzzle_timeline(),
        )
        .unwrap();

    let snapshot = |choreo: &Choreographer| -> Vec<f32> {
        choreo
            .scene()
            .select(&Selector::class("puzzle-piece"))
            .iter()
            .map(|id| choreo.scene().get(*id).unwrap().current().resolved_scale().0)
            .collect()
    };

    choreo.on_scroll(500.0);
    let first = snapshot(&choreo);
    choreo.on_scroll(900.0);
    choreo.on_scroll(500.0);
    assert_eq!(first, snapshot(&choreo));

    // mid-window, some pieces have started and some have not
    assert!(first.iter().any(|s| *s > 1.0));
    assert!(first.iter().any(|s| *s == 1.0));
}

#[test]
fn test_gallery_snaps_to_nearest_slide() {
    let mut scene = Scene::new();
    let track = scene.insert(Element::new(Rect::new(0.0, 1000.0, 3840.0, 800.0)).id("gallery-track"));
    let mut choreo = Choreographer::new(scene, VIEWPORT);

    let handle = choreo
        .register_timeline(
            ScrollWindow::absolute(1000.0, 3000.0),
            gallery_timeline(Selector::id("gallery-track"), 3),
        )
        .unwrap();
    choreo.snap(handle, &snap_fractions(3)).unwrap();

    choreo.on_scroll(1000.0 + 0.42 * 2000.0);
    assert!(approx(choreo.progress(handle).unwrap(), 0.42));

    let mut requested = None;
    for _ in 0..60 {
        let report = choreo.frame(1.0 / 60.0);
        requested = requested.or(report.scroll_request);
    }

    assert_eq!(choreo.progress(handle), Some(0.5));
    assert_eq!(requested, Some(2000.0));
    assert_eq!(slide_at(0.5, 3), 1);
    let x = choreo.scene().get(track).unwrap().current().translate_x.unwrap();
    assert!(approx(x, -1280.0));

    // the host follows the request; progress stays put
    choreo.on_scroll(2000.0);
    for _ in 0..30 {
        assert_eq!(choreo.frame(1.0 / 60.0).scroll_request, None);
    }
    assert_eq!(choreo.progress(handle), Some(0.5));
}

#[test]
fn test_new_input_cancels_snap() {
    let (scene, _) = fade_scene();
    let mut choreo = Choreographer::new(scene, VIEWPORT);
    let handle = choreo
        .register_timeline(ScrollWindow::absolute(0.0, 100.0), fade_in(Selector::id("box")))
        .unwrap();
    choreo.snap(handle, &[0.0, 1.0]).unwrap();

    choreo.on_scroll(30.0);
    for _ in 0..9 {
        choreo.frame(1.0 / 60.0);
    }
    choreo.on_scroll(80.0);
    assert_eq!(choreo.progress(handle), Some(0.8));
    for _ in 0..60 {
        choreo.frame(1.0 / 60.0);
    }
    assert_eq!(choreo.progress(handle), Some(1.0));
}

#[test]
fn test_unknown_trigger_leaves_count_unchanged() {
    let (scene, _) = fade_scene();
    let mut choreo = Choreographer::new(scene, VIEWPORT);
    choreo
        .register_timeline(ScrollWindow::absolute(0.0, 100.0), fade_in(Selector::id("box")))
        .unwrap();

    let result = choreo.register_timeline(
        ScrollWindow::triggered(Selector::id("missing"), "top top", "bottom top").unwrap(),
        fade_in(Selector::id("box")),
    );
    assert_eq!(
        result,
        Err(FolioError::ReferenceNotFound {
            selector: "#missing".to_string()
        })
    );

    let result = choreo.register_timeline(
        ScrollWindow::absolute(0.0, 100.0),
        fade_in(Selector::class("ghost")),
    );
    assert!(matches!(result, Err(FolioError::ReferenceNotFound { .. })));
    assert_eq!(choreo.active_subscription_count(), 1);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let (scene, _) = fade_scene();
    let mut choreo = Choreographer::new(scene, VIEWPORT);

    let negative_stagger = Timeline::new().with(
        Tween::to(Selector::id("box"), TweenVars::new().opacity(1.0)).stagger(Stagger::linear(-0.5)),
    );
    assert!(matches!(
        choreo.register_timeline(ScrollWindow::absolute(0.0, 100.0), negative_stagger),
        Err(FolioError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        choreo.register_timeline(
            ScrollWindow::absolute(0.0, 100.0).scrub(-2.0),
            fade_in(Selector::id("box"))
        ),
        Err(FolioError::InvalidConfiguration(_))
    ));
    assert_eq!(choreo.active_subscription_count(), 0);
}

#[test]
fn test_release_twice_is_noop() {
    let (scene, _) = fade_scene();
    let mut choreo = Choreographer::new(scene, VIEWPORT);
    let handle = choreo
        .register_timeline(ScrollWindow::absolute(0.0, 100.0), fade_in(Selector::id("box")))
        .unwrap();

    assert!(choreo.release(handle));
    assert!(!choreo.release(handle));
    assert_eq!(choreo.phase(handle), Phase::Released);
    assert_eq!(choreo.progress(handle), None);
    assert_eq!(choreo.active_subscription_count(), 0);
}

#[test]
fn test_degenerate_window_is_threshold() {
    let (scene, id) = fade_scene();
    let mut choreo = Choreographer::new(scene, VIEWPORT);
    choreo
        .register_timeline(ScrollWindow::absolute(300.0, 300.0), fade_in(Selector::id("box")))
        .unwrap();

    choreo.on_scroll(299.0);
    assert_eq!(opacity(&choreo, id), 0.0);
    choreo.on_scroll(300.0);
    assert_eq!(opacity(&choreo, id), 1.0);
}

#[test]
fn test_pin_restores_flow() {
    let mut scene = Scene::new();
    let section = scene.insert(
        Element::new(Rect::new(0.0, 800.0, 1280.0, 800.0))
            .id("projects")
            .flow(Flow::Fixed),
    );
    let mut choreo = Choreographer::new(scene, VIEWPORT);

    let pin = choreo
        .pin(
            &Selector::id("projects"),
            ScrollWindow::new("top top".parse().unwrap(), ScrollPosition::Absolute(2400.0)),
        )
        .unwrap();

    choreo.on_scroll(1200.0);
    assert_eq!(
        choreo.scene().get(section).unwrap().layout_flow(),
        Flow::Pinned { offset: 400.0 }
    );

    assert!(choreo.unpin(pin));
    assert!(!choreo.unpin(pin));
    assert_eq!(choreo.scene().get(section).unwrap().layout_flow(), Flow::Fixed);
}

#[test]
fn test_context_dispose_and_guard() {
    let (scene, _) = fade_scene();
    let mut choreo = Choreographer::new(scene, VIEWPORT);
    let work = Branch::from("work");

    let ctx = choreo.create_context(work.clone()).unwrap();
    assert!(choreo.create_context(work.clone()).is_err());
    choreo
        .register_in(ctx, ScrollWindow::absolute(0.0, 100.0), fade_in(Selector::id("box")))
        .unwrap();
    choreo
        .register_in(ctx, ScrollWindow::absolute(100.0, 200.0), fade_in(Selector::id("box")))
        .unwrap();
    assert_eq!(choreo.active_count_in(ctx), 2);

    assert_eq!(choreo.dispose(ctx), 2);
    assert_eq!(choreo.dispose(ctx), 0);
    assert_eq!(choreo.active_count_in(ctx), 0);
    assert!(choreo
        .register_in(ctx, ScrollWindow::absolute(0.0, 1.0), fade_in(Selector::id("box")))
        .is_err());

    {
        let mut guard: ContextGuard<'_> = choreo.scoped(work.clone()).unwrap();
        guard
            .register_timeline(ScrollWindow::absolute(0.0, 100.0), fade_in(Selector::id("box")))
            .unwrap();
        assert_eq!(guard.choreographer().active_subscription_count(), 1);
    }
    assert_eq!(choreo.active_subscription_count(), 0);
    assert!(choreo.context_for(&work).is_none());
}

#[test]
fn test_branch_switch_leaves_no_stale_subscriptions() {
    fn cards(branch: &str) -> Vec<Element> {
        (0..3)
            .map(|i| {
                Element::new(Rect::new(0.0, 900.0 + i as f32 * 300.0, 400.0, 300.0))
                    .class(format!("{branch}-card"))
            })
            .collect()
    }

    fn reveal(class: &'static str) -> impl FnMut(&mut ContextGuard<'_>) -> folio_core::Result<()> {
        move |ctx| {
            ctx.register_timeline(
                ScrollWindow::triggered(Selector::class(class), "top bottom", "bottom bottom")?,
                fade_in(Selector::class(class)),
            )?;
            let hold = ScrollWindow::triggered(Selector::class(class), "top top", "bottom top")?;
            ctx.pin(&Selector::class(class), hold)?;
            Ok(())
        }
    }

    let mut scene = Scene::new();
    scene.insert(Element::new(Rect::new(0.0, 0.0, 1280.0, 800.0)).id("nav"));
    let mut stage = Stage::builder(scene, VIEWPORT)
        .branch_with("work", cards("work"), reveal("work-card"))
        .branch_with("about", cards("about"), reveal("about-card"))
        .build(&Branch::from("work"))
        .unwrap();

    let work_ctx = stage.active_context().unwrap();
    assert_eq!(stage.choreographer().active_count_in(work_ctx), 1);
    assert_eq!(stage.choreographer().pin_count(), 1);

    for _ in 0..3 {
        stage.switch_branch(&Branch::from("about")).unwrap();
        stage.switch_branch(&Branch::from("work")).unwrap();
    }
    stage.switch_branch(&Branch::from("about")).unwrap();

    let choreo = stage.choreographer();
    assert_eq!(choreo.active_count_in(work_ctx), 0);
    assert!(choreo.context_for(&Branch::from("work")).is_none());
    assert_eq!(choreo.active_subscription_count(), 1);
    assert_eq!(choreo.pin_count(), 1);
    assert!(choreo.scene().select(&Selector::class("work-card")).is_empty());
    assert_eq!(choreo.scene().select(&Selector::class("about-card")).len(), 3);
}

#[test]
fn test_global_timeline_cannot_target_branch_elements() {
    let mut scene = Scene::new();
    scene.insert(
        Element::new(Rect::new(0.0, 0.0, 100.0, 100.0))
            .id("card")
            .in_branch(Branch::from("work")),
    );
    let mut choreo = Choreographer::new(scene, VIEWPORT);
    assert!(matches!(
        choreo.register_timeline(ScrollWindow::absolute(0.0, 1.0), fade_in(Selector::id("card"))),
        Err(FolioError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_resize_reresolves_windows_and_lengths() {
    let mut choreo = Choreographer::new(hero_scene(), VIEWPORT);
    let pane = choreo
        .register_timeline(
            ScrollWindow::triggered(hero(), "top bottom", "top top").unwrap(),
            pane_timeline(),
        )
        .unwrap();
    assert_eq!(choreo.window(pane).map(|w| w.start), Some(-800.0));

    choreo.on_scroll(-800.0);
    choreo.resize(Size::new(1000.0, 600.0));
    assert_eq!(choreo.window(pane).map(|w| w.start), Some(-600.0));

    let id = choreo
        .scene()
        .select_first(&Selector::class("floating-pane"))
        .unwrap();
    let props = choreo.scene().get(id).unwrap().current();
    assert_eq!(props.translate_x, Some(400.0));
    assert_eq!(props.translate_y, Some(240.0));
}

#[test]
fn test_unmounted_target_is_skipped_not_fatal() {
    let (scene, id) = fade_scene();
    let mut choreo = Choreographer::new(scene, VIEWPORT);
    choreo
        .register_timeline(ScrollWindow::absolute(0.0, 100.0), fade_in(Selector::id("box")))
        .unwrap();
    choreo.scene_mut().remove(id);

    let report = choreo.on_scroll(50.0);
    assert_eq!(report.writes, 0);
    assert_eq!(report.skipped, 1);
}
