//! Scene scaffolding

use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name `folio init` writes into a directory
pub const SCENE_FILE: &str = "folio.toml";

/// Write a scene from `template` under `path`. A path with an extension is
/// taken as the file itself.
pub fn create_scene(path: &Path, template: &str, force: bool) -> Result<PathBuf> {
    let file = if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.join(SCENE_FILE)
    };
    if file.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            file.display()
        );
    }
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let content = match template {
        "minimal" => template_minimal(),
        "portfolio" => template_portfolio(),
        other => bail!("unknown template `{other}` (expected `portfolio` or `minimal`)"),
    };
    fs::write(&file, content)?;
    Ok(file)
}

fn template_minimal() -> &'static str {
    r##"# A single element fading in over the first 400px of scroll

[viewport]
width = 1280
height = 800

[[elements]]
id = "title"
rect = [240, 200, 800, 160]

[[timelines]]
start = 0
end = 400
[[timelines.tweens]]
target = "#title"
from = { opacity = 0, y = 40 }
to = { opacity = 1, y = 0 }
ease = "power2.out"

[[script]]
scroll = 200
"##
}

/// Portfolio landing page: hero puzzle, floating pane, pinned gallery and
/// two content branches
fn template_portfolio() -> &'static str {
    r##"initial_branch = "work"

[viewport]
width = 1280
height = 800

[choreographer]
fixed_step = 0.016667
snap_settle = 0.1
snap_duration = 0.3

# Shared elements

[[elements]]
id = "nav"
rect = [0, 0, 1280, 64]
flow = "fixed"

# 180vh
[[elements]]
classes = ["hero-trigger"]
rect = [0, 0, 1280, 1440]

[[elements]]
classes = ["puzzle-piece"]
rect = [340, 100, 120, 120]
count = 25
cols = 5
step = [120, 120]

[[elements]]
classes = ["floating-pane"]
rect = [400, 200, 480, 400]
flow = "fixed"

[[elements]]
id = "projects"
rect = [0, 1440, 1280, 800]

[[elements]]
id = "gallery-track"
rect = [0, 1440, 3840, 800]

[[elements]]
classes = ["float-badge"]
rect = [1180, 720, 64, 64]
flow = "fixed"

# Global timelines

[[timelines]]
name = "nav"
trigger = ".hero-trigger"
start = "top top"
end = "10% top"
scrub = false
[[timelines.tweens]]
target = "#nav"
from = { opacity = 0, y = -64 }
to = { opacity = 1, y = 0 }
duration = 0.6

[[timelines]]
name = "puzzle"
trigger = ".hero-trigger"
start = "top top"
end = "bottom top"
scrub = true
[[timelines.tweens]]
target = ".puzzle-piece"
to = { scale = 1.05 }
ease = "power2.inOut"
# add seed = <n> for a reproducible order
stagger = { amount = 1.0, grid = [5, 5], from = "random" }

[[timelines]]
name = "pane"
trigger = ".hero-trigger"
start = "70% top"
end = "120% top"
scrub = 1.5
[[timelines.tweens]]
target = ".floating-pane"
from = { x = "40vw", y = "40vh", opacity = 0 }
to = { x = 0, y = 0, opacity = 1 }
ease = "power3.out"

[[timelines]]
name = "gallery"
trigger = "#projects"
start = "top top"
end = "bottom top"
pin = "#projects"
gallery = { track = "#gallery-track", slides = 3 }

[[idle]]
repeat = -1
yoyo = true
[[idle.tweens]]
target = ".float-badge"
to = { y = -12 }
ease = "sine.inOut"
duration = 1.5

# Branches

[[branches]]
name = "work"

[[branches.elements]]
classes = ["work-card"]
rect = [80, 2300, 340, 420]
count = 3
step = [380, 0]

[[branches.timelines]]
trigger = ".work-card"
start = "top bottom"
end = "top 60%"
[[branches.timelines.tweens]]
target = ".work-card"
from = { opacity = 0, y = 40 }
to = { opacity = 1, y = 0 }
ease = "power2.out"
stagger = { amount = 0.3 }

[[branches]]
name = "about"

[[branches.elements]]
id = "about-copy"
rect = [160, 2300, 960, 600]

[[branches.timelines]]
trigger = "#about-copy"
start = "top bottom"
end = "center center"
scrub = 0.8
[[branches.timelines.tweens]]
target = "#about-copy"
from = { opacity = 0, x = "-10vw" }
to = { opacity = 1, x = 0 }

# Input replayed by `folio run`

[[script]]
frames = 30

[[script]]
scroll = 720

[[script]]
frames = 120

# 42% through the gallery; settles on the middle slide
[[script]]
scroll = 1776

[[script]]
frames = 60

[[script]]
switch = "about"

[[script]]
overlay = true

[[script]]
scroll = 1900

[[script]]
frames = 90
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use crate::runner;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("folio-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_portfolio_template_replays() {
        let config = SceneConfig::from_toml(template_portfolio()).unwrap();
        let mut stage = config.build().unwrap();
        assert_eq!(stage.choreographer().active_subscription_count(), 5);

        let report = runner::run(&mut stage, &config.script, false).unwrap();
        assert_eq!(report.active_branch.as_deref(), Some("about"));
        assert!(report.overlay_visible);
        // once at 42%, again after the switch re-measured and 1900 settled back
        assert_eq!(report.scroll_requests, vec![1840.0, 1840.0]);
        assert_eq!(report.pins, 1);
        assert_eq!(report.idle_loops, 1);
        assert_eq!(report.skipped, 0);
        assert!(report.elements.iter().all(|e| e.label != ".work-card"));

        let pieces: Vec<_> = report
            .elements
            .iter()
            .filter(|e| e.label == ".puzzle-piece")
            .collect();
        assert_eq!(pieces.len(), 25);
        assert!(pieces.iter().all(|p| (p.scale_x - 1.05).abs() < 1e-4));

        let track = report
            .elements
            .iter()
            .find(|e| e.label == "#gallery-track")
            .unwrap();
        assert!((track.x + 1280.0).abs() < 1e-2);
    }

    #[test]
    fn test_minimal_template_builds() {
        let config = SceneConfig::from_toml(template_minimal()).unwrap();
        let mut stage = config.build().unwrap();
        let report = runner::run(&mut stage, &config.script, false).unwrap();
        let title = &report.elements[0];
        // power2.out at the halfway point
        assert!((title.opacity - 0.875).abs() < 1e-4);
        assert!((title.y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_create_scene_refuses_to_overwrite() {
        let dir = scratch_dir("init");
        let file = create_scene(&dir, "minimal", false).unwrap();
        assert_eq!(file, dir.join(SCENE_FILE));
        assert!(create_scene(&dir, "minimal", false).is_err());
        assert!(create_scene(&dir, "portfolio", true).is_ok());
        assert!(create_scene(&dir, "nope", true).is_err());

        let loaded = SceneConfig::load(&file).unwrap();
        assert_eq!(loaded.branches.len(), 2);
        let _ = fs::remove_dir_all(&dir);
    }
}
