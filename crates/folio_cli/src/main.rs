//! Folio CLI
//!
//! Scaffold, validate and replay scroll choreography scenes.
//!
//! ```text
//! folio init [path] [--template portfolio|minimal] [--force]
//! folio check <scene>
//! folio run <scene> [--json] [--follow-snaps]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use folio_scroll::Branch;

mod config;
mod demo;
mod runner;

use config::{SceneConfig, ScriptStep};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Scroll choreography scenes", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter scene
    Init {
        /// Directory (or .toml file) to write
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Scene template
        #[arg(short, long, default_value = "portfolio")]
        template: String,

        /// Overwrite an existing scene file
        #[arg(long)]
        force: bool,
    },

    /// Register every timeline, pin and idle loop of a scene, branch by branch
    Check {
        /// Scene file
        scene: PathBuf,
    },

    /// Replay a scene's script and print the final element states
    Run {
        /// Scene file
        scene: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Scroll to positions requested by snapping
        #[arg(long)]
        follow_snaps: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init {
            path,
            template,
            force,
        } => cmd_init(path, &template, force),
        Commands::Check { scene } => cmd_check(scene),
        Commands::Run {
            scene,
            json,
            follow_snaps,
        } => cmd_run(scene, json, follow_snaps),
    }
}

fn cmd_init(path: PathBuf, template: &str, force: bool) -> Result<()> {
    let file = demo::create_scene(&path, template, force)?;
    info!("Wrote {} scene to {}", template, file.display());
    println!();
    println!("Next steps:");
    println!("  folio check {}", file.display());
    println!("  folio run {}", file.display());
    Ok(())
}

fn cmd_check(path: PathBuf) -> Result<()> {
    let config = SceneConfig::load(&path)?;
    let mut stage = config.build()?;
    let initial = config.initial();

    let branches = config.branch_list();
    for step in &config.script {
        if let ScriptStep::Switch { switch } = step {
            if !branches.iter().any(|b| &b.name == switch) {
                anyhow::bail!("script switches to unknown branch `{switch}`");
            }
        }
    }

    let choreo = stage.choreographer();
    println!(
        "{}: {} elements, {} branches, {} script steps",
        path.display(),
        choreo.scene().len(),
        branches.len(),
        config.script.len()
    );

    // Mount every branch once so its setup runs against its own subtree
    for branch in &branches {
        let name = Branch::new(branch.name.clone());
        if name != initial {
            stage
                .switch_branch(&name)
                .with_context(|| format!("branch `{name}` failed to mount"))?;
        }
        let choreo = stage.choreographer();
        println!(
            "  branch {:<16} ok ({} subscriptions, {} pins, {} idle loops active)",
            name.name(),
            choreo.active_subscription_count(),
            choreo.pin_count(),
            choreo.idle_loop_count()
        );
    }

    let released = stage.teardown();
    info!(released, "scene ok");
    Ok(())
}

fn cmd_run(path: PathBuf, json: bool, follow_snaps: bool) -> Result<()> {
    let config = SceneConfig::load(&path)?;
    let mut stage = config.build()?;
    info!(
        steps = config.script.len(),
        branch = ?stage.active_branch().map(Branch::name),
        "replaying script"
    );

    let report = runner::run(&mut stage, &config.script, follow_snaps)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
