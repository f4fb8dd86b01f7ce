//! # engine_editor: command-line host
//!
//! Drives an [`EditorSession`] without a window: create, list, simulate,
//! export, import, and delete saved projects.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_component::Entity;
use engine_editor::EditorSession;
use engine_math::Transform;
use engine_project::{Catalog, FileStore, StorageConfig};
use engine_world::components::Velocity;
use engine_world::{Key, SimulationConfig};

#[derive(Parser)]
#[command(name = "engine_editor", about = "Scene editor runtime, headless")]
struct Args {
    /// Directory holding the save catalog (defaults to `ENGINE_PROJECT_DIR`).
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save a fresh single-cube project.
    New {
        #[arg(short, long, default_value = "Untitled")]
        name: String,
    },
    /// List saved projects, newest first.
    List,
    /// Load a project, play it for a number of frames, and print positions.
    Play {
        #[arg(short, long)]
        project: Option<String>,
        #[arg(short, long, default_value_t = 60)]
        frames: u32,
        /// Seconds per frame.
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,
        /// Entity ids to put under keyboard control.
        #[arg(long)]
        control: Vec<u64>,
        /// Key codes held for the whole run (e.g. `KeyW`).
        #[arg(long)]
        press: Vec<String>,
        /// Save the result under this name.
        #[arg(long)]
        save_as: Option<String>,
    },
    /// Write a saved project to a JSON file.
    Export {
        #[arg(short, long)]
        project: String,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Read a JSON project file and add it to the catalog.
    Import {
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Remove a saved project.
    Delete {
        #[arg(short, long)]
        project: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("engine_editor=info".parse()?))
        .init();

    let args = Args::parse();

    let storage = match args.dir {
        Some(dir) => StorageConfig::new(dir),
        None => StorageConfig::from_env(),
    };
    info!(dir = %storage.dir.display(), "using project directory");

    let catalog = Catalog::new(FileStore::new(storage));
    let mut session = EditorSession::new(SimulationConfig::default(), catalog);

    match args.command {
        Command::New { name } => {
            session.new_project();
            let doc = session.save(&name)?;
            println!("{}", doc.id);
        }
        Command::List => {
            for saved in session.list_saved()? {
                println!("{}\t{}\t{}", saved.id, saved.updated_at, saved.name);
            }
        }
        Command::Play {
            project,
            frames,
            dt,
            control,
            press,
            save_as,
        } => {
            match project {
                Some(id) => {
                    if !session.load(&id)? {
                        bail!("no saved project with id {id}");
                    }
                }
                None => {
                    session.new_project();
                }
            }

            for id in control {
                let entity = Entity::from_raw(id);
                session
                    .set_player_controlled(entity, true)
                    .with_context(|| format!("cannot control entity {id}"))?;
                let world = session.world_mut();
                if !world.has::<Velocity>(entity) {
                    world.insert(entity, Velocity::ZERO)?;
                }
            }
            for code in &press {
                if Key::from_code(code).is_none() {
                    bail!("unknown key code {code}");
                }
                session.input_mut().key_down(code);
            }

            session.play();
            let mut faults = 0;
            for _ in 0..frames {
                if let Some(report) = session.step(dt) {
                    faults += report.script_faults.len();
                }
            }
            session.stop();
            info!(frames, faults, "simulation finished");

            let world = session.world();
            for entity in world.entities() {
                if let Some(t) = world.get::<Transform>(entity) {
                    println!(
                        "{}\t{}\t{:.3}\t{:.3}\t{:.3}",
                        entity.id(),
                        world.display_name(entity),
                        t.position.x,
                        t.position.y,
                        t.position.z
                    );
                }
            }

            if let Some(name) = save_as {
                let doc = session.save(&name)?;
                println!("{}", doc.id);
            }
        }
        Command::Export { project, out } => {
            let doc = session
                .catalog()
                .get(&project)?
                .with_context(|| format!("no saved project with id {project}"))?;
            engine_project::export_to_file(&doc, &out)?;
            println!("{}", out.display());
        }
        Command::Import { file } => {
            let doc = session
                .import(&file)
                .with_context(|| format!("failed to import {}", file.display()))?;
            let saved = session.save(&doc.name)?;
            println!("{}", saved.id);
        }
        Command::Delete { project } => {
            if !session.delete_saved(&project)? {
                bail!("no saved project with id {project}");
            }
        }
    }

    Ok(())
}
