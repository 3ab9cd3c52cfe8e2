//! drudge - シナリオを読み込んでターンを回す CLI
//!
//! ```text
//! drudge run demos/sort.json --seed 7
//! drudge run demos/sort.json --max-turns 5 --save tasks.json
//! drudge run demos/sort.json --tasks tasks.json
//! drudge kinds
//! ```

mod config;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use drudge_core::app::{ActorStatus, EngineBuilder, SavedTasks};
use drudge_core::impls::{Loaded, Scenario};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, DEFAULT_MAX_TURNS};

/// Turn-based task engine driver.
#[derive(Parser)]
#[command(name = "drudge", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a scenario and run its actor until idle.
    Run {
        /// Scenario file (JSON).
        scenario: PathBuf,

        /// Random seed; a random one is picked and logged if omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many turns even if work is left.
        #[arg(long)]
        max_turns: Option<u64>,

        /// Replace the scenario's task with previously saved tasks.
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Write the actor's remaining tasks here when the run stops.
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// List the task kinds the engine can load.
    Kinds,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("drudge=info,drudge_core=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };

    match cli.command {
        Command::Run {
            scenario,
            seed,
            max_turns,
            tasks,
            save,
        } => run(RunArgs {
            scenario,
            seed,
            max_turns,
            tasks,
            save,
            config,
        }),
        Command::Kinds => {
            let engine = EngineBuilder::new().build()?;
            for kind in engine.registry.registered_kinds() {
                println!("{kind}");
            }
            Ok(())
        }
    }
}

struct RunArgs {
    scenario: PathBuf,
    seed: Option<u64>,
    max_turns: Option<u64>,
    tasks: Option<PathBuf>,
    save: Option<PathBuf>,
    config: CliConfig,
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.scenario)
        .with_context(|| format!("failed to read scenario {}", args.scenario.display()))?;
    let scenario = Scenario::from_json(&text)
        .with_context(|| format!("invalid scenario {}", args.scenario.display()))?;

    let seed = args
        .seed
        .or(args.config.seed)
        .unwrap_or_else(rand::random::<u64>);
    let max_turns = args
        .max_turns
        .or(args.config.max_turns)
        .unwrap_or(DEFAULT_MAX_TURNS);
    let mut engine = EngineBuilder::new()
        .config(args.config.engine)
        .seed(seed)
        .build()?;

    let Loaded {
        mut world,
        mut actor,
        task,
    } = scenario.load(&engine.registry)?;

    match (&args.tasks, task) {
        (Some(path), _) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read saved tasks {}", path.display()))?;
            let saved: SavedTasks = serde_json::from_str(&text)
                .with_context(|| format!("invalid saved tasks {}", path.display()))?;
            engine.load_tasks(&mut actor, &saved);
        }
        (None, Some(task)) => engine.scheduler.assign(&mut actor, &mut world, task),
        (None, None) => bail!(
            "scenario {} gives {} nothing to do",
            args.scenario.display(),
            actor.name
        ),
    }

    info!(seed, max_turns, actor = %actor.name, "run started");
    let report = engine
        .scheduler
        .run_until_idle(&mut actor, &mut world, max_turns);
    if !report.idle {
        warn!(turns = report.turns, "stopped with work left");
    }

    for message in world.take_messages() {
        println!("[{:?}] {}", message.kind, message.text);
    }
    for end in &report.ends {
        println!("{} {:?}", end.kind, end.reason);
    }
    println!("{}", serde_json::to_string_pretty(&ActorStatus::of(&actor))?);

    if let Some(path) = &args.save {
        let saved = engine.save_tasks(&actor)?;
        fs::write(path, serde_json::to_string_pretty(&saved)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "tasks saved");
    }
    Ok(())
}
