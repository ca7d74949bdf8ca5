use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use towerfield_build::{BuildOutcome, GameConfig, Session};
use towerfield_input::{Action, parse_script};
use towerfield_tools::SessionInspector;

#[derive(Parser)]
#[command(name = "towerfield-cli", about = "Drive towerfield building sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the default configuration
    Info,
    /// Walk through the reference 5x5 board: build, get blocked, build again
    Demo,
    /// Apply a YAML action script to a session
    Play {
        /// Session configuration (YAML); defaults to the reference board
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Action script (YAML list of actions)
        #[arg(short, long)]
        script: PathBuf,
        /// Print one JSON object per action instead of text
        #[arg(long)]
        json: bool,
    },
    /// Render the empty board of a configuration
    Map {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("towerfield-cli v{}", env!("CARGO_PKG_VERSION"));
            print!("{}", GameConfig::default().to_yaml()?);
        }
        Commands::Demo => run_demo()?,
        Commands::Play {
            config,
            script,
            json,
        } => {
            let config = load_config(config.as_deref())?;
            let yaml = std::fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let actions = parse_script(&yaml)?;
            run_script(&config, &actions, json)?;
        }
        Commands::Map { config } => {
            let config = load_config(config.as_deref())?;
            let session = Session::new(&config)?;
            print!("{}", SessionInspector::render_map(session.grid()));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<GameConfig> {
    match path {
        Some(path) => Ok(GameConfig::load(path)?),
        None => Ok(GameConfig::default()),
    }
}

fn describe(outcome: &BuildOutcome) -> String {
    match outcome {
        BuildOutcome::Placed { entity, coord } => {
            format!("placed {} at {coord}", entity.short())
        }
        BuildOutcome::Rejected(rejection) => format!("rejected: {rejection}"),
    }
}

fn run_demo() -> anyhow::Result<()> {
    let mut session = Session::new(&GameConfig::default())?;
    println!("{}", SessionInspector::summary(&session));

    let steps = [
        Action::SelectBlueprint { id: "house".into() },
        Action::Click {
            position: Vec3::new(2.5, 0.0, 2.5),
            over_ui: false,
        },
        Action::Click {
            position: Vec3::new(2.5, 0.0, 3.5),
            over_ui: false,
        },
        Action::Click {
            position: Vec3::new(4.5, 0.0, 4.5),
            over_ui: false,
        },
    ];
    for action in &steps {
        if let Some(outcome) = session.apply(action)? {
            println!("{:<40} money={}", describe(&outcome), session.money());
        }
    }

    print!("{}", SessionInspector::render_map(session.grid()));
    let summary = SessionInspector::summary(&session);
    println!("{summary}");
    anyhow::ensure!(summary.replay_consistent, "scene replay diverged");
    Ok(())
}

fn run_script(config: &GameConfig, actions: &[Action], json: bool) -> anyhow::Result<()> {
    let mut session = Session::new(config)?;
    tracing::debug!(actions = actions.len(), "running script");
    for (step, action) in actions.iter().enumerate() {
        let outcome = session
            .apply(action)
            .with_context(|| format!("action {step} failed"))?;
        if json {
            let line = serde_json::json!({
                "step": step,
                "action": action,
                "outcome": outcome.as_ref().map(describe),
                "money": session.money(),
            });
            println!("{line}");
        } else if let Some(outcome) = outcome {
            println!("[{step}] {} (money={})", describe(&outcome), session.money());
        }
    }

    let summary = SessionInspector::summary(&session);
    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        print!("{}", SessionInspector::render_map(session.grid()));
        println!("{summary}");
    }
    anyhow::ensure!(summary.replay_consistent, "scene replay diverged");
    Ok(())
}
