//! Ragdoll simulation command line.
//!
//! Builds a humanoid, plans forces from a free-text request, simulates, and
//! prints the result as JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Simulate a request (the engine must be enabled)
//! ENABLE_RAG_PHYSICS=true ragdoll run --query "make it jump"
//!
//! # Enable from the command line, reproducible forces, text summary
//! ragdoll run --enable --query "push it" --seed 7 --summary
//!
//! # Override configuration from a JSON file
//! ragdoll run --enable --query "spin" --config moon.json
//!
//! # Only classify a request
//! ragdoll classify "show me a ragdoll falling"
//! ```

mod config;
mod report;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sim_physics::prelude::{
    needs_simulation, ForcePlanner, HumanoidBuilder, KeywordPlanner, MotionKind, Scenario,
    Stepper, DEFAULT_HEIGHT, DEFAULT_MASS,
};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use crate::report::{Classification, RunReport};

/// Ragdoll physics simulator
#[derive(Parser, Debug)]
#[command(name = "ragdoll")]
#[command(author, version, about = "Humanoid ragdoll physics from free-text requests", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a humanoid reacting to a request
    Run {
        /// Request text, e.g. "show me a ragdoll getting punched"
        #[arg(short, long)]
        query: String,

        /// Seed for the force planner; random when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// Simulated time in seconds
        #[arg(short, long, default_value = "3.0")]
        duration: f64,

        /// Standing height of the humanoid (m)
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: f64,

        /// Total mass of the humanoid (kg)
        #[arg(long, default_value_t = DEFAULT_MASS)]
        mass: f64,

        /// Model id; defaults to a timestamped id
        #[arg(long)]
        id: Option<String>,

        /// JSON file merged over the environment configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Enable the engine regardless of ENABLE_RAG_PHYSICS
        #[arg(long)]
        enable: bool,

        /// Print a text summary instead of JSON
        #[arg(long)]
        summary: bool,
    },

    /// Classify a request without simulating
    Classify {
        /// Request text
        #[arg(value_name = "QUERY")]
        query: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            query,
            seed,
            duration,
            height,
            mass,
            id,
            config,
            enable,
            summary,
        } => {
            let builder = HumanoidBuilder::new(id.unwrap_or_else(default_model_id))
                .height(height)
                .mass(mass);
            let mut planner: Box<dyn ForcePlanner> = match seed {
                Some(seed) => Box::new(KeywordPlanner::seeded(seed)),
                None => Box::new(KeywordPlanner::from_entropy()),
            };

            let engine = config::load(config.as_deref(), enable)?;
            let stepper = Stepper::new(engine).context("invalid engine configuration")?;

            let report = run(&stepper, planner.as_mut(), &builder, &query, duration)?;
            if summary {
                print!("{}", report.summary());
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Classify { query } => {
            let answer = Classification {
                needs_simulation: needs_simulation(&query),
                motion: MotionKind::classify(&query).label(),
                query,
            };
            println!("{}", serde_json::to_string_pretty(&answer)?);
        }
    }

    Ok(())
}

/// Build the scenario for `query` and simulate it.
fn run(
    stepper: &Stepper,
    planner: &mut dyn ForcePlanner,
    builder: &HumanoidBuilder,
    query: &str,
    duration: f64,
) -> Result<RunReport> {
    if !needs_simulation(query) {
        warn!(query, "request does not look like a simulation request");
    }
    if !stepper.config().enabled {
        warn!("engine disabled; set ENABLE_RAG_PHYSICS=true or pass --enable");
    }

    let scenario = Scenario::with_builder(planner, builder, query)
        .context("failed to build the humanoid")?;
    info!(
        model = %scenario.model.id,
        motion = %scenario.kind,
        forces = scenario.forces.len(),
        "scenario ready"
    );

    let result = stepper
        .simulate(&scenario.model, duration, &scenario.forces)
        .context("simulation failed")?;

    Ok(RunReport::new(query, scenario.kind, scenario.forces, result))
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn default_model_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("model_{millis}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use sim_physics::prelude::EngineConfig;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["ragdoll", "run", "--query", "jump"]).unwrap();
        match cli.command {
            Commands::Run {
                query,
                seed,
                duration,
                height,
                mass,
                enable,
                summary,
                ..
            } => {
                assert_eq!(query, "jump");
                assert_eq!(seed, None);
                assert_eq!(duration, 3.0);
                assert_eq!(height, DEFAULT_HEIGHT);
                assert_eq!(mass, DEFAULT_MASS);
                assert!(!enable && !summary);
            }
            Commands::Classify { .. } => panic!("expected run"),
        }
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_parse_classify() {
        let cli = Cli::try_parse_from(["ragdoll", "-l", "debug", "classify", "spin it"]).unwrap();
        assert!(matches!(cli.command, Commands::Classify { ref query } if query == "spin it"));
        assert_eq!(parse_level(&cli.log_level), Level::DEBUG);
    }

    #[test]
    fn test_run_produces_report() {
        let stepper = Stepper::new(EngineConfig::with_time_step(0.016)).unwrap();
        let mut planner = KeywordPlanner::seeded(1);
        let builder = HumanoidBuilder::new("t");

        let report = run(&stepper, &mut planner, &builder, "make it jump", 3.0).unwrap();

        assert_eq!(report.motion, "jump");
        assert_eq!(report.forces.len(), 2);
        assert_eq!(report.result.steps, 188);
    }

    #[test]
    fn test_run_rejects_bad_dimensions() {
        let stepper = Stepper::default();
        let mut planner = KeywordPlanner::seeded(1);
        let builder = HumanoidBuilder::new("t").height(0.0);

        assert!(run(&stepper, &mut planner, &builder, "jump", 1.0).is_err());
    }

    #[test]
    fn test_default_model_id() {
        assert!(default_model_id().starts_with("model_"));
    }
}
