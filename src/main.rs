//! Minimal demo binary: load a graph from a YAML file, run one action
//! against it, and print the final status of every top-level entity. The
//! full cluster-admin front-end (progress bars, `--fanout`/`--exclude`
//! flags, DOT rendering) is out of scope for this crate; see `SPEC_FULL.md`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use milkcheck::domain::models::graph_from_value;
use milkcheck::infrastructure::config::ConfigLoader;
use milkcheck::infrastructure::logging;
use milkcheck::infrastructure::worker::{LocalProcessWorker, SimulateWorker};
use milkcheck::{CommandRunner, Engine, RunContext};

#[derive(Parser, Debug)]
#[command(name = "milkcheck", about = "Run an action across a service graph")]
struct Cli {
    /// Path to a YAML graph configuration.
    config: PathBuf,
    /// Action name to run (e.g. "start", "stop").
    #[arg(default_value = "start")]
    action: String,
    /// Never execute real commands; report success instantly.
    #[arg(long)]
    simulate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let engine_config = ConfigLoader::load().context("loading engine configuration")?;
    logging::init(&engine_config.log_level, &engine_config.log_format)?;

    let raw = std::fs::read_to_string(&cli.config)
        .with_context(|| format!("reading {}", cli.config.display()))?;
    let doc: serde_yaml::Value = serde_yaml::from_str(&raw).context("parsing graph YAML")?;
    let doc: serde_json::Value = serde_json::to_value(doc).context("converting graph document")?;
    let mut graph = graph_from_value(&doc).context("building graph from configuration")?;

    let worker: Arc<dyn CommandRunner> = if cli.simulate {
        Arc::new(SimulateWorker)
    } else {
        Arc::new(LocalProcessWorker::new())
    };
    let (ctx, mut events) = RunContext::new(worker);
    let engine = Engine::new(ctx, engine_config.default_fanout);

    let logger = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!(?event, "run event");
        }
    });

    engine.run_to_completion(&mut graph, &cli.action).await;
    drop(engine);
    let _ = logger.await;

    for (name, entity) in graph.entities() {
        println!("{name}: {:?}", entity.status);
    }
    Ok(())
}
