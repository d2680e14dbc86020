//! Wikipedia speedrun benchmark CLI
//!
//! Pits link-choosing strategies against each other on start → target
//! scenarios over live Wikipedia, using a local Ollama server for sentence
//! embeddings and text generation.

use std::{path::PathBuf, sync::Arc, time::Duration};

use benchmark::{
  BenchmarkHarness, NavigationEngine, StrategyKind, StrategyRegistry, reports::generate_reports, render_table,
};
use clap::{Parser, Subcommand};
use embedding::{EmbeddingOracle, OllamaProvider};
use indicatif::{ProgressBar, ProgressStyle};
use links::WikipediaLinkSource;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use wikirun_core::{Config, PageRef, ScenarioSpec, default_scenarios, filter_scenarios, load_scenarios};

#[derive(Parser)]
#[command(name = "wikirun-bench")]
#[command(about = "Wikipedia speedrun benchmark for link-choosing strategies")]
#[command(version)]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Config file (defaults to ~/.config/wikirun/config.toml when present)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run every scenario against every selected strategy
  Run {
    /// Scenarios file (TOML); built-in scenarios when omitted
    #[arg(long)]
    scenarios: Option<PathBuf>,

    /// Filter scenarios by id or label (supports glob wildcards)
    #[arg(short, long)]
    filter: Option<String>,

    /// Strategies to run, in order (repeatable; all when omitted)
    #[arg(short, long = "strategy", value_enum)]
    strategies: Vec<StrategyKind>,

    /// Override the step ceiling per game
    #[arg(long)]
    max_steps: Option<usize>,

    /// Override the delay between runs in milliseconds (0 disables)
    #[arg(long)]
    pacing_ms: Option<u64>,

    /// Write JSON and Markdown reports into this directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name for this benchmark run (report file stem)
    #[arg(long)]
    name: Option<String>,
  },

  /// List available scenarios
  List {
    /// Scenarios file (TOML); built-in scenarios when omitted
    #[arg(long)]
    scenarios: Option<PathBuf>,
  },

  /// Print the links a page offers after filtering
  Links {
    /// Article URL, e.g. https://en.wikipedia.org/wiki/Potato
    url: String,
  },

  /// Check that the embedding and generation backends are reachable
  Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Setup logging
  let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
  let subscriber = FmtSubscriber::builder()
    .with_max_level(level)
    .with_target(false)
    .finish();
  tracing::subscriber::set_global_default(subscriber)?;

  let config = Config::load(cli.config.as_deref())?;

  match cli.command {
    Commands::Run {
      scenarios,
      filter,
      strategies,
      max_steps,
      pacing_ms,
      output,
      name,
    } => {
      let options = RunOptions {
        scenarios,
        filter,
        strategies,
        max_steps,
        pacing_ms,
        output,
        name,
      };
      run_benchmark(config, options).await
    }
    Commands::List { scenarios } => list_scenarios(scenarios),
    Commands::Links { url } => show_links(config, url).await,
    Commands::Health => check_health(config).await,
  }
}

struct RunOptions {
  scenarios: Option<PathBuf>,
  filter: Option<String>,
  strategies: Vec<StrategyKind>,
  max_steps: Option<usize>,
  pacing_ms: Option<u64>,
  output: Option<PathBuf>,
  name: Option<String>,
}

fn resolve_scenarios(path: Option<&PathBuf>) -> anyhow::Result<Vec<ScenarioSpec>> {
  match path {
    Some(path) => {
      info!("Loading scenarios from: {}", path.display());
      Ok(load_scenarios(path)?)
    }
    None => Ok(default_scenarios()),
  }
}

async fn run_benchmark(mut config: Config, options: RunOptions) -> anyhow::Result<()> {
  if let Some(max_steps) = options.max_steps {
    config.game.max_steps = max_steps;
  }
  if let Some(pacing_ms) = options.pacing_ms {
    config.game.pacing_ms = pacing_ms;
  }
  config.validate()?;

  let all_scenarios = resolve_scenarios(options.scenarios.as_ref())?;
  let scenarios: Vec<ScenarioSpec> = match &options.filter {
    Some(pattern) => filter_scenarios(&all_scenarios, pattern).into_iter().cloned().collect(),
    None => all_scenarios,
  };

  if scenarios.is_empty() {
    warn!(
      "No scenarios match filter: {}",
      options.filter.as_deref().unwrap_or("*")
    );
    return Ok(());
  }

  // Collaborators are built once and shared by every strategy and game
  let link_source = Arc::new(WikipediaLinkSource::from_config(&config.links)?);
  let oracle = Arc::new(EmbeddingOracle::new(Arc::new(OllamaProvider::from_config(
    &config.embedding,
  ))));
  let generator = llm::create_provider(&config.llm);

  let registry = StrategyRegistry::build(&options.strategies, oracle, generator);
  let engine = NavigationEngine::new(link_source);
  let mut harness = BenchmarkHarness::from_config(engine, registry, &config.game);

  info!(
    "Running {} scenarios × {} strategies ({})",
    scenarios.len(),
    harness.strategies().len(),
    harness.strategies().names().join(", ")
  );

  let pb = ProgressBar::new(harness.total_runs(&scenarios) as u64);
  pb.set_style(
    ProgressStyle::default_bar()
      .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
      .progress_chars("#>-"),
  );
  pb.enable_steady_tick(Duration::from_millis(200));

  let rows = harness
    .run_observed(&scenarios, |row| {
      pb.set_message(format!("{} [{}] {}", row.scenario, row.strategy, row.result.status));
      pb.inc(1);
    })
    .await
    .to_vec();
  pb.finish_with_message("done");

  println!();
  print!("{}", render_table(&rows));

  if let Some(output) = options.output {
    let written = generate_reports(&rows, config.game.max_steps, &output, options.name.as_deref()).await?;
    for path in written {
      info!("Report written to: {}", path.display());
    }
  }

  Ok(())
}

fn list_scenarios(path: Option<PathBuf>) -> anyhow::Result<()> {
  let scenarios = resolve_scenarios(path.as_ref())?;

  println!("Available scenarios ({}):", scenarios.len());
  println!();
  for scenario in &scenarios {
    match &scenario.id {
      Some(id) => println!("  {:<24} {}", id, scenario.label()),
      None => println!("  {:<24} {}", "-", scenario.label()),
    }
    println!("  {:<24} keywords: {}", "", scenario.keywords);
  }

  Ok(())
}

async fn show_links(config: Config, url: String) -> anyhow::Result<()> {
  let source = WikipediaLinkSource::from_config(&config.links)?;
  let page = PageRef::new(url);

  let links = source.try_fetch(&page).await?;
  println!("{} ({} links)", page.title(), links.len());
  println!();
  for (title, target) in links.iter() {
    println!("  {:<40} {}", title, target);
  }

  Ok(())
}

async fn check_health(config: Config) -> anyhow::Result<()> {
  let embedder = OllamaProvider::from_config(&config.embedding);
  let health = embedder.check_health().await;

  println!("Embedding backend ({})", config.embedding.ollama_url);
  if health.available {
    println!("  Status: available");
    println!(
      "  Model {}: {}",
      health.configured_model,
      if health.configured_model_available { "pulled" } else { "MISSING" }
    );
  } else {
    println!("  Status: UNREACHABLE");
  }

  let generator = llm::create_provider(&config.llm);
  let llm_available = generator.is_available().await;
  println!();
  println!("Generation backend ({}, {})", generator.name(), config.llm.ollama_url);
  println!("  Status: {}", if llm_available { "available" } else { "UNREACHABLE" });

  if !(health.available && health.configured_model_available && llm_available) {
    anyhow::bail!("one or more backends are not ready");
  }
  Ok(())
}
