use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::Config;
use core_types::{PerformanceSnapshot, RiskProfile, TemplateId};
use decision_gate::{DecisionGate, DiversityReport, DuplicateReport, ValidationReport};
use feedback_loop::FeedbackLoop;
use indicatif::{ProgressBar, ProgressStyle};
use rationale::RationaleGenerator;
use recommender::{JsonChampionFile, TemplateRecommender};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use templates::TemplateRegistry;
use tracing_subscriber::EnvFilter;
use usage_store::UsageStore;

/// The main entry point for the Meridian research-pipeline tooling.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match configuration::load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::debug!(
        ledger = %config.storage.ledger_path.display(),
        "configuration loaded"
    );

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Recommend(args) => handle_recommend(args, &config),
        Commands::Record(args) => handle_record(args, &config),
        Commands::Stats(args) => handle_stats(args, &config),
        Commands::Gate(args) => handle_gate(args),
        Commands::Replay(args) => handle_replay(args, &config),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Template recommendation, feedback learning and batch gating for the
/// strategy research pipeline.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend the template for the next research iteration.
    Recommend(RecommendArgs),
    /// Record the realized outcome of a template invocation.
    Record(RecordArgs),
    /// Show per-template usage statistics from the ledger.
    Stats(StatsArgs),
    /// Evaluate the GO/CONDITIONAL_GO/NO-GO gate over a strategy batch.
    Gate(GateArgs),
    /// Replay a file of historical iteration outcomes through the loop.
    Replay(ReplayArgs),
}

#[derive(Parser)]
struct RecommendArgs {
    /// The iteration number (every 5th routes through exploration).
    #[arg(long, default_value_t = 1)]
    iteration: u64,

    /// Current Sharpe ratio, if a previous strategy exists.
    #[arg(long)]
    sharpe: Option<f64>,

    /// Current max drawdown as a fraction (e.g. 0.18).
    #[arg(long)]
    drawdown: Option<f64>,

    /// Force a risk profile: concentrated, stable or fast.
    #[arg(long)]
    risk_profile: Option<RiskProfile>,

    /// JSON champion file to seed parameters from.
    #[arg(long)]
    champions: Option<PathBuf>,
}

#[derive(Parser)]
struct RecordArgs {
    #[arg(long)]
    iteration: u64,

    /// Wire name of the template used (e.g. "momentum_ranker").
    #[arg(long)]
    template: TemplateId,

    #[arg(long)]
    sharpe: f64,

    #[arg(long)]
    validation_passed: bool,

    #[arg(long)]
    exploration: bool,

    #[arg(long)]
    champion_based: bool,

    #[arg(long, default_value_t = 0.5)]
    match_score: f64,
}

#[derive(Parser)]
struct StatsArgs {
    /// Restrict output to one template.
    #[arg(long)]
    template: Option<TemplateId>,

    /// Write the full snapshot as JSON to this path.
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Parser)]
struct GateArgs {
    /// JSON validation-results report.
    #[arg(long)]
    validation: PathBuf,

    /// JSON duplicate-detection report.
    #[arg(long)]
    duplicates: PathBuf,

    /// JSON diversity report.
    #[arg(long)]
    diversity: PathBuf,
}

#[derive(Parser)]
struct ReplayArgs {
    /// JSON array of historical iteration outcomes.
    #[arg(long)]
    outcomes: PathBuf,
}

/// One historical outcome in a replay file.
#[derive(Debug, Deserialize)]
struct ReplayOutcome {
    sharpe_ratio: f64,
    #[serde(default)]
    max_drawdown: f64,
    #[serde(default)]
    validation_passed: bool,
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn build_recommender(config: &Config, champions: Option<PathBuf>) -> TemplateRecommender {
    let registry = TemplateRegistry::new();
    let mut recommender = TemplateRecommender::new(registry);
    let champion_path = champions.or_else(|| config.storage.champions_path.clone());
    if let Some(path) = champion_path {
        recommender = recommender.with_champion_source(Box::new(JsonChampionFile::new(path)));
    }
    recommender
}

fn handle_recommend(args: RecommendArgs, config: &Config) -> anyhow::Result<i32> {
    let registry = TemplateRegistry::new();
    let store = UsageStore::open(
        &config.storage.ledger_path,
        config.feedback.success_threshold,
    );
    let mut recommender = build_recommender(config, args.champions);

    let metrics = args.sharpe.map(|sharpe| PerformanceSnapshot {
        sharpe_ratio: sharpe,
        max_drawdown: args.drawdown.unwrap_or(0.0),
    });

    let recommendation = recommender.recommend(
        metrics.as_ref(),
        args.iteration,
        None,
        None,
        args.risk_profile,
    );

    let generator = RationaleGenerator::new(&registry).with_statistics(&store);
    println!("{}", generator.render(&recommendation, metrics.as_ref(), None));
    Ok(0)
}

fn handle_record(args: RecordArgs, config: &Config) -> anyhow::Result<i32> {
    let mut store = UsageStore::open(
        &config.storage.ledger_path,
        config.feedback.success_threshold,
    );
    store.record_usage(
        args.iteration,
        args.template,
        args.sharpe,
        args.validation_passed,
        args.exploration,
        args.champion_based,
        args.match_score,
    )?;
    println!(
        "Recorded iteration {} for '{}' ({} records in ledger).",
        args.iteration,
        args.template,
        store.len()
    );
    Ok(0)
}

fn handle_stats(args: StatsArgs, config: &Config) -> anyhow::Result<i32> {
    let store = UsageStore::open(
        &config.storage.ledger_path,
        config.feedback.success_threshold,
    );

    let templates: Vec<TemplateId> = match args.template {
        Some(template) => vec![template],
        None => TemplateId::ALL.to_vec(),
    };

    let mut table = Table::new();
    table.set_header(vec![
        "Template",
        "Uses",
        "Success %",
        "Avg Sharpe",
        "Best",
        "Worst",
        "Pass %",
        "Reliable",
    ]);
    for template in templates {
        let s = store.statistics_for(template);
        if !s.has_data {
            table.add_row(vec![
                template.to_string(),
                "0".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                "no".into(),
            ]);
            continue;
        }
        table.add_row(vec![
            template.to_string(),
            s.total_usage.to_string(),
            format!("{:.1}", s.success_rate * 100.0),
            format!("{:.2}", s.avg_sharpe),
            format!("{:.2}", s.best_sharpe),
            format!("{:.2}", s.worst_sharpe),
            format!("{:.1}", s.validation_pass_rate * 100.0),
            if s.reliable { "yes".into() } else { "no".into() },
        ]);
    }
    println!("{table}");

    match store.best_template() {
        Some(best) => println!("Best template so far: {}", best),
        None => println!("Best template so far: (no template has reliable statistics yet)"),
    }

    if let Some(path) = args.export {
        let snapshot = store.export_snapshot(config.feedback.snapshot_recent);
        fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
        println!("Snapshot written to {}", path.display());
    }
    Ok(0)
}

fn handle_gate(args: GateArgs) -> anyhow::Result<i32> {
    let validation = ValidationReport::from_json_str(&fs::read_to_string(&args.validation)?)?;
    let duplicates = DuplicateReport::from_json_str(&fs::read_to_string(&args.duplicates)?)?;
    let diversity = DiversityReport::from_json_str(&fs::read_to_string(&args.diversity)?)?;

    let report = DecisionGate::new().evaluate(&validation, &duplicates, &diversity);
    println!("{}", report.to_document());

    Ok(report.decision.exit_code())
}

fn handle_replay(args: ReplayArgs, config: &Config) -> anyhow::Result<i32> {
    let outcomes: Vec<ReplayOutcome> = serde_json::from_str(&fs::read_to_string(&args.outcomes)?)?;

    let registry = TemplateRegistry::new();
    let recommender = build_recommender(config, None);
    let store = UsageStore::open(
        &config.storage.ledger_path,
        config.feedback.success_threshold,
    );
    let mut feedback_loop = FeedbackLoop::new(registry, recommender, store);

    let progress = ProgressBar::new(outcomes.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    // The metrics driving each recommendation are the previous iteration's
    // realized outcome, exactly as in a live research loop.
    let mut previous: Option<PerformanceSnapshot> = None;
    for (i, outcome) in outcomes.iter().enumerate() {
        let iteration = i as u64 + 1;
        let result = feedback_loop.run_iteration(iteration, previous.as_ref(), None);
        feedback_loop.record_outcome(
            iteration,
            &result.recommendation,
            outcome.sharpe_ratio,
            outcome.validation_passed,
        )?;
        previous = Some(PerformanceSnapshot {
            sharpe_ratio: outcome.sharpe_ratio,
            max_drawdown: outcome.max_drawdown,
        });
        progress.set_message(format!("{}", result.recommendation.template_name));
        progress.inc(1);
    }
    progress.finish_with_message("replay complete");

    println!("Trend after replay: {:?}", feedback_loop.trend());
    match feedback_loop.store().best_template() {
        Some(best) => println!("Best template: {}", best),
        None => println!("Best template: (insufficient data)"),
    }
    Ok(0)
}
