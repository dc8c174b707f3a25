use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fencing_stats::api::{build_router, state::AppState};
use fencing_stats::calculate::{self, FilterOptions};
use fencing_stats::config::AppConfig;
use fencing_stats::models::{AggregateResult, Metric, PhaseClass};
use fencing_stats::query::QueryFilters;
use fencing_stats::storage::{Dataset, StorageConfig};

#[derive(Parser)]
#[command(name = "fencing-stats")]
#[command(about = "Fencing match statistics and rankings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// List the values available for each filter
    Options,

    /// List matches passing the filters
    Matches {
        /// Maximum rows printed
        #[arg(long, default_value = "50")]
        limit: usize,

        #[command(flatten)]
        filters: QueryFilters,
    },

    /// Overall, pool and bracket statistics of one fencer
    Report {
        fencer: String,

        #[command(flatten)]
        filters: QueryFilters,
    },

    /// Rank every fencer on one metric within a phase class
    Rank {
        #[arg(long, default_value = "win_pct")]
        metric: Metric,

        /// pool or bracket
        #[arg(long, default_value = "pool")]
        phase: PhaseClass,

        #[command(flatten)]
        filters: QueryFilters,
    },

    /// Full statistics of every eligible fencer, sorted on one metric
    Leaderboard {
        #[arg(long, default_value = "win_pct")]
        metric: Metric,

        /// Fencer whose position is reported
        #[arg(long)]
        fencer: Option<String>,

        #[command(flatten)]
        filters: QueryFilters,
    },

    /// Head-to-head record of two fencers
    Versus {
        x: String,
        y: String,

        #[command(flatten)]
        filters: QueryFilters,
    },

    /// Per-season pool and bracket win rates of one fencer
    Trend {
        fencer: String,

        #[command(flatten)]
        filters: QueryFilters,
    },

    /// Competition placements of one fencer
    Placements {
        fencer: String,

        #[command(flatten)]
        filters: QueryFilters,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            cli.json_logs
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    tracing::info!("Starting fencing-stats v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());
    let dataset = Dataset::load(&storage)
        .with_context(|| format!("Failed to load dataset from {:?}", storage.data_dir))?;
    let engine = config.engine.clone();
    let marker = engine.pool_marker.as_str();
    let json = cli.json;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let app = build_router(AppState::new(dataset, engine));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}/api", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Options => {
            let options = FilterOptions::from_matches(&dataset.matches);
            emit(json, &options, print_options)?;
        }
        Commands::Matches { limit, filters } => {
            let ctx = filters.to_context()?;
            let subset = calculate::apply(&dataset.matches, &ctx, marker);
            if json {
                emit(true, &subset, |_| {})?;
            } else {
                println!("{} matches", subset.len());
                for m in subset.iter().take(limit) {
                    println!(
                        "  {} {} [{}] {} {}-{} {}",
                        m.date.format("%Y-%m-%d"),
                        m.competition,
                        m.phase.as_deref().unwrap_or("-"),
                        m.fencer_a,
                        score(m.touches_a),
                        score(m.touches_b),
                        m.fencer_b
                    );
                }
                if subset.len() > limit {
                    println!("  ... {} more", subset.len() - limit);
                }
            }
        }
        Commands::Report { fencer, filters } => {
            require_fencer(&dataset, &fencer)?;
            let ctx = filters.to_context()?;
            let report = calculate::fencer_report(&dataset.matches, &fencer, &ctx, &engine);
            emit(json, &report, |r| {
                println!("=== {} ===", r.fencer);
                print_aggregate("Overall", &r.overall);
                print_aggregate("Pool", &r.pool);
                print_aggregate("Bracket", &r.bracket);
                if !r.rejected.is_empty() {
                    println!("\nExcluded rows:");
                    for row in &r.rejected {
                        println!("  - {}: {}", row.id, row.reason);
                    }
                }
            })?;
        }
        Commands::Rank {
            metric,
            phase,
            filters,
        } => {
            let ctx = filters.to_context()?;
            let standings = calculate::standings(&dataset.matches, &ctx, phase, metric, &engine);
            emit(json, &standings, |rows| {
                println!(
                    "{} ranking on {} (min {} bouts, {} ranked)",
                    phase,
                    metric,
                    engine.min_matches_for(phase),
                    rows.len()
                );
                for s in rows {
                    println!(
                        "  #{:<4} {:<30} {:>8.2} ({} bouts)",
                        s.position.position, s.fencer, s.value, s.matches
                    );
                }
            })?;
        }
        Commands::Leaderboard {
            metric,
            fencer,
            filters,
        } => {
            let ctx = filters.to_context()?;
            let board =
                calculate::leaderboard(&dataset.matches, &ctx, metric, fencer.as_deref(), &engine);
            emit(json, &board, |b| {
                println!(
                    "Leaderboard on {} (min {} bouts, {} fencers)",
                    b.metric,
                    b.min_matches,
                    b.rows.len()
                );
                println!(
                    "  {:<5} {:<30} {:>7} {:>5} {:>7} {:>7} {:>7}",
                    "#", "Fencer", "Bouts", "Wins", "Win %", "Scored", "Conc."
                );
                for (i, row) in b.rows.iter().enumerate() {
                    let s = &row.stats;
                    println!(
                        "  {:<5} {:<30} {:>7} {:>5} {:>7.1} {:>7.2} {:>7.2}",
                        i + 1,
                        row.fencer,
                        s.matches,
                        s.wins,
                        s.win_pct,
                        s.mean_scored,
                        s.mean_conceded
                    );
                }
                if let Some(ref sel) = b.selected {
                    match sel.value {
                        Some(v) => println!(
                            "\n{}: #{} of {} ({:.2})",
                            sel.fencer, sel.position.position, sel.position.field_size, v
                        ),
                        None => println!("\n{}: not ranked", sel.fencer),
                    }
                }
            })?;
        }
        Commands::Versus { x, y, filters } => {
            require_fencer(&dataset, &x)?;
            require_fencer(&dataset, &y)?;
            let ctx = filters.to_context()?;
            let result = calculate::versus(&dataset.matches, &x, &y, &ctx, marker)?;
            emit(json, &result, |r| {
                println!("=== {} vs {} ===", r.fencer_x, r.fencer_y);
                println!("Bouts:    {}", r.bouts);
                println!(
                    "Wins:     {} - {} ({:.1}% / {:.1}%)",
                    r.wins_x, r.wins_y, r.pct_x, r.pct_y
                );
                println!("Pool:     {} - {}", r.pool.wins_x, r.pool.wins_y);
                println!("Bracket:  {} - {}", r.bracket.wins_x, r.bracket.wins_y);
                println!("Touches:  {} - {}", r.touches_x, r.touches_y);
                println!(
                    "Loser touches in bracket wins: {:.2} / {:.2}",
                    r.mean_loser_touches_when_x_wins, r.mean_loser_touches_when_y_wins
                );
            })?;
        }
        Commands::Trend { fencer, filters } => {
            require_fencer(&dataset, &fencer)?;
            let ctx = filters.to_context()?;
            let points = calculate::trend(&dataset.matches, &fencer, &ctx, marker);
            emit(json, &points, |points| {
                println!("{:<8} {:>12} {:>8} {:>12} {:>8}", "Season", "Pool bouts", "Pool %", "Bracket", "Brkt %");
                for p in points {
                    println!(
                        "{:<8} {:>12} {:>8} {:>12} {:>8}",
                        p.season,
                        p.pool_matches,
                        pct(p.pool_win_pct),
                        p.bracket_matches,
                        pct(p.bracket_win_pct)
                    );
                }
            })?;
        }
        Commands::Placements { fencer, filters } => {
            require_fencer(&dataset, &fencer)?;
            let ctx = filters.to_context()?;
            let summary = calculate::placement_summary(&dataset.rankings, &fencer, &ctx);
            let history = calculate::placement_history(&dataset.rankings, &fencer, &ctx);
            if json {
                emit(true, &serde_json::json!({ "summary": summary, "history": history }), |_| {})?;
            } else {
                println!("=== {} ===", summary.fencer);
                println!("Competitions: {}", summary.competitions);
                if let Some(best) = summary.best {
                    println!("Best:         {}", best);
                }
                println!("Mean place:   {:.1}", summary.mean_placement);
                println!(
                    "Titles:       {}  Podiums: {}  Top 8: {}  Top half: {}",
                    summary.titles, summary.podiums, summary.top_8, summary.top_half
                );
                println!("Percentile:   {:.1}", summary.mean_percentile);
                for e in &history {
                    println!(
                        "  {} {} {} ({}): {}/{}",
                        e.date.format("%Y-%m-%d"),
                        e.competition,
                        e.category,
                        e.competition_type,
                        e.placement,
                        e.field_size
                    );
                }
            }
        }
    }

    Ok(())
}

/// Print `value` as pretty JSON, or through `text` otherwise.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

fn require_fencer(dataset: &Dataset, name: &str) -> Result<()> {
    if !dataset.has_fencer(name) {
        bail!("Unknown fencer: {}", name);
    }
    Ok(())
}

fn score(touches: Option<u32>) -> String {
    touches.map_or_else(|| "?".to_string(), |t| t.to_string())
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}

fn print_options(options: &FilterOptions) {
    if let (Some(min), Some(max)) = (options.date_min, options.date_max) {
        println!("Dates:        {} to {}", min, max);
    }
    let seasons: Vec<String> = options.seasons.iter().map(|s| s.to_string()).collect();
    println!("Seasons:      {}", seasons.join(", "));
    let types: Vec<&str> = options.competition_types.iter().map(|t| t.as_str()).collect();
    println!("Types:        {}", types.join(", "));
    println!("Competitions: {}", options.competitions.join(", "));
    println!("Categories:   {}", options.categories.join(", "));
    println!("Phases:       {}", options.phases.join(", "));
    println!("Fencers:      {}", options.fencers.len());
}

fn print_aggregate(label: &str, s: &AggregateResult) {
    println!("\n{}", label);
    println!(
        "  Bouts: {}  W-L: {}-{}  Undecided: {}  Win %: {:.1}",
        s.matches, s.wins, s.losses, s.undecided, s.win_pct
    );
    println!(
        "  Scored: {:.2}  Conceded: {:.2}  Scored on loss: {:.2}  Conceded on win: {:.2}",
        s.mean_scored, s.mean_conceded, s.mean_scored_on_loss, s.mean_conceded_on_win
    );
    for metric in Metric::ALL {
        let rank = s.rank(metric);
        match rank.percentile() {
            Some(p) => println!(
                "  {:<22} #{} of {} (percentile {:.0})",
                metric.as_str(),
                rank.position,
                rank.field_size,
                p
            ),
            None => println!("  {:<22} not ranked", metric.as_str()),
        }
    }
}
