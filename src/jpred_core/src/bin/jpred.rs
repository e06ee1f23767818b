//! # JPred CLI
//!
//! Score a season's predictions and print or store the leaderboard.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use jpred_core::pipeline::{load_season, score_season};
use jpred_core::{
    ingest, slot_popularity, JsonStandingsDir, League, RunConfig, RunReport,
};

#[derive(Parser)]
#[command(name = "jpred")]
#[command(about = "Score J.League season predictions and rank participants")]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// TOML run configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Season year; sets default paths when no config file is given
    #[arg(short, long, global = true)]
    year: Option<u32>,

    /// Directory holding j1.json, j2.json and j3.json
    #[arg(long, global = true)]
    standings_dir: Option<PathBuf>,

    /// Normalized predictions CSV
    #[arg(long, global = true)]
    predictions: Option<PathBuf>,

    /// FormName,TableName alias CSV
    #[arg(long, global = true)]
    aliases: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score everyone and print the leaderboard
    Leaderboard {
        /// Store the leaderboard here (.json or .csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only print the top N rows
        #[arg(long)]
        top: Option<usize>,

        /// Also print this participant's slot-by-slot breakdown
        #[arg(short, long)]
        participant: Option<String>,
    },
    /// Show how often each team was picked per slot
    Popularity {
        #[arg(long)]
        league: League,
    },
    /// Validate configuration, standings and predictions without writing anything
    Check,
}

impl RunArgs {
    fn to_config(&self) -> Result<RunConfig> {
        let mut config = match (&self.config, self.year) {
            (Some(path), _) => RunConfig::from_file(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            (None, Some(year)) => RunConfig::for_year(year),
            (None, None) => RunConfig::default(),
        };

        if let Some(year) = self.year {
            config.year = Some(year);
        }
        if let Some(dir) = &self.standings_dir {
            config.standings_dir = dir.clone();
        }
        if let Some(path) = &self.predictions {
            config.predictions = path.clone();
        }
        if let Some(path) = &self.aliases {
            config.aliases = Some(path.clone());
        }
        Ok(config)
    }
}

fn print_leaderboard(report: &RunReport, top: Option<usize>) {
    println!(
        "{:>4}  {:<30} {:>6} {:>5} {:>4} {:>4} {:>4}",
        "Rank", "Name", "Points", "Exact", "J1", "J2", "J3"
    );
    println!("{}", "=".repeat(64));

    let rows = &report.leaderboard.rows;
    for row in rows.iter().take(top.unwrap_or(rows.len())) {
        print!(
            "{:>4}  {:<30} {:>6} {:>5}",
            row.rank, row.name, row.total_points, row.total_exact_matches
        );
        for league in League::ALL {
            print!(" {:>4}", row.league_points(league));
        }
        println!();
    }

    if report.missing_teams > 0 {
        println!("\n{} picks named teams not found in the tables", report.missing_teams);
    }
}

fn print_breakdown(report: &RunReport, name: &str) -> Result<()> {
    let row = report
        .leaderboard
        .row(name)
        .with_context(|| format!("No participant named '{}'", name))?;
    let scores = report
        .scores
        .iter()
        .find(|s| s.name == name)
        .with_context(|| format!("No scores for '{}'", name))?;

    println!("\n{} (rank {}, {} points)", row.name, row.rank, row.total_points);
    for (league, score) in &scores.leagues {
        println!("  {} ({} points)", league, score.points.points);
        for entry in &score.entries {
            let position = entry
                .actual_position
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "    {:<24} {:<28} {:>3} {:>2}",
                entry.label,
                entry.predicted_team.as_deref().unwrap_or("-"),
                position,
                entry.score
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = cli.run.to_config()?;

    match cli.command {
        Commands::Leaderboard {
            output,
            top,
            participant,
        } => {
            if output.is_some() {
                config.output = output;
            }
            let report = jpred_core::run(&config).context("Scoring run failed")?;
            print_leaderboard(&report, top);
            if let Some(name) = participant {
                print_breakdown(&report, &name)?;
            }
        }

        Commands::Popularity { league } => {
            let slots = config.slot_definitions()?;
            let aliases = config.team_aliases()?;
            let predictions = ingest::read_predictions_csv(&config.predictions, &slots, &aliases)
                .with_context(|| format!("Failed to read {}", config.predictions.display()))?;

            for slot in slot_popularity(&predictions, slots.get(league)) {
                println!("{} {} ({} picks)", league, slot.label, slot.total_picks());
                for (team, count) in &slot.picks {
                    println!("  {:<30} {:>4}", team, count);
                }
            }
        }

        Commands::Check => {
            let source = JsonStandingsDir::new(&config.standings_dir);
            let season = load_season(&config, &source).context("Configuration check failed")?;
            for league in League::ALL {
                let table = season.standings(league);
                let teams = table.teams_in_order();
                println!(
                    "{}: {} teams, {} slots, champions {}, last {} ({})",
                    league,
                    table.size(),
                    season.slots().get(league).len(),
                    teams.first().copied().unwrap_or("-"),
                    teams.last().copied().unwrap_or("-"),
                    source.path_for(league).display()
                );
            }

            let aliases = config.team_aliases()?;
            let predictions =
                ingest::read_predictions_csv(&config.predictions, season.slots(), &aliases)?;
            let report = score_season(&season, &predictions);
            println!(
                "{} participants, {} unknown team picks, {} blank slots",
                report.leaderboard.len(),
                report.missing_teams,
                report.missing_predictions
            );
        }
    }

    Ok(())
}
