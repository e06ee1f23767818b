//! One full scoring run: load, validate, score, rank, then commit.
//!
//! Every structural check happens before scoring starts and the leaderboard
//! is complete in memory before the sink is touched, so a failed run leaves
//! the previous stored table as it was.

use serde::Serialize;

use crate::config::RunConfig;
use crate::error::Result;
use crate::ingest::read_predictions_csv;
use crate::leaderboard::Leaderboard;
use crate::prediction::PredictionSet;
use crate::scorer::{Anomaly, ParticipantScores, Season};
use crate::sink::{sink_for_path, LeaderboardSink};
use crate::standings::{JsonStandingsDir, StandingsSource};

/// Outcome of a run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub leaderboard: Leaderboard,
    pub scores: Vec<ParticipantScores>,
    pub missing_teams: usize,
    pub missing_predictions: usize,
}

impl RunReport {
    fn new(scores: Vec<ParticipantScores>) -> Self {
        let leaderboard = Leaderboard::from_scores(&scores);

        let mut missing_teams = 0;
        let mut missing_predictions = 0;
        for anomaly in scores.iter().flat_map(|s| s.anomalies()) {
            match anomaly {
                Anomaly::MissingTeam { .. } => missing_teams += 1,
                Anomaly::MissingPrediction { .. } => missing_predictions += 1,
            }
        }

        RunReport {
            leaderboard,
            scores,
            missing_teams,
            missing_predictions,
        }
    }
}

/// Load the season's tables and slot cards and check them against each other.
pub fn load_season(config: &RunConfig, source: &dyn StandingsSource) -> Result<Season> {
    config.validate()?;
    let slots = config.slot_definitions()?;
    let standings = source.load_all()?;
    Season::new(standings, slots)
}

/// Score `predictions` and rank everyone. Nothing is written.
pub fn score_season(season: &Season, predictions: &PredictionSet) -> RunReport {
    let scores = season.score_all(predictions);
    let report = RunReport::new(scores);

    if report.missing_teams > 0 {
        tracing::warn!(
            "{} picks named teams missing from the tables and scored 0",
            report.missing_teams
        );
    }
    tracing::info!(
        "Scored {} participants ({} blank slots)",
        report.leaderboard.len(),
        report.missing_predictions
    );
    report
}

/// Run end to end from a config, committing to `sink` only on success.
pub fn run_with(
    config: &RunConfig,
    source: &dyn StandingsSource,
    sink: Option<&mut dyn LeaderboardSink>,
) -> Result<RunReport> {
    let season = load_season(config, source)?;

    let aliases = config.team_aliases()?;
    let predictions = read_predictions_csv(&config.predictions, season.slots(), &aliases)?;

    let report = score_season(&season, &predictions);

    if let Some(sink) = sink {
        sink.replace(&report.leaderboard.rows)?;
    }
    Ok(report)
}

/// Run with standings from `config.standings_dir` and the sink chosen by
/// `config.output`.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    if let Some(year) = config.year {
        tracing::info!("Scoring JPred {}", year);
    }

    let source = JsonStandingsDir::new(&config.standings_dir);
    match &config.output {
        Some(path) => {
            let mut sink = sink_for_path(path)?;
            run_with(config, &source, Some(sink.as_mut()))
        }
        None => run_with(config, &source, None),
    }
}
