//! JPred Core - scoring engine for J.League season predictions.
//!
//! Participants pick teams for the top and bottom places of the J1, J2 and J3
//! tables. This library scores those picks against the final standings and
//! ranks participants, with optional Python bindings via PyO3 (`python`
//! feature) for the page-rendering scripts.

pub mod aliases;
pub mod config;
pub mod constants;
pub mod error;
pub mod ingest;
pub mod leaderboard;
pub mod league;
pub mod pipeline;
pub mod popularity;
pub mod prediction;
pub mod rules;
pub mod scorer;
pub mod sink;
pub mod slots;
pub mod standings;

#[cfg(feature = "python")]
mod python;

pub use aliases::TeamAliases;
pub use config::RunConfig;
pub use constants::{BOTTOM_BAND, EXACT_SCORE, J1_TOP_BAND, LOWER_TIER_TOP_BAND};
pub use error::{JpredError, Result};
pub use leaderboard::{build, Leaderboard, LeaderboardRow};
pub use league::League;
pub use pipeline::{run, run_with, RunReport};
pub use popularity::{slot_popularity, SlotPopularity};
pub use prediction::{Prediction, PredictionSet};
pub use rules::{ScoringRule, ScoringRuleKind};
pub use scorer::{score_league, Anomaly, LeaguePoints, ParticipantScores, ScoreEntry, Season};
pub use sink::{CsvFileSink, JsonFileSink, LeaderboardSink};
pub use slots::{Slot, SlotDefinition, SlotDefinitions};
pub use standings::{JsonStandingsDir, StandingsSource, StandingsTable};
