use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::AddAssign;

use crate::constants::EXACT_SCORE;
use crate::error::{JpredError, Result};
use crate::league::League;
use crate::prediction::PredictionSet;
use crate::slots::{SlotDefinition, SlotDefinitions};
use crate::standings::StandingsTable;

/// The scored outcome of one slot on a participant's card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub slot_index: u32,
    pub label: String,

    /// `None` when the participant left the slot blank
    pub predicted_team: Option<String>,

    /// `None` when there was no pick or the team is not in the table
    pub actual_position: Option<u32>,

    pub score: u8,
}

impl ScoreEntry {
    pub fn is_exact(&self) -> bool {
        self.score == EXACT_SCORE
    }

    /// The data-quality problem behind a zero score, if any.
    pub fn anomaly(&self, league: League) -> Option<Anomaly> {
        match (&self.predicted_team, self.actual_position) {
            (None, _) => Some(Anomaly::MissingPrediction {
                league,
                slot_index: self.slot_index,
            }),
            (Some(team), None) => Some(Anomaly::MissingTeam {
                league,
                slot_index: self.slot_index,
                team: team.clone(),
            }),
            _ => None,
        }
    }
}

/// Recoverable per-slot problems. Each one scored zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// The picked team is not in that season's table
    MissingTeam {
        league: League,
        slot_index: u32,
        team: String,
    },
    /// The slot was left blank
    MissingPrediction { league: League, slot_index: u32 },
}

/// Points and exact-match count for one participant in one league.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LeaguePoints {
    pub points: u32,
    pub exact_matches: u32,
}

impl LeaguePoints {
    pub fn new(points: u32, exact_matches: u32) -> Self {
        LeaguePoints {
            points,
            exact_matches,
        }
    }

    pub fn from_entries(entries: &[ScoreEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, entry| {
            acc.points += entry.score as u32;
            if entry.is_exact() {
                acc.exact_matches += 1;
            }
            acc
        })
    }
}

impl AddAssign for LeaguePoints {
    fn add_assign(&mut self, other: Self) {
        self.points += other.points;
        self.exact_matches += other.exact_matches;
    }
}

/// A participant's scored card for one league.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeagueScore {
    pub entries: Vec<ScoreEntry>,
    pub points: LeaguePoints,
}

/// Everything computed for one participant across the three leagues.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParticipantScores {
    pub name: String,
    pub leagues: BTreeMap<League, LeagueScore>,
}

impl ParticipantScores {
    pub fn points(&self, league: League) -> LeaguePoints {
        self.leagues
            .get(&league)
            .map(|l| l.points)
            .unwrap_or_default()
    }

    pub fn total(&self) -> LeaguePoints {
        let mut total = LeaguePoints::default();
        for league in self.leagues.values() {
            total += league.points;
        }
        total
    }

    pub fn league_points(&self) -> BTreeMap<League, LeaguePoints> {
        self.leagues
            .iter()
            .map(|(&league, score)| (league, score.points))
            .collect()
    }

    pub fn anomalies(&self) -> Vec<Anomaly> {
        self.leagues
            .iter()
            .flat_map(|(&league, score)| {
                score
                    .entries
                    .iter()
                    .filter_map(move |e| e.anomaly(league))
            })
            .collect()
    }
}

/// Score one participant's card for one league.
///
/// Emits one entry per slot in `slot_def`, in slot order. Blank slots and
/// teams missing from `standings` score zero but still produce an entry.
///
/// # Returns
/// The scored entries, or an empty Vec when `participant` is not in
/// `predictions` at all.
pub fn score_league(
    participant: &str,
    league: League,
    predictions: &PredictionSet,
    standings: &StandingsTable,
    slot_def: &SlotDefinition,
) -> Vec<ScoreEntry> {
    if !predictions.contains(participant) {
        tracing::debug!("No predictions for participant '{}'", participant);
        return Vec::new();
    }

    let rule = slot_def.scoring_rule();
    let league_size = standings.size();

    slot_def
        .slots
        .iter()
        .map(|slot| {
            let predicted_team = predictions.pick(participant, league, slot.index);

            let actual_position = predicted_team.and_then(|team| {
                let position = standings.position(team);
                if position.is_none() {
                    tracing::warn!(
                        "{}: {} '{}' pick '{}' is not in the {} table",
                        participant,
                        league,
                        slot.label,
                        team,
                        league
                    );
                }
                position
            });

            let score = actual_position
                .map(|pos| rule.score(slot.index, pos, league_size))
                .unwrap_or(0);

            ScoreEntry {
                slot_index: slot.index,
                label: slot.label.clone(),
                predicted_team: predicted_team.map(str::to_string),
                actual_position,
                score,
            }
        })
        .collect()
}

/// Final tables and slot cards for one season, checked against each other.
#[derive(Clone, Debug)]
pub struct Season {
    standings: BTreeMap<League, StandingsTable>,
    slots: SlotDefinitions,
}

impl Season {
    /// Pair tables with slot cards.
    ///
    /// Fails if a league has no table, a table is filed under the wrong
    /// league, or a league has fewer teams than slots on its card.
    pub fn new(
        standings: BTreeMap<League, StandingsTable>,
        slots: SlotDefinitions,
    ) -> Result<Self> {
        for league in League::ALL {
            let table = standings
                .get(&league)
                .ok_or_else(|| JpredError::standings(league, "no table loaded"))?;

            if table.league() != league {
                return Err(JpredError::standings(
                    league,
                    format!("table was built for {}", table.league()),
                ));
            }

            let needed = slots.get(league).len() as u32;
            if table.size() < needed {
                return Err(JpredError::standings(
                    league,
                    format!("{} teams cannot fill {} slots", table.size(), needed),
                ));
            }
        }

        Ok(Season { standings, slots })
    }

    pub fn standings(&self, league: League) -> &StandingsTable {
        // Season::new checked every league is present
        &self.standings[&league]
    }

    pub fn slots(&self) -> &SlotDefinitions {
        &self.slots
    }

    pub fn score_league(
        &self,
        participant: &str,
        league: League,
        predictions: &PredictionSet,
    ) -> Vec<ScoreEntry> {
        score_league(
            participant,
            league,
            predictions,
            self.standings(league),
            self.slots.get(league),
        )
    }

    /// Score all three leagues for one participant.
    ///
    /// Returns `None` for a participant with no record in `predictions`.
    pub fn score_participant(
        &self,
        participant: &str,
        predictions: &PredictionSet,
    ) -> Option<ParticipantScores> {
        if !predictions.contains(participant) {
            tracing::debug!("Skipping unknown participant '{}'", participant);
            return None;
        }

        let leagues = League::ALL
            .iter()
            .map(|&league| {
                let entries = self.score_league(participant, league, predictions);
                let points = LeaguePoints::from_entries(&entries);
                (league, LeagueScore { entries, points })
            })
            .collect();

        Some(ParticipantScores {
            name: participant.to_string(),
            leagues,
        })
    }

    /// Score every participant.
    ///
    /// Participants are independent, so they are scored in parallel; the
    /// result keeps participant encounter order.
    pub fn score_all(&self, predictions: &PredictionSet) -> Vec<ParticipantScores> {
        predictions
            .participants()
            .par_iter()
            .filter_map(|name| self.score_participant(name, predictions))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::Prediction;

    fn table(league: League, n: u32) -> StandingsTable {
        let teams = (1..=n).map(|i| (format!("{}-{}", league.key(), i), i));
        StandingsTable::from_entries(league, teams).unwrap()
    }

    fn season() -> Season {
        let standings = League::ALL.iter().map(|&l| (l, table(l, 20))).collect();
        Season::new(standings, SlotDefinitions::standard()).unwrap()
    }

    /// Card that names the exact target team for every slot
    fn perfect_card(name: &str, season: &Season) -> Vec<Prediction> {
        let mut picks = Vec::new();
        for def in season.slots().iter() {
            let rule = def.scoring_rule();
            let size = season.standings(def.league).size();
            for slot in &def.slots {
                let target = rule.target_position(slot.index, size).unwrap();
                picks.push(Prediction::new(
                    name,
                    def.league,
                    slot.index,
                    format!("{}-{}", def.league.key(), target),
                ));
            }
        }
        picks
    }

    #[test]
    fn test_perfect_card_scores_maximum() {
        let season = season();
        let predictions = PredictionSet::from_predictions(perfect_card("Ace", &season));
        let scores = season.score_participant("Ace", &predictions).unwrap();

        assert_eq!(scores.points(League::J1), LeaguePoints::new(12, 6));
        assert_eq!(scores.points(League::J2), LeaguePoints::new(18, 9));
        assert_eq!(scores.total(), LeaguePoints::new(48, 24));
        assert!(scores.anomalies().is_empty());
    }

    #[test]
    fn test_shuffled_top_band_scores_one_each() {
        let season = season();
        let predictions = PredictionSet::from_predictions(vec![
            Prediction::new("Mix", League::J1, 1, "j1-3"),
            Prediction::new("Mix", League::J1, 2, "j1-1"),
            Prediction::new("Mix", League::J1, 3, "j1-2"),
            Prediction::new("Mix", League::J1, 4, "j1-10"),
        ]);
        let entries = season.score_league("Mix", League::J1, &predictions);
        let scores: Vec<u8> = entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![1, 1, 1, 0, 0, 0]);
        assert_eq!(LeaguePoints::from_entries(&entries), LeaguePoints::new(3, 0));
    }

    #[test]
    fn test_missing_team_scores_zero() {
        let season = season();
        let predictions = PredictionSet::from_predictions(vec![
            Prediction::new("Typo", League::J2, 1, "Not A Club"),
            Prediction::new("Typo", League::J2, 2, "j2-2"),
        ]);
        let entries = season.score_league("Typo", League::J2, &predictions);

        assert_eq!(entries.len(), 9);
        assert_eq!(entries[0].score, 0);
        assert_eq!(entries[0].actual_position, None);
        assert_eq!(entries[0].predicted_team.as_deref(), Some("Not A Club"));
        assert_eq!(entries[1].score, 2);
        assert_eq!(
            entries[0].anomaly(League::J2),
            Some(Anomaly::MissingTeam {
                league: League::J2,
                slot_index: 1,
                team: "Not A Club".to_string()
            })
        );
    }

    #[test]
    fn test_blank_slots_still_emit_entries() {
        let season = season();
        let predictions =
            PredictionSet::from_predictions(vec![Prediction::new("Lazy", League::J1, 6, "j1-20")]);
        let scores = season.score_participant("Lazy", &predictions).unwrap();

        for league in League::ALL {
            let expected = season.slots().get(league).len();
            assert_eq!(scores.leagues[&league].entries.len(), expected);
        }
        assert_eq!(scores.total(), LeaguePoints::new(2, 1));
        // 5 blank J1 slots + 9 + 9
        assert_eq!(scores.anomalies().len(), 23);
    }

    #[test]
    fn test_unknown_participant_is_empty() {
        let season = season();
        let predictions = PredictionSet::from_predictions(perfect_card("Ace", &season));
        assert!(season.score_league("Ghost", League::J1, &predictions).is_empty());
        assert!(season.score_participant("Ghost", &predictions).is_none());
    }

    #[test]
    fn test_score_all_keeps_order() {
        let season = season();
        let mut picks = Vec::new();
        for name in ["Cat", "Ant", "Bee", "Dog"] {
            picks.extend(perfect_card(name, &season));
        }
        let predictions = PredictionSet::from_predictions(picks);
        let names: Vec<String> = season
            .score_all(&predictions)
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Cat", "Ant", "Bee", "Dog"]);
    }

    #[test]
    fn test_season_rejects_missing_league() {
        let mut standings: BTreeMap<League, StandingsTable> =
            League::ALL.iter().map(|&l| (l, table(l, 20))).collect();
        standings.remove(&League::J3);
        assert!(Season::new(standings, SlotDefinitions::standard()).is_err());
    }

    #[test]
    fn test_season_rejects_tiny_league() {
        let mut standings: BTreeMap<League, StandingsTable> =
            League::ALL.iter().map(|&l| (l, table(l, 20))).collect();
        standings.insert(League::J2, table(League::J2, 8));
        let err = Season::new(standings, SlotDefinitions::standard()).unwrap_err();
        assert!(err.to_string().contains("cannot fill 9 slots"));
    }

    #[test]
    fn test_season_rejects_misfiled_table() {
        let mut standings: BTreeMap<League, StandingsTable> =
            League::ALL.iter().map(|&l| (l, table(l, 20))).collect();
        standings.insert(League::J1, table(League::J2, 20));
        assert!(Season::new(standings, SlotDefinitions::standard()).is_err());
    }
}
