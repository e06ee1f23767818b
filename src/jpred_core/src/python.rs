//! Python bindings for the page and image rendering scripts.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::{BTreeMap, HashMap};

use crate::constants::{BOTTOM_BAND, EXACT_SCORE};
use crate::error::JpredError;
use crate::leaderboard::Leaderboard;
use crate::league::League;
use crate::prediction::{Prediction, PredictionSet};
use crate::rules::ScoringRuleKind;
use crate::scorer::Season;
use crate::slots::SlotDefinitions;
use crate::standings::StandingsTable;

/// `(participant, league, slot_index, team)`
type PredictionTuple = (String, String, u32, String);

/// `(slot_index, label, predicted_team, actual_position, score)`
type EntryTuple = (u32, String, Option<String>, Option<u32>, u8);

/// `(rank, name, points, exact_matches, j1, j2, j3)`
type RowTuple = (u32, String, u32, u32, u32, u32, u32);

fn to_py_err(e: JpredError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn season_from(standings: HashMap<String, HashMap<String, u32>>) -> PyResult<Season> {
    let mut tables = BTreeMap::new();
    for (key, teams) in standings {
        let league: League = key.parse().map_err(to_py_err)?;
        let table = StandingsTable::from_entries(league, teams).map_err(to_py_err)?;
        tables.insert(league, table);
    }
    Season::new(tables, SlotDefinitions::standard()).map_err(to_py_err)
}

fn prediction_set(predictions: Vec<PredictionTuple>) -> PyResult<PredictionSet> {
    let mut set = PredictionSet::new();
    for (name, league, slot_index, team) in predictions {
        let league: League = league.parse().map_err(to_py_err)?;
        set.insert(Prediction::new(name, league, slot_index, team));
    }
    Ok(set)
}

/// Score one pick.
#[pyfunction]
fn score_slot(
    league: &str,
    slot_index: u32,
    actual_position: u32,
    league_size: u32,
) -> PyResult<u8> {
    let league: League = league.parse().map_err(to_py_err)?;
    Ok(ScoringRuleKind::for_league(league)
        .rule()
        .score(slot_index, actual_position, league_size))
}

/// Score one participant's cards.
///
/// Returns a map of league key to scored entries, or None for an unknown
/// participant.
#[pyfunction]
fn score_participant(
    name: &str,
    predictions: Vec<PredictionTuple>,
    standings: HashMap<String, HashMap<String, u32>>,
) -> PyResult<Option<HashMap<String, Vec<EntryTuple>>>> {
    let season = season_from(standings)?;
    let predictions = prediction_set(predictions)?;

    Ok(season.score_participant(name, &predictions).map(|scores| {
        scores
            .leagues
            .into_iter()
            .map(|(league, score)| {
                let entries = score
                    .entries
                    .into_iter()
                    .map(|e| (e.slot_index, e.label, e.predicted_team, e.actual_position, e.score))
                    .collect();
                (league.key().to_string(), entries)
            })
            .collect()
    }))
}

/// Score everyone and return the ranked table.
#[pyfunction]
fn build_leaderboard(
    predictions: Vec<PredictionTuple>,
    standings: HashMap<String, HashMap<String, u32>>,
) -> PyResult<Vec<RowTuple>> {
    let season = season_from(standings)?;
    let predictions = prediction_set(predictions)?;
    let leaderboard = Leaderboard::from_scores(&season.score_all(&predictions));

    Ok(leaderboard
        .rows
        .into_iter()
        .map(|r| {
            (
                r.rank,
                r.name,
                r.total_points,
                r.total_exact_matches,
                r.j1_points,
                r.j2_points,
                r.j3_points,
            )
        })
        .collect())
}

/// Python module definition
#[pymodule]
fn jpred_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(score_slot, m)?)?;
    m.add_function(wrap_pyfunction!(score_participant, m)?)?;
    m.add_function(wrap_pyfunction!(build_leaderboard, m)?)?;

    m.add("EXACT_SCORE", EXACT_SCORE)?;
    m.add("BOTTOM_BAND", BOTTOM_BAND)?;

    Ok(())
}
