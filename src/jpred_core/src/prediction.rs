use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::league::League;

/// A participant's pick for one slot of one league.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub participant: String,
    pub league: League,
    pub slot_index: u32,
    pub predicted_team: String,
}

impl Prediction {
    pub fn new(
        participant: impl Into<String>,
        league: League,
        slot_index: u32,
        predicted_team: impl Into<String>,
    ) -> Self {
        Prediction {
            participant: participant.into(),
            league,
            slot_index,
            predicted_team: predicted_team.into(),
        }
    }
}

/// All predictions for a season, indexed by participant.
///
/// Participants keep the order they were first seen in; that order is the
/// final tie-break on the leaderboard.
#[derive(Clone, Debug, Default)]
pub struct PredictionSet {
    order: Vec<String>,
    picks: HashMap<String, BTreeMap<(League, u32), String>>,
}

impl PredictionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_predictions<I: IntoIterator<Item = Prediction>>(predictions: I) -> Self {
        let mut set = Self::new();
        for prediction in predictions {
            set.insert(prediction);
        }
        set
    }

    /// Register a participant even if they submitted no picks.
    pub fn add_participant(&mut self, name: &str) {
        if !self.picks.contains_key(name) {
            self.order.push(name.to_string());
            self.picks.insert(name.to_string(), BTreeMap::new());
        }
    }

    /// Drop a participant's picks but keep their place in the order.
    pub fn clear_picks(&mut self, name: &str) {
        if let Some(slots) = self.picks.get_mut(name) {
            slots.clear();
        }
    }

    /// Add a pick, returning the team it replaced if the slot was already
    /// filled.
    pub fn insert(&mut self, prediction: Prediction) -> Option<String> {
        self.add_participant(&prediction.participant);
        self.picks
            .get_mut(&prediction.participant)
            .and_then(|slots| {
                slots.insert(
                    (prediction.league, prediction.slot_index),
                    prediction.predicted_team,
                )
            })
    }

    pub fn contains(&self, participant: &str) -> bool {
        self.picks.contains_key(participant)
    }

    /// Participants in encounter order
    pub fn participants(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The team a participant picked for a slot
    pub fn pick(&self, participant: &str, league: League, slot_index: u32) -> Option<&str> {
        self.picks
            .get(participant)?
            .get(&(league, slot_index))
            .map(String::as_str)
    }

    /// Every participant's pick for one slot, in participant order
    pub fn picks_for_slot(
        &self,
        league: League,
        slot_index: u32,
    ) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .filter_map(move |name| self.pick(name, league, slot_index))
    }
}
