//! How often each team was picked for each slot.

use serde::Serialize;
use std::collections::HashMap;

use crate::prediction::PredictionSet;
use crate::slots::SlotDefinition;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotPopularity {
    pub slot_index: u32,
    pub label: String,
    /// `(team, count)`, most picked first, ties by team name
    pub picks: Vec<(String, usize)>,
}

impl SlotPopularity {
    pub fn total_picks(&self) -> usize {
        self.picks.iter().map(|(_, n)| n).sum()
    }
}

/// Count picks per team for every slot on a league's card.
///
/// Blank slots are not counted.
pub fn slot_popularity(
    predictions: &PredictionSet,
    slot_def: &SlotDefinition,
) -> Vec<SlotPopularity> {
    slot_def
        .slots
        .iter()
        .map(|slot| {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for team in predictions.picks_for_slot(slot_def.league, slot.index) {
                *counts.entry(team).or_insert(0) += 1;
            }

            let mut picks: Vec<(String, usize)> = counts
                .into_iter()
                .map(|(team, n)| (team.to_string(), n))
                .collect();
            picks.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

            SlotPopularity {
                slot_index: slot.index,
                label: slot.label.clone(),
                picks,
            }
        })
        .collect()
}
