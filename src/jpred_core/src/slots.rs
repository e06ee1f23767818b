//! Per-league prediction slot configuration.
//!
//! A [`SlotDefinition`] fixes, for one league, the ordered card of slots a
//! participant fills in and the rule family those slots are scored with.
//! Band sizes live in the rule; slot order is taken from here and never
//! derived at scoring time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::{BOTTOM_SLOT_LABELS, TOP_SLOT_COLUMNS, TOP_SLOT_LABELS};
use crate::error::{JpredError, Result};
use crate::league::League;
use crate::rules::{ScoringRule, ScoringRuleKind};

/// One prediction target on a league's card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// 1-based position on the card
    pub index: u32,

    /// Human-facing name, e.g. "Last Place"
    pub label: String,

    /// Header of the predictions CSV column holding this slot's pick
    pub column: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotDefinition {
    pub league: League,
    pub rule: ScoringRuleKind,
    pub slots: Vec<Slot>,
}

impl SlotDefinition {
    /// Build the standard card for a league: ordinal top slots followed by
    /// the three bottom slots, with `"<League> <Header>"` column headers as
    /// the entry form writes them.
    pub fn standard(league: League) -> Self {
        let rule = ScoringRuleKind::for_league(league);
        let top = rule.rule().top_band as usize;

        let top_slots = TOP_SLOT_LABELS[..top]
            .iter()
            .zip(&TOP_SLOT_COLUMNS[..top]);
        let bottom_slots = BOTTOM_SLOT_LABELS.iter().zip(BOTTOM_SLOT_LABELS.iter());

        let slots = top_slots
            .chain(bottom_slots)
            .enumerate()
            .map(|(i, (label, header))| Slot {
                index: i as u32 + 1,
                label: label.to_string(),
                column: format!("{} {}", league, header),
            })
            .collect();

        SlotDefinition {
            league,
            rule,
            slots,
        }
    }

    pub fn scoring_rule(&self) -> ScoringRule {
        self.rule.rule()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: u32) -> Option<&Slot> {
        self.slots.iter().find(|s| s.index == index)
    }

    /// Check that the card uses its league's rule and that slot indices run
    /// densely from 1 to the rule's K.
    pub fn validate(&self) -> Result<()> {
        let league_rule = ScoringRuleKind::for_league(self.league);
        if self.rule != league_rule {
            return Err(JpredError::config(format!(
                "{} must be scored with the {:?} rule, not {:?}",
                self.league, league_rule, self.rule
            )));
        }

        let expected = self.scoring_rule().slot_count() as usize;
        if self.slots.len() != expected {
            return Err(JpredError::config(format!(
                "{} defines {} slots but its {:?} rule needs {}",
                self.league,
                self.slots.len(),
                self.rule,
                expected
            )));
        }

        for (i, slot) in self.slots.iter().enumerate() {
            if slot.index as usize != i + 1 {
                return Err(JpredError::config(format!(
                    "{} slot '{}' has index {}, expected {}",
                    self.league,
                    slot.label,
                    slot.index,
                    i + 1
                )));
            }
        }

        Ok(())
    }
}

/// The slot cards for all three leagues.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotDefinitions {
    by_league: BTreeMap<League, SlotDefinition>,
}

impl SlotDefinitions {
    /// The competition's standard cards: 6 slots for J1, 9 for J2 and J3.
    pub fn standard() -> Self {
        let by_league = League::ALL
            .iter()
            .map(|&league| (league, SlotDefinition::standard(league)))
            .collect();
        SlotDefinitions { by_league }
    }

    /// Assemble and validate a set of definitions.
    ///
    /// Every league must be defined exactly once and each definition must
    /// pass [`SlotDefinition::validate`].
    pub fn from_definitions(defs: Vec<SlotDefinition>) -> Result<Self> {
        let mut by_league = BTreeMap::new();
        for def in defs {
            def.validate()?;
            let league = def.league;
            if by_league.insert(league, def).is_some() {
                return Err(JpredError::config(format!(
                    "{} slot definition given more than once",
                    league
                )));
            }
        }

        for league in League::ALL {
            if !by_league.contains_key(&league) {
                return Err(JpredError::config(format!(
                    "no slot definition for {}",
                    league
                )));
            }
        }

        Ok(SlotDefinitions { by_league })
    }

    pub fn get(&self, league: League) -> &SlotDefinition {
        // from_definitions guarantees all three leagues are present
        &self.by_league[&league]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotDefinition> {
        self.by_league.values()
    }
}

impl Default for SlotDefinitions {
    fn default() -> Self {
        Self::standard()
    }
}
