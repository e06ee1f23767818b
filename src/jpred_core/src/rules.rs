use serde::{Deserialize, Serialize};

use crate::constants::{BAND_SCORE, BOTTOM_BAND, EXACT_SCORE, J1_TOP_BAND, LOWER_TIER_TOP_BAND};
use crate::league::League;

/// Which scoring rule family a league's slots are judged by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRuleKind {
    /// Top league: 3 top slots, 3 bottom slots
    TierA,
    /// Lower leagues: 6 top slots, 3 bottom slots
    TierB,
}

impl ScoringRuleKind {
    /// Rule kind that a league is scored with
    pub fn for_league(league: League) -> Self {
        match league {
            League::J1 => ScoringRuleKind::TierA,
            League::J2 | League::J3 => ScoringRuleKind::TierB,
        }
    }

    pub fn rule(self) -> ScoringRule {
        match self {
            ScoringRuleKind::TierA => ScoringRule::new(J1_TOP_BAND, BOTTOM_BAND),
            ScoringRuleKind::TierB => ScoringRule::new(LOWER_TIER_TOP_BAND, BOTTOM_BAND),
        }
    }
}

/// Band-and-exactness scoring for one league.
///
/// Slots `1..=top_band` predict the top of the table; the remaining
/// `bottom_band` slots predict the bottom, with the last slot meaning last
/// place. A pick earns one point for landing in the right band and one more
/// for the exact position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoringRule {
    pub top_band: u32,
    pub bottom_band: u32,
}

impl ScoringRule {
    pub const fn new(top_band: u32, bottom_band: u32) -> Self {
        ScoringRule {
            top_band,
            bottom_band,
        }
    }

    /// Number of slots this rule covers (K)
    pub fn slot_count(&self) -> u32 {
        self.top_band + self.bottom_band
    }

    /// Whether a slot index falls in the top half of the card
    pub fn is_top_slot(&self, slot_index: u32) -> bool {
        (1..=self.top_band).contains(&slot_index)
    }

    /// Table position a slot asks for in a league of `league_size` teams.
    ///
    /// Bottom slots count back from the foot of the table:
    /// `league_size - (K - slot_index)`. Returns `None` for slot indices
    /// outside `1..=K` or when the league is too small to hold the slot.
    pub fn target_position(&self, slot_index: u32, league_size: u32) -> Option<u32> {
        let k = self.slot_count();
        if slot_index == 0 || slot_index > k {
            return None;
        }
        if self.is_top_slot(slot_index) {
            Some(slot_index)
        } else {
            league_size
                .checked_sub(k - slot_index)
                .filter(|&p| p >= 1)
        }
    }

    /// Whether `position` lies in the band a slot belongs to.
    fn in_band(&self, slot_index: u32, position: u32, league_size: u32) -> bool {
        if position == 0 || position > league_size {
            return false;
        }
        if self.is_top_slot(slot_index) {
            position <= self.top_band
        } else {
            position > league_size.saturating_sub(self.bottom_band)
        }
    }

    /// Score a single pick.
    ///
    /// # Arguments
    /// * `slot_index` - 1-based slot the team was picked for
    /// * `actual_position` - Final table position of the picked team
    /// * `league_size` - Number of teams in the league that season
    ///
    /// # Returns
    /// 0, 1 (right band) or 2 (exact slot). Out-of-range input scores 0.
    pub fn score(&self, slot_index: u32, actual_position: u32, league_size: u32) -> u8 {
        let Some(target) = self.target_position(slot_index, league_size) else {
            return 0;
        };

        let mut score = 0;
        if self.in_band(slot_index, actual_position, league_size) {
            score += BAND_SCORE;
            if actual_position == target {
                score += EXACT_SCORE - BAND_SCORE;
            }
        }
        score
    }
}
