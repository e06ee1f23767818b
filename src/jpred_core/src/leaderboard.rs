use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::league::League;
use crate::scorer::{LeaguePoints, ParticipantScores};

/// One line of the final table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub name: String,
    pub total_points: u32,
    pub total_exact_matches: u32,
    pub j1_points: u32,
    pub j2_points: u32,
    pub j3_points: u32,
}

impl LeaderboardRow {
    fn unranked(name: &str, leagues: Option<&BTreeMap<League, LeaguePoints>>) -> Self {
        let points = |league: League| -> LeaguePoints {
            leagues
                .and_then(|l| l.get(&league))
                .copied()
                .unwrap_or_default()
        };

        let mut total = LeaguePoints::default();
        for league in League::ALL {
            total += points(league);
        }

        LeaderboardRow {
            rank: 0,
            name: name.to_string(),
            total_points: total.points,
            total_exact_matches: total.exact_matches,
            j1_points: points(League::J1).points,
            j2_points: points(League::J2).points,
            j3_points: points(League::J3).points,
        }
    }

    /// Ordering key: points, exact matches, then J1, J2, J3 points
    pub fn sort_key(&self) -> (u32, u32, u32, u32, u32) {
        (
            self.total_points,
            self.total_exact_matches,
            self.j1_points,
            self.j2_points,
            self.j3_points,
        )
    }

    pub fn league_points(&self, league: League) -> u32 {
        match league {
            League::J1 => self.j1_points,
            League::J2 => self.j2_points,
            League::J3 => self.j3_points,
        }
    }
}

/// Rank participants.
///
/// Rows are ordered by [`LeaderboardRow::sort_key`], highest first. The sort
/// is stable, so participants equal on all five keys stay in the order given
/// by `participants`; every row still gets its own rank, 1..=N.
///
/// # Arguments
/// * `participants` - Names in encounter order
/// * `scores` - Per-league points by participant; absent entries count as 0
pub fn build(
    participants: &[String],
    scores: &HashMap<String, BTreeMap<League, LeaguePoints>>,
) -> Vec<LeaderboardRow> {
    let mut rows: Vec<LeaderboardRow> = participants
        .iter()
        .map(|name| LeaderboardRow::unranked(name, scores.get(name)))
        .collect();

    rows.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));

    for (rank, row) in (1u32..).zip(rows.iter_mut()) {
        row.rank = rank;
    }

    rows
}

/// A ranked table built in one pass from scorer output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Leaderboard {
    pub rows: Vec<LeaderboardRow>,
}

impl Leaderboard {
    pub fn from_scores(scores: &[ParticipantScores]) -> Self {
        let participants: Vec<String> = scores.iter().map(|s| s.name.clone()).collect();
        let by_name: HashMap<String, BTreeMap<League, LeaguePoints>> = scores
            .iter()
            .map(|s| (s.name.clone(), s.league_points()))
            .collect();

        Leaderboard {
            rows: build(&participants, &by_name),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, name: &str) -> Option<&LeaderboardRow> {
        self.rows.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(j1: (u32, u32), j2: (u32, u32), j3: (u32, u32)) -> BTreeMap<League, LeaguePoints> {
        [
            (League::J1, LeaguePoints::new(j1.0, j1.1)),
            (League::J2, LeaguePoints::new(j2.0, j2.1)),
            (League::J3, LeaguePoints::new(j3.0, j3.1)),
        ]
        .into_iter()
        .collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ties_get_distinct_ranks() {
        let participants = names(&["A", "B", "C"]);
        let mut scores = HashMap::new();
        scores.insert("A".to_string(), points((4, 1), (3, 0), (3, 0)));
        scores.insert("B".to_string(), points((4, 1), (3, 0), (3, 0)));
        scores.insert("C".to_string(), points((3, 0), (2, 0), (2, 0)));

        let rows = build(&participants, &scores);
        let ranked: Vec<(u32, &str, u32)> = rows
            .iter()
            .map(|r| (r.rank, r.name.as_str(), r.total_points))
            .collect();
        assert_eq!(ranked, vec![(1, "A", 10), (2, "B", 10), (3, "C", 7)]);
    }

    #[test]
    fn test_exact_matches_break_points_tie() {
        let participants = names(&["Few", "Many"]);
        let mut scores = HashMap::new();
        scores.insert("Few".to_string(), points((4, 0), (4, 0), (4, 0)));
        scores.insert("Many".to_string(), points((4, 2), (4, 0), (4, 0)));

        let rows = build(&participants, &scores);
        assert_eq!(rows[0].name, "Many");
        assert_eq!(rows[0].total_exact_matches, 2);
    }

    #[test]
    fn test_j1_breaks_tie_before_j2() {
        let participants = names(&["Two", "Three"]);
        let mut scores = HashMap::new();
        scores.insert("Two".to_string(), points((2, 1), (5, 0), (3, 0)));
        scores.insert("Three".to_string(), points((3, 1), (4, 0), (3, 0)));

        let rows = build(&participants, &scores);
        assert_eq!(rows[0].name, "Three");
        assert_eq!(rows[0].j1_points, 3);
        assert_eq!(rows[1].name, "Two");
    }

    #[test]
    fn test_j1_decides_when_totals_and_lower_leagues_match() {
        let row = |name: &str, j1: u32| LeaderboardRow {
            rank: 0,
            name: name.to_string(),
            total_points: 8,
            total_exact_matches: 2,
            j1_points: j1,
            j2_points: 3,
            j3_points: 3,
        };
        let (two, three) = (row("Two", 2), row("Three", 3));
        assert!(three.sort_key() > two.sort_key());
        assert_eq!(three.league_points(League::J2), two.league_points(League::J2));
        assert_eq!(three.league_points(League::J3), two.league_points(League::J3));

        // Same lower-league cards through build: the J1 point carries the row
        let participants = names(&["Two", "Three"]);
        let mut scores = HashMap::new();
        scores.insert("Two".to_string(), points((2, 1), (3, 0), (3, 0)));
        scores.insert("Three".to_string(), points((3, 1), (3, 0), (3, 0)));

        let rows = build(&participants, &scores);
        assert_eq!(rows[0].name, "Three");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].name, "Two");
    }

    #[test]
    fn test_j3_is_last_tie_break() {
        let participants = names(&["Low", "High"]);
        let mut scores = HashMap::new();
        scores.insert("Low".to_string(), points((3, 0), (3, 0), (2, 0)));
        scores.insert("High".to_string(), points((3, 0), (2, 0), (3, 0)));

        // Same total and exacts; J1 equal, J2 decides before J3
        let rows = build(&participants, &scores);
        assert_eq!(rows[0].name, "Low");
    }

    #[test]
    fn test_full_tie_keeps_encounter_order() {
        let participants = names(&["Zed", "Amy", "Bob"]);
        let scores: HashMap<_, _> = participants
            .iter()
            .map(|n| (n.clone(), points((2, 1), (1, 0), (0, 0))))
            .collect();

        let rows = build(&participants, &scores);
        let order: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["Zed", "Amy", "Bob"]);
    }

    #[test]
    fn test_unscored_participant_is_zero() {
        let participants = names(&["Ghost", "Real"]);
        let mut scores = HashMap::new();
        scores.insert("Real".to_string(), points((1, 0), (0, 0), (0, 0)));

        let rows = build(&participants, &scores);
        assert_eq!(rows[1].name, "Ghost");
        assert_eq!(rows[1].sort_key(), (0, 0, 0, 0, 0));
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn test_build_is_idempotent() {
        let participants = names(&["A", "B", "C", "D"]);
        let mut scores = HashMap::new();
        scores.insert("A".to_string(), points((1, 0), (2, 1), (0, 0)));
        scores.insert("B".to_string(), points((2, 1), (1, 0), (0, 0)));
        scores.insert("C".to_string(), points((2, 1), (1, 0), (0, 0)));
        scores.insert("D".to_string(), points((0, 0), (0, 0), (5, 2)));

        assert_eq!(build(&participants, &scores), build(&participants, &scores));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn card() -> impl Strategy<Value = (u32, u32, u32, u32)> {
            // points per league, exact matches
            (0u32..13, 0u32..19, 0u32..19, 0u32..8)
        }

        proptest! {
            /// Ranks are 1..=N and rows are non-increasing in the sort key
            #[test]
            fn prop_ranking_is_total_order(cards in prop::collection::vec(card(), 0..40)) {
                let participants: Vec<String> =
                    (0..cards.len()).map(|i| format!("P{}", i)).collect();
                let scores: HashMap<String, BTreeMap<League, LeaguePoints>> = participants
                    .iter()
                    .zip(&cards)
                    .map(|(name, &(j1, j2, j3, exact))| {
                        (name.clone(), points((j1, exact), (j2, 0), (j3, 0)))
                    })
                    .collect();

                let rows = build(&participants, &scores);
                prop_assert_eq!(rows.len(), participants.len());
                for (i, row) in rows.iter().enumerate() {
                    prop_assert_eq!(row.rank as usize, i + 1);
                    prop_assert_eq!(
                        row.total_points,
                        row.j1_points + row.j2_points + row.j3_points
                    );
                }
                for pair in rows.windows(2) {
                    prop_assert!(pair[0].sort_key() >= pair[1].sort_key());
                }
            }
        }
    }
}
