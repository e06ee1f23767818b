//! Final league tables and where they come from.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{JpredError, Result};
use crate::league::League;

/// Immutable snapshot of one league's final positions.
///
/// Positions are dense (1..=N) and each team holds exactly one of them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandingsTable {
    league: League,
    positions: HashMap<String, u32>,
}

impl StandingsTable {
    /// Build a table from `(team, position)` pairs, rejecting gaps and
    /// duplicates.
    pub fn from_entries<I, S>(league: League, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut positions = HashMap::new();
        let mut seen = BTreeMap::new();

        for (team, position) in entries {
            let team = team.into();
            if let Some(other) = seen.insert(position, team.clone()) {
                return Err(JpredError::standings(
                    league,
                    format!("position {} held by both '{}' and '{}'", position, other, team),
                ));
            }
            if positions.insert(team.clone(), position).is_some() {
                return Err(JpredError::standings(
                    league,
                    format!("team '{}' listed more than once", team),
                ));
            }
        }

        if positions.is_empty() {
            return Err(JpredError::standings(league, "table is empty"));
        }

        for (expected, &position) in (1u32..).zip(seen.keys()) {
            if position != expected {
                return Err(JpredError::standings(
                    league,
                    format!("positions are not dense: expected {}, found {}", expected, position),
                ));
            }
        }

        Ok(StandingsTable { league, positions })
    }

    pub fn league(&self) -> League {
        self.league
    }

    /// Number of teams in the league (N)
    pub fn size(&self) -> u32 {
        self.positions.len() as u32
    }

    /// Final position of a team, if it played in this league
    pub fn position(&self, team: &str) -> Option<u32> {
        self.positions.get(team).copied()
    }

    /// Teams ordered from first to last
    pub fn teams_in_order(&self) -> Vec<&str> {
        let mut teams: Vec<(&str, u32)> = self
            .positions
            .iter()
            .map(|(team, &pos)| (team.as_str(), pos))
            .collect();
        teams.sort_by_key(|&(_, pos)| pos);
        teams.into_iter().map(|(team, _)| team).collect()
    }
}

/// A row of a league table JSON file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(rename = "Club")]
    pub club: String,

    #[serde(rename = "Position")]
    pub position: u32,
}

/// Read a league table in the `[{"Club": ..., "Position": ...}]` layout.
pub fn load_json(league: League, path: &Path) -> Result<StandingsTable> {
    let file = File::open(path)?;
    let rows: Vec<TableRow> = serde_json::from_reader(BufReader::new(file))?;
    StandingsTable::from_entries(league, rows.into_iter().map(|r| (r.club, r.position)))
}

/// Lookup of a league's final table.
pub trait StandingsSource {
    fn standings(&self, league: League) -> Result<StandingsTable>;

    /// Load and validate all three leagues.
    fn load_all(&self) -> Result<BTreeMap<League, StandingsTable>> {
        League::ALL
            .iter()
            .map(|&league| -> Result<(League, StandingsTable)> {
                Ok((league, self.standings(league)?))
            })
            .collect()
    }
}

/// A season directory holding `j1.json`, `j2.json` and `j3.json`.
#[derive(Clone, Debug)]
pub struct JsonStandingsDir {
    dir: PathBuf,
}

impl JsonStandingsDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonStandingsDir { dir: dir.into() }
    }

    pub fn path_for(&self, league: League) -> PathBuf {
        self.dir.join(format!("{}.json", league.key()))
    }
}

impl StandingsSource for JsonStandingsDir {
    fn standings(&self, league: League) -> Result<StandingsTable> {
        let path = self.path_for(league);
        load_json(league, &path).map_err(|e| match e {
            JpredError::Io(io) => JpredError::input(format!("{}: {}", path.display(), io)),
            other => other,
        })
    }
}

impl StandingsSource for BTreeMap<League, StandingsTable> {
    fn standings(&self, league: League) -> Result<StandingsTable> {
        self.get(&league)
            .cloned()
            .ok_or_else(|| JpredError::standings(league, "no table loaded"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table(n: u32) -> StandingsTable {
        let teams = (1..=n).map(|i| (format!("Team{}", i), i));
        StandingsTable::from_entries(League::J1, teams).unwrap()
    }

    #[test]
    fn test_lookup() {
        let t = table(20);
        assert_eq!(t.size(), 20);
        assert_eq!(t.position("Team7"), Some(7));
        assert_eq!(t.position("Nowhere FC"), None);
        assert_eq!(t.teams_in_order()[0], "Team1");
        assert_eq!(t.teams_in_order()[19], "Team20");
    }

    #[test]
    fn test_rejects_gap() {
        let err = StandingsTable::from_entries(League::J2, vec![("A", 1), ("B", 3)]).unwrap_err();
        assert!(matches!(err, JpredError::Config(_)));
        assert!(err.to_string().contains("not dense"));
    }

    #[test]
    fn test_rejects_duplicate_position() {
        let err = StandingsTable::from_entries(League::J1, vec![("A", 1), ("B", 1)]).unwrap_err();
        assert!(err.to_string().contains("position 1"));
    }

    #[test]
    fn test_rejects_duplicate_team() {
        let result = StandingsTable::from_entries(League::J1, vec![("A", 1), ("A", 2)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_empty_and_zero_based() {
        let empty: Vec<(String, u32)> = Vec::new();
        assert!(StandingsTable::from_entries(League::J3, empty).is_err());
        assert!(StandingsTable::from_entries(League::J3, vec![("A", 0), ("B", 1)]).is_err());
    }

    #[test]
    fn test_json_dir_source() {
        let dir = tempfile::tempdir().unwrap();
        for league in League::ALL {
            let mut f = File::create(dir.path().join(format!("{}.json", league.key()))).unwrap();
            write!(
                f,
                r#"[{{"Club": "Kashima", "Position": 2}}, {{"Club": "Urawa", "Position": 1}}]"#
            )
            .unwrap();
        }

        let source = JsonStandingsDir::new(dir.path());
        let all = source.load_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[&League::J2].position("Urawa"), Some(1));
        assert_eq!(all[&League::J3].teams_in_order(), vec!["Urawa", "Kashima"]);
    }

    #[test]
    fn test_json_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonStandingsDir::new(dir.path());
        let err = source.standings(League::J1).unwrap_err();
        assert!(matches!(err, JpredError::Input(_)));
    }
}
