use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::JpredError;

/// One of the three J.League divisions.
///
/// Variant order is the fixed league order used for tie-breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    J1,
    J2,
    J3,
}

impl League {
    pub const ALL: [League; 3] = [League::J1, League::J2, League::J3];

    /// Lowercase key used in file names and config (`j1`, `j2`, `j3`)
    pub fn key(self) -> &'static str {
        match self {
            League::J1 => "j1",
            League::J2 => "j2",
            League::J3 => "j3",
        }
    }

    /// Position of this league in [`League::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            League::J1 => "J1",
            League::J2 => "J2",
            League::J3 => "J3",
        };
        f.write_str(label)
    }
}

impl FromStr for League {
    type Err = JpredError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "j1" => Ok(League::J1),
            "j2" => Ok(League::J2),
            "j3" => Ok(League::J3),
            other => Err(JpredError::input(format!("unknown league '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("J2".parse::<League>().unwrap(), League::J2);
        assert_eq!(" j3 ".parse::<League>().unwrap(), League::J3);
        assert!("j4".parse::<League>().is_err());
    }

    #[test]
    fn test_order_matches_tie_break_order() {
        assert!(League::J1 < League::J2 && League::J2 < League::J3);
        for (i, league) in League::ALL.iter().enumerate() {
            assert_eq!(league.index(), i);
        }
    }
}
