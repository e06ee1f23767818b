//! Run configuration, read from a TOML file.
//!
//! ```toml
//! year = 2025
//! standings_dir = "tables/2025"
//! predictions = "JPred 2025 - normalized.csv"
//! aliases = "team_name_mapping.csv"
//! output = "results.json"
//!
//! # Optional: override a league's slot card, e.g. for old form headers
//! [[slots]]
//! league = "j2"
//! rule = "tier_b"
//! slots = [
//!     { index = 1, label = "First Place", column = "J2 First Place" },
//!     # ...
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::aliases::TeamAliases;
use crate::error::{JpredError, Result};
use crate::slots::{SlotDefinition, SlotDefinitions};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Season being scored, used for log lines and default paths
    pub year: Option<u32>,

    /// Directory holding `j1.json`, `j2.json`, `j3.json`
    pub standings_dir: PathBuf,

    /// Normalized predictions sheet
    pub predictions: PathBuf,

    /// Optional `FormName,TableName` alias CSV
    pub aliases: Option<PathBuf>,

    /// Where to store the leaderboard (`.json` or `.csv`); nothing is written
    /// when unset
    pub output: Option<PathBuf>,

    /// Per-league slot card overrides; leagues not listed use the standard card
    pub slots: Vec<SlotDefinition>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            year: None,
            standings_dir: PathBuf::from("tables"),
            predictions: PathBuf::from("predictions.csv"),
            aliases: None,
            output: None,
            slots: Vec::new(),
        }
    }
}

impl RunConfig {
    /// Default layout for a season: `tables/<year>` and
    /// `JPred <year> - Form responses 1.csv`
    pub fn for_year(year: u32) -> Self {
        Self {
            year: Some(year),
            standings_dir: PathBuf::from("tables").join(year.to_string()),
            predictions: PathBuf::from(format!("JPred {} - Form responses 1.csv", year)),
            ..Default::default()
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Standard cards with any configured overrides applied, validated.
    pub fn slot_definitions(&self) -> Result<SlotDefinitions> {
        let standard = SlotDefinitions::standard();
        let mut defs: Vec<SlotDefinition> = standard.iter().cloned().collect();

        for custom in &self.slots {
            if self.slots.iter().filter(|d| d.league == custom.league).count() > 1 {
                return Err(JpredError::config(format!(
                    "{} slot card overridden more than once",
                    custom.league
                )));
            }
            if let Some(def) = defs.iter_mut().find(|d| d.league == custom.league) {
                *def = custom.clone();
            }
        }

        SlotDefinitions::from_definitions(defs)
    }

    /// The configured alias table, or an empty one
    pub fn team_aliases(&self) -> Result<TeamAliases> {
        match &self.aliases {
            Some(path) => TeamAliases::read_from_file(path),
            None => Ok(TeamAliases::new()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.predictions.as_os_str().is_empty() {
            return Err(JpredError::config("predictions path must be set"));
        }
        if self.standings_dir.as_os_str().is_empty() {
            return Err(JpredError::config("standings_dir must be set"));
        }
        if let Some(output) = &self.output {
            if output == &self.predictions {
                return Err(JpredError::config("output would overwrite the predictions sheet"));
            }
        }
        self.slot_definitions()?;
        Ok(())
    }
}
