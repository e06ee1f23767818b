//! Reader for the predictions sheet.
//!
//! The sheet has one row per participant and one column per slot, headed
//! with the slot's `column` name (e.g. `J1 First Place`). Raw form exports
//! wrap those names as `J1 Predictions [J1 First Place]` or
//! ` [J2 First Place]`; both are read as the bracketed name. Cells hold team
//! names as typed on the entry form; [`TeamAliases`] maps them onto table
//! names before scoring.

use std::io::Read;
use std::path::Path;

use crate::aliases::TeamAliases;
use crate::error::{JpredError, Result};
use crate::league::League;
use crate::prediction::{Prediction, PredictionSet};
use crate::slots::{Slot, SlotDefinitions};

/// Headers accepted for the participant name column, in preference order
pub const NAME_COLUMNS: [&str; 2] = ["Name", "Name or Nickname"];

pub fn read_predictions_csv(
    path: &Path,
    slots: &SlotDefinitions,
    aliases: &TeamAliases,
) -> Result<PredictionSet> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    read_records(reader, slots, aliases)
}

pub fn read_predictions<R: Read>(
    input: R,
    slots: &SlotDefinitions,
    aliases: &TeamAliases,
) -> Result<PredictionSet> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);
    read_records(reader, slots, aliases)
}

/// `J1 Predictions [J1 First Place]` -> `J1 First Place`
fn normalize_header(header: &str) -> &str {
    let Some(open) = header.find('[') else {
        return header.trim();
    };
    let rest = &header[open + 1..];
    match rest.find(']') {
        Some(close) => rest[..close].trim(),
        None => header.trim(),
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| normalize_header(h).eq_ignore_ascii_case(name))
}

/// Column for a slot: its configured header, or `"<League> <Label>"`.
fn find_slot_column(headers: &csv::StringRecord, league: League, slot: &Slot) -> Option<usize> {
    find_column(headers, &slot.column)
        .or_else(|| find_column(headers, &format!("{} {}", league, slot.label)))
}

fn read_records<R: Read>(
    mut reader: csv::Reader<R>,
    slots: &SlotDefinitions,
    aliases: &TeamAliases,
) -> Result<PredictionSet> {
    let headers = reader.headers()?.clone();

    let name_col = NAME_COLUMNS
        .iter()
        .find_map(|name| find_column(&headers, name))
        .ok_or_else(|| {
            JpredError::input(format!(
                "no participant name column (expected one of {:?})",
                NAME_COLUMNS
            ))
        })?;

    // (league, slot index, column position)
    let mut slot_cols: Vec<(League, u32, usize)> = Vec::new();
    for def in slots.iter() {
        let found_before = slot_cols.len();
        for slot in &def.slots {
            match find_slot_column(&headers, def.league, slot) {
                Some(col) => slot_cols.push((def.league, slot.index, col)),
                None => tracing::warn!(
                    "Predictions sheet has no '{}' column; {} slot {} counts as blank",
                    slot.column,
                    def.league,
                    slot.index
                ),
            }
        }

        if slot_cols.len() == found_before {
            return Err(JpredError::input(format!(
                "predictions sheet has no {} slot columns (expected headers like '{}')",
                def.league,
                def.slots.first().map(|s| s.column.as_str()).unwrap_or_default()
            )));
        }
    }

    let mut set = PredictionSet::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let line = row + 2;

        let name = record.get(name_col).unwrap_or("");
        if name.is_empty() {
            tracing::warn!("Line {}: no participant name, row skipped", line);
            continue;
        }

        if set.contains(name) {
            tracing::warn!("Line {}: '{}' appears more than once; using this row", line, name);
            set.clear_picks(name);
        } else {
            set.add_participant(name);
        }

        for &(league, slot_index, col) in &slot_cols {
            let team = record.get(col).unwrap_or("");
            if team.is_empty() {
                continue;
            }
            set.insert(Prediction::new(name, league, slot_index, aliases.resolve(team)));
        }
    }

    tracing::info!("Read predictions for {} participants", set.len());
    Ok(set)
}
