//! Replace-on-write stores for the finished leaderboard.
//!
//! Each write goes to a sibling `.tmp` file that is then renamed over the
//! target, so readers only ever see a complete previous or complete new
//! table.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{JpredError, Result};
use crate::leaderboard::LeaderboardRow;

/// Where a finished leaderboard goes.
pub trait LeaderboardSink {
    /// Replace any previously stored table with `rows`.
    fn replace(&mut self, rows: &[LeaderboardRow]) -> Result<()>;
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write through a temp file, then rename into place.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let tmp = tmp_path(path);
    let mut out = BufWriter::new(File::create(&tmp)?);
    let written = write(&mut out).and_then(|_| out.flush().map_err(JpredError::from));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    drop(out);
    fs::rename(&tmp, path)?;
    Ok(())
}

#[derive(Clone, Debug)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSink { path: path.into() }
    }
}

impl LeaderboardSink for JsonFileSink {
    fn replace(&mut self, rows: &[LeaderboardRow]) -> Result<()> {
        write_atomically(&self.path, |out| {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            Ok(())
        })?;
        tracing::info!("Wrote {} leaderboard rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}

/// Row layout of the results table
#[derive(Serialize)]
struct ResultRecord<'a> {
    rank: u32,
    name: &'a str,
    points: u32,
    exact_matches: u32,
    j1_score: u32,
    j2_score: u32,
    j3_score: u32,
}

impl<'a> From<&'a LeaderboardRow> for ResultRecord<'a> {
    fn from(row: &'a LeaderboardRow) -> Self {
        ResultRecord {
            rank: row.rank,
            name: &row.name,
            points: row.total_points,
            exact_matches: row.total_exact_matches,
            j1_score: row.j1_points,
            j2_score: row.j2_points,
            j3_score: row.j3_points,
        }
    }
}

/// CSV with the `rank,name,points,exact_matches,j1_score,j2_score,j3_score`
/// columns the rendering scripts read.
#[derive(Clone, Debug)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvFileSink { path: path.into() }
    }
}

impl LeaderboardSink for CsvFileSink {
    fn replace(&mut self, rows: &[LeaderboardRow]) -> Result<()> {
        write_atomically(&self.path, |out| {
            let mut writer = csv::Writer::from_writer(out);
            for row in rows {
                writer.serialize(ResultRecord::from(row))?;
            }
            writer.flush()?;
            Ok(())
        })?;
        tracing::info!("Wrote {} leaderboard rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}

/// Pick a sink from the output file extension (`.json` or `.csv`).
pub fn sink_for_path(path: &Path) -> Result<Box<dyn LeaderboardSink>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => Ok(Box::new(JsonFileSink::new(path))),
        Some("csv") => Ok(Box::new(CsvFileSink::new(path))),
        _ => Err(JpredError::config(format!(
            "cannot tell output format of {}; use .json or .csv",
            path.display()
        ))),
    }
}
