//! CSV export of the log collection.
//!
//! One row per entry in store order, header
//! `Date,Flow,Spotting,Mood,WaterIntake,Symptoms`, symptoms joined with `;`.

use crate::dates::format_date;
use crate::{Error, LogEntry, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Flow")]
    flow: String,
    #[serde(rename = "Spotting")]
    spotting: String,
    #[serde(rename = "Mood")]
    mood: String,
    #[serde(rename = "WaterIntake")]
    water_intake: u32,
    #[serde(rename = "Symptoms")]
    symptoms: String,
}

impl From<&LogEntry> for CsvRow {
    fn from(entry: &LogEntry) -> Self {
        CsvRow {
            date: format_date(entry.date),
            flow: entry.flow.map(|f| f.to_string()).unwrap_or_default(),
            spotting: entry.spotting.clone().unwrap_or_default(),
            mood: entry.mood.clone().unwrap_or_default(),
            water_intake: entry.water_intake,
            symptoms: entry.symptoms.join(";"),
        }
    }
}

fn write_rows<W: Write>(logs: &[LogEntry], out: W) -> Result<W> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    // Written explicitly so an empty log still gets a header row
    writer.write_record(["Date", "Flow", "Spotting", "Mood", "WaterIntake", "Symptoms"])?;
    for entry in logs {
        writer.serialize(CsvRow::from(entry))?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
}

/// Render the export as a string
pub fn generate_csv(logs: &[LogEntry]) -> Result<String> {
    let bytes = write_rows(logs, Vec::new())?;
    let mut csv = String::from_utf8(bytes).map_err(|e| Error::Other(e.to_string()))?;
    if csv.ends_with('\n') {
        csv.pop();
    }
    Ok(csv)
}

/// Write the export to `path` atomically
///
/// Returns the number of rows written.
pub fn write_csv(logs: &[LogEntry], path: &Path) -> Result<usize> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    let file = write_rows(logs, temp.as_file())?;
    file.sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Exported {} log entries to {:?}", logs.len(), path);
    Ok(logs.len())
}
