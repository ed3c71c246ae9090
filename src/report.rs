//! Collaborator report generation.
//!
//! Joins the extracted collaborator list against the previous report so
//! hand-entered institutions carry forward, and writes a new dated CSV.
//! Both files are headerless with two columns: `name, institution`.

use crate::collaborators::CanonicalName;
use crate::error::{Result, ZoterError};
use crate::names::clean_name;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Prefix shared by every generated report
pub const REPORT_PREFIX: &str = "collabs_";

/// Cleaned display name -> institution, from a prior report
pub type InstitutionMap = HashMap<String, String>;

/// One output line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub institution: String,
}

/// `collabs_YYYYMMDD.csv`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("{}{}.csv", REPORT_PREFIX, date.format("%Y%m%d"))
}

/// Most recent prior report in `dir`, by file name order.
///
/// Returns `None` when the directory contains no `collabs_*.csv` file.
pub fn find_latest_report(dir: &Path) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with(REPORT_PREFIX) && name.ends_with(".csv") && entry.file_type()?.is_file() {
            candidates.push(entry.path());
        }
    }
    candidates.sort();
    Ok(candidates.pop())
}

/// Institutions from `input`, else the newest report in `dir`, else none.
///
/// Also returns the path that was read so callers can keep from writing
/// over it. An explicit `input` that cannot be read is an error; finding
/// no prior report at all is not.
pub fn load_prior(input: Option<&Path>, dir: &Path) -> Result<(Option<PathBuf>, InstitutionMap)> {
    let path = match input {
        Some(path) => path.to_path_buf(),
        None => match find_latest_report(dir)? {
            Some(path) => path,
            None => {
                warn!("No prior {}*.csv found in {:?}; institutions will be empty", REPORT_PREFIX, dir);
                return Ok((None, InstitutionMap::new()));
            }
        },
    };

    info!("Loading old collaborators from {:?}", path);
    let institutions = load_institutions(&path)?;
    Ok((Some(path), institutions))
}

/// Fail if `output` names the same file as `input`.
pub fn ensure_not_input(output: &Path, input: Option<&Path>) -> Result<()> {
    let Some(input) = input else { return Ok(()) };
    let same = match (std::fs::canonicalize(output), std::fs::canonicalize(input)) {
        (Ok(out), Ok(inp)) => out == inp,
        _ => output == input,
    };
    if same {
        return Err(ZoterError::WouldOverwrite(input.to_path_buf()));
    }
    Ok(())
}

/// Load `name -> institution` from a prior report.
///
/// Names are cleaned before use as keys. Every row needs at least two
/// columns; a shorter row fails the whole load.
pub fn load_institutions(path: &Path) -> Result<InstitutionMap> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut map = InstitutionMap::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        match (record.get(0), record.get(1)) {
            (Some(name), Some(institution)) => {
                map.insert(clean_name(name), institution.to_string());
            }
            _ => {
                return Err(ZoterError::MalformedRow {
                    line,
                    reason: format!("expected 2 columns, found {}", record.len()),
                })
            }
        }
    }

    info!("Loaded {} prior collaborators from {:?}", map.len(), path);
    Ok(map)
}

/// One row per collaborator, institution defaulting to empty.
pub fn merge(collaborators: &[CanonicalName], institutions: &InstitutionMap) -> Vec<ReportRow> {
    let rows: Vec<ReportRow> = collaborators
        .iter()
        .map(|c| {
            let name = CanonicalName::new(&c.last, &c.first).display();
            let institution = institutions.get(&name).cloned().unwrap_or_default();
            ReportRow { name, institution }
        })
        .collect();

    let matched = rows.iter().filter(|r| !r.institution.is_empty()).count();
    debug!(total = rows.len(), matched = matched, "Merged institutions");
    rows
}

/// Write rows to a new headerless CSV, replacing any file at `path`.
pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    for row in rows {
        wtr.serialize(row)?;
    }

    wtr.flush()?;
    info!("Saved {} rows to {:?}", rows.len(), path);
    Ok(())
}
