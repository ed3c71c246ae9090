//! Collaborator extraction from Zotero publications.
//!
//! Keeps journal articles published in or after a threshold year and
//! collects the distinct cleaned `(last, first)` pairs of their creators.

use crate::error::{Result, ZoterError};
use crate::names::{clean_name, display_name};
use crate::zotero::Publication;
use chrono::{Datelike, Local};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

static YEAR_REGEX: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}"));

fn year_regex() -> Result<&'static Regex> {
    (*YEAR_REGEX)
        .as_ref()
        .map_err(|e| ZoterError::Parse(format!("Invalid year pattern: {}", e)))
}

/// A cleaned author name. Ordering is by last name, then first name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalName {
    pub last: String,
    pub first: String,
}

impl CanonicalName {
    pub fn new(last: &str, first: &str) -> Self {
        Self {
            last: clean_name(last),
            first: clean_name(first),
        }
    }

    /// "Last, First"
    pub fn display(&self) -> String {
        display_name(&self.last, &self.first)
    }
}

/// First run of four ASCII digits in a free-text date.
///
/// Digits from other scripts are skipped, so `"٢٠١٠ / 2010"` yields 2010.
pub fn parse_year(date: &str) -> Result<Option<i32>> {
    Ok(year_regex()?
        .find(date)
        .and_then(|m| m.as_str().parse().ok()))
}

/// Extract collaborators using the current calendar year for undated records.
pub fn extract(records: &[Publication], start_year: i32) -> Result<Vec<CanonicalName>> {
    extract_with_fallback(records, start_year, Local::now().year())
}

/// Extract sorted, unique collaborators from qualifying records.
///
/// A record qualifies when it is a journal article and its year is at least
/// `start_year`. Records with no four-digit year in their date are counted
/// as `fallback_year`, so undated articles are included whenever the
/// threshold reaches the current year or earlier.
pub fn extract_with_fallback(
    records: &[Publication],
    start_year: i32,
    fallback_year: i32,
) -> Result<Vec<CanonicalName>> {
    let mut authors = BTreeSet::new();
    let mut qualifying = 0usize;

    for record in records.iter().filter(|r| r.is_journal_article()) {
        let year = parse_year(&record.data.date)?.unwrap_or(fallback_year);
        if year < start_year {
            continue;
        }
        qualifying += 1;
        for creator in &record.data.creators {
            let (last, first) = creator.name_parts();
            authors.insert(CanonicalName::new(last, first));
        }
    }

    debug!(
        records = records.len(),
        qualifying = qualifying,
        authors = authors.len(),
        "Extracted collaborators"
    );
    Ok(authors.into_iter().collect())
}
