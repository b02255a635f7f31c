// src/extract/pep.rs

use anyhow::{Context, Result};
use scraper::Html;
use std::{collections::BTreeMap, fmt};
use tracing::{info, warn};
use url::Url;

use super::ResultSet;
use crate::{
    config::Config,
    error::ScrapeError,
    fetch::{get_page, Transport},
    html::{find_all, find_in_doc, find_tag, href_of, text_of, AttrMatch},
    progress::track_transient,
};

pub const HEADER: [&str; 2] = ["Status", "Count"];
pub const TOTAL_LABEL: &str = "Total";
/// Tally label for pages without a `Status:` field.
pub const NO_STATUS_LABEL: &str = "(no status)";
const STATUS_TERM: &str = "Status:";

/// Index status letter (the code minus its type letter) to the statuses a
/// detail page may declare. An empty suffix means the PEP is still open.
const EXPECTED_STATUS: &[(&str, &[&str])] = &[
    ("A", &["Active", "Accepted"]),
    ("D", &["Deferred"]),
    ("F", &["Final"]),
    ("P", &["Provisional"]),
    ("R", &["Rejected"]),
    ("S", &["Superseded"]),
    ("W", &["Withdrawn"]),
    ("", &["Draft", "Active"]),
];

/// Statuses a PEP page may declare, given the index's type-and-status code.
/// `None` for codes missing from the table.
pub fn expected_statuses(code: &str) -> Option<&'static [&'static str]> {
    let suffix: String = code.chars().skip(1).collect();
    EXPECTED_STATUS
        .iter()
        .find(|(key, _)| *key == suffix)
        .map(|(_, statuses)| *statuses)
}

/// PEP type named by the first letter of the code.
pub fn pep_type(code: &str) -> Option<&'static str> {
    match code.chars().next()? {
        'I' => Some("Informational"),
        'P' => Some("Process"),
        'S' => Some("Standards Track"),
        _ => None,
    }
}

/// One row of the numerical index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PepRecord {
    pub number: u32,
    pub url: Url,
    pub type_and_status: String,
    pub title: String,
    pub authors: String,
}

/// A detail page whose declared status disagrees with the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConflict {
    pub url: Url,
    pub code: String,
    pub declared: Option<String>,
    pub expected: &'static [&'static str],
}

impl fmt::Display for StatusConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.url)?;
        writeln!(
            f,
            "Type: {} ({})",
            pep_type(&self.code).unwrap_or("unknown"),
            self.code
        )?;
        writeln!(
            f,
            "Status on page: {}",
            self.declared.as_deref().unwrap_or(NO_STATUS_LABEL)
        )?;
        write!(f, "Expected statuses: {:?}", self.expected)
    }
}

/// `None` when `declared` is acceptable for the record's code.
pub fn check_status(record: &PepRecord, declared: Option<&str>) -> Option<StatusConflict> {
    let expected = expected_statuses(&record.type_and_status).unwrap_or(&[]);
    if declared.is_some_and(|status| expected.contains(&status)) {
        return None;
    }
    Some(StatusConflict {
        url: record.url.clone(),
        code: record.type_and_status.clone(),
        declared: declared.map(str::to_string),
        expected,
    })
}

/// Occurrences per declared status. A missing status is its own key and
/// sorts ahead of every named status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTally {
    counts: BTreeMap<Option<String>, usize>,
}

impl StatusTally {
    pub fn record(&mut self, status: Option<String>) {
        *self.counts.entry(status).or_insert(0) += 1;
    }

    pub fn count(&self, status: Option<&str>) -> usize {
        self.counts
            .get(&status.map(str::to_string))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// `(status, count)` rows in status order, closed by a `Total` row.
    pub fn to_result_set(&self) -> Result<ResultSet> {
        let mut results = ResultSet::new(HEADER);
        for (status, count) in &self.counts {
            results.push([
                status.as_deref().unwrap_or(NO_STATUS_LABEL).to_string(),
                count.to_string(),
            ])?;
        }
        results.push([TOTAL_LABEL.to_string(), self.total().to_string()])?;
        Ok(results)
    }
}

/// Everything gathered from the detail pages.
#[derive(Debug, Default)]
pub struct PepSummary {
    pub tally: StatusTally,
    pub conflicts: Vec<StatusConflict>,
    pub skipped: usize,
}

/// Records from the numerical index table, in table order.
pub fn parse_index(doc: &Html, base: &Url) -> Result<Vec<PepRecord>> {
    let section = find_in_doc(doc, "section", &[("id", AttrMatch::Exact("numerical-index"))])?;
    let tbody = find_tag(section, "tbody", &[])?;

    let mut peps = Vec::new();
    for row in find_all(tbody, "tr", &[]) {
        let cells: Vec<String> = find_all(row, "td", &[]).map(|td| text_of(&td)).collect();
        let [code, number, title, authors] = <[String; 4]>::try_from(cells).map_err(|cells| {
            ScrapeError::MalformedIndexRow(format!("expected 4 cells, got {:?}", cells))
        })?;
        let number = number.trim().parse::<u32>().map_err(|_| {
            ScrapeError::MalformedIndexRow(format!("bad PEP number {:?}", number))
        })?;
        let anchor = find_tag(row, "a", &[])?;
        let url = base
            .join(href_of(&anchor)?)
            .with_context(|| format!("resolving link of PEP {}", number))?;
        peps.push(PepRecord {
            number,
            url,
            type_and_status: code.trim().to_string(),
            title,
            authors,
        });
    }
    Ok(peps)
}

/// Value of the last `Status:` field in the page header, if any.
pub fn declared_status(doc: &Html) -> Result<Option<String>> {
    let fields = find_in_doc(
        doc,
        "dl",
        &[("class", AttrMatch::Exact("rfc2822 field-list simple"))],
    )?;
    let terms = find_all(fields, "dt", &[]);
    let values = find_all(fields, "dd", &[]);
    Ok(terms
        .zip(values)
        .filter(|(dt, _)| text_of(dt) == STATUS_TERM)
        .map(|(_, dd)| text_of(&dd).trim().to_string())
        .last())
}

/// Visit every detail page in order, tallying declared statuses and
/// collecting conflicts. Pages that fail to load are skipped.
pub fn collect_statuses(transport: &dyn Transport, peps: &[PepRecord]) -> Result<PepSummary> {
    let mut summary = PepSummary::default();
    for pep in track_transient(peps, "Fetching PEP pages", "PEP") {
        let Some(page) = get_page(transport, &pep.url) else {
            summary.skipped += 1;
            continue;
        };
        let status = declared_status(&page)?;
        if let Some(conflict) = check_status(pep, status.as_deref()) {
            summary.conflicts.push(conflict);
        }
        summary.tally.record(status);
    }
    Ok(summary)
}

pub fn run(transport: &dyn Transport, config: &Config) -> Result<Option<ResultSet>> {
    let Some(doc) = get_page(transport, &config.peps_url) else {
        return Ok(None);
    };
    let peps = parse_index(&doc, &config.peps_url)?;
    info!(count = peps.len(), "PEPs listed in the numerical index");

    let summary = collect_statuses(transport, &peps)?;
    if summary.skipped > 0 {
        warn!(skipped = summary.skipped, "PEP pages skipped after failed fetch");
    }
    if !summary.conflicts.is_empty() {
        let block = summary
            .conflicts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        warn!("\nMismatched statuses:\n{}", block);
    }
    summary.tally.to_result_set().map(Some)
}
