// src/extract/mod.rs

use anyhow::{ensure, Result};
use clap::ValueEnum;
use std::{fmt, path::PathBuf};

use crate::{config::Config, fetch::Transport};

pub mod download;
pub mod latest_versions;
pub mod pep;
pub mod whats_new;

/// Positional rows of strings. The header is kept apart from the data rows
/// and every data row has the header's arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultSet {
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a data row; a row with the wrong number of fields is an error.
    pub fn push<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        ensure!(
            row.len() == self.header.len(),
            "row has {} fields, header has {}: {:?}",
            row.len(),
            self.header.len(),
            row
        );
        self.rows.push(row);
        Ok(())
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header first, then data rows.
    pub fn all_rows(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What a mode left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Table(ResultSet),
    Downloaded(PathBuf),
    /// The entry page could not be fetched; already logged.
    Empty,
}

impl From<Option<ResultSet>> for Outcome {
    fn from(value: Option<ResultSet>) -> Self {
        value.map_or(Outcome::Empty, Outcome::Table)
    }
}

impl From<Option<PathBuf>> for Outcome {
    fn from(value: Option<PathBuf>) -> Self {
        value.map_or(Outcome::Empty, Outcome::Downloaded)
    }
}

/// Scraping task selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// "What's New" articles with their titles and authors
    WhatsNew,
    /// Documentation versions and their support status
    LatestVersions,
    /// Download the A4 PDF documentation archive
    Download,
    /// Count PEPs by status and cross-check against the index
    Pep,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }

    pub fn run(self, transport: &dyn Transport, config: &Config) -> Result<Outcome> {
        Ok(match self {
            Mode::WhatsNew => whats_new::run(transport, config)?.into(),
            Mode::LatestVersions => latest_versions::run(transport, config)?.into(),
            Mode::Download => download::run(transport, config)?.into(),
            Mode::Pep => pep::run(transport, config)?.into(),
        })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
