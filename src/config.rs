// src/config.rs

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
pub const PEPS_URL: &str = "https://peps.python.org/";

/// Process-wide settings, built once in `main` and handed to whatever
/// needs a directory or a root URL.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub main_doc_url: Url,
    pub peps_url: Url,
}

impl Config {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            base_dir: base_dir.into(),
            main_doc_url: Url::parse(MAIN_DOC_URL).context("parsing docs root URL")?,
            peps_url: Url::parse(PEPS_URL).context("parsing PEP index URL")?,
        })
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("parser.log")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.base_dir.join("downloads")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.base_dir.join("results")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join("cache")
    }
}

/// Create `dir` (and parents) if missing, returning it for chaining.
pub fn ensure_dir(dir: &Path) -> Result<&Path> {
    fs::create_dir_all(dir).with_context(|| format!("creating directory {:?}", dir))?;
    Ok(dir)
}
