// src/extract/download.rs

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::{fs, path::PathBuf};
use tracing::info;
use url::Url;

use crate::{
    config::{ensure_dir, Config},
    fetch::{get_page, Transport},
    html::{find_in_doc, find_tag, href_of, AttrMatch},
};

static PDF_A4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r".+pdf-a4\.zip$").expect("archive regex should compile"));

/// Absolute URL of the A4 PDF archive listed in the downloads table.
fn archive_url(doc: &Html, page_url: &Url) -> Result<Url> {
    let table = find_in_doc(doc, "table", &[("class", AttrMatch::Exact("docutils"))])?;
    let anchor = find_tag(table, "a", &[("href", AttrMatch::Pattern(&PDF_A4_RE))])?;
    Ok(page_url.join(href_of(&anchor)?)?)
}

/// Last path segment of `url`, used as the local file name.
fn file_name(url: &Url) -> &str {
    url.path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .unwrap_or("python-docs-pdf-a4.zip")
}

pub fn run(transport: &dyn Transport, config: &Config) -> Result<Option<PathBuf>> {
    let page_url = config.main_doc_url.join("download.html")?;
    let Some(doc) = get_page(transport, &page_url) else {
        return Ok(None);
    };
    let link = archive_url(&doc, &page_url)?;

    let downloads_dir = config.downloads_dir();
    ensure_dir(&downloads_dir)?;
    let dest_path = downloads_dir.join(file_name(&link));

    let bytes = transport.get_bytes(&link)?;
    fs::write(&dest_path, &bytes).with_context(|| format!("writing {:?}", &dest_path))?;
    info!(size = bytes.len(), "archive downloaded and saved: {}", dest_path.display());
    Ok(Some(dest_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ScrapeError, fetch::testing::FakeTransport};
    use tempfile::tempdir;

    const DOWNLOADS: &str = r#"<html><body>
      <table class="docutils align-default">
        <thead><tr><th>Format</th><th>Packed as .zip</th><th>Packed as .tar.bz2</th></tr></thead>
        <tbody>
          <tr><td>PDF (US-Letter paper size)</td>
              <td><a class="reference external" href="archives/python-3.13-docs-pdf-letter.zip">Download</a></td>
              <td><a class="reference external" href="archives/python-3.13-docs-pdf-letter.tar.bz2">Download</a></td></tr>
          <tr><td>PDF (A4 paper size)</td>
              <td><a class="reference external" href="archives/python-3.13-docs-pdf-a4.zip">Download</a></td>
              <td><a class="reference external" href="archives/python-3.13-docs-pdf-a4.tar.bz2">Download</a></td></tr>
        </tbody>
      </table>
    </body></html>"#;

    #[test]
    fn test_archive_saved_under_downloads() {
        let tmp = tempdir().unwrap();
        let config = Config::new(tmp.path()).unwrap();
        let t = FakeTransport::new()
            .page("https://docs.python.org/3/download.html", DOWNLOADS)
            .blob(
                "https://docs.python.org/3/archives/python-3.13-docs-pdf-a4.zip",
                b"PK\x03\x04zip",
            );

        let path = run(&t, &config).unwrap().unwrap();
        assert_eq!(path, tmp.path().join("downloads").join("python-3.13-docs-pdf-a4.zip"));
        assert_eq!(fs::read(&path).unwrap(), b"PK\x03\x04zip");
    }

    #[test]
    fn test_no_a4_link_writes_nothing() {
        let tmp = tempdir().unwrap();
        let config = Config::new(tmp.path()).unwrap();
        let page = DOWNLOADS.replace("pdf-a4.zip", "pdf-a4.tar.xz");
        let t = FakeTransport::new().page("https://docs.python.org/3/download.html", &page);

        let err = run(&t, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::TagNotFound { .. })
        ));
        assert!(!config.downloads_dir().exists());
    }

    #[test]
    fn test_file_name_from_url() {
        let url = Url::parse("https://docs.python.org/3/archives/python-docs-pdf-a4.zip").unwrap();
        assert_eq!(file_name(&url), "python-docs-pdf-a4.zip");
    }
}
