// src/extract/latest_versions.rs

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

use super::ResultSet;
use crate::{
    config::Config,
    error::ScrapeError,
    fetch::{get_page, Transport},
    html::{find_all, find_in_doc, href_of, text_of, AttrMatch},
    progress::track,
};

pub const HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];
const ALL_VERSIONS_MARKER: &str = "All versions";

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)")
        .expect("version regex should compile")
});

/// Split a sidebar link text into `(version, status)`. Text that does not
/// look like `Python X.Y (status)` is kept whole as the version.
pub fn parse_version_text(text: &str) -> (String, String) {
    match VERSION_RE.captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (text.to_string(), String::new()),
    }
}

pub fn run(transport: &dyn Transport, config: &Config) -> Result<Option<ResultSet>> {
    let Some(doc) = get_page(transport, &config.main_doc_url) else {
        return Ok(None);
    };
    let sidebar = find_in_doc(&doc, "div", &[("class", AttrMatch::Exact("sphinxsidebarwrapper"))])?;
    let Some(list) = find_all(sidebar, "ul", &[]).find(|ul| text_of(ul).contains(ALL_VERSIONS_MARKER))
    else {
        let err = ScrapeError::VersionListMissing;
        error!("{}", err);
        return Err(err.into());
    };

    let anchors: Vec<_> = find_all(list, "a", &[]).collect();
    let mut results = ResultSet::new(HEADER);
    for anchor in track(anchors, "Versions", "ver") {
        let link = href_of(&anchor)?;
        let (version, status) = parse_version_text(&text_of(&anchor));
        results.push([link.to_string(), version, status])?;
    }
    Ok(Some(results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::FakeTransport;

    const MAIN: &str = r#"<html><body>
      <div class="sphinxsidebar"><div class="sphinxsidebarwrapper">
        <h3>Navigation</h3>
        <ul><li><a href="genindex.html">Index</a></li></ul>
        <h3>Docs by version</h3>
        <ul>
          <li><a href="https://docs.python.org/3.14/">Python 3.14 (in development)</a></li>
          <li><a href="https://docs.python.org/3.13/">Python 3.13 (stable)</a></li>
          <li><a href="https://docs.python.org/3.8/">Python 3.8 (EOL)</a></li>
          <li><a href="https://www.python.org/doc/versions/">All versions</a></li>
        </ul>
      </div></div>
    </body></html>"#;

    fn config() -> Config {
        Config::new(".").unwrap()
    }

    #[test]
    fn test_parse_version_text() {
        assert_eq!(
            parse_version_text("Python 3.11 (stable)"),
            ("3.11".to_string(), "stable".to_string())
        );
        assert_eq!(
            parse_version_text("Python 2.7 (EOL)"),
            ("2.7".to_string(), "EOL".to_string())
        );
        assert_eq!(
            parse_version_text("In development"),
            ("In development".to_string(), String::new())
        );
    }

    #[test]
    fn test_versions_from_sidebar() {
        let t = FakeTransport::new().page("https://docs.python.org/3/", MAIN);
        let rs = run(&t, &config()).unwrap().unwrap();
        assert_eq!(rs.header(), HEADER);
        assert_eq!(rs.len(), 4);
        assert_eq!(
            rs.rows()[1],
            vec![
                "https://docs.python.org/3.13/".to_string(),
                "3.13".to_string(),
                "stable".to_string(),
            ]
        );
        assert_eq!(rs.rows()[3][1], "All versions");
        assert_eq!(rs.rows()[3][2], "");
    }

    #[test]
    fn test_missing_version_list_aborts() {
        let page = r#"<div class="sphinxsidebarwrapper"><ul><li><a href="x">Index</a></li></ul></div>"#;
        let t = FakeTransport::new().page("https://docs.python.org/3/", page);
        let err = run(&t, &config()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::VersionListMissing)
        ));
    }
}
