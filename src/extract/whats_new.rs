// src/extract/whats_new.rs

use anyhow::Result;
use scraper::Html;
use url::Url;

use super::ResultSet;
use crate::{
    config::Config,
    fetch::{get_page, Transport},
    html::{find_all, find_in_doc, find_tag, href_of, text_of, AttrMatch},
    progress::track,
};

pub const HEADER: [&str; 3] = ["Article link", "Title", "Editor, Author"];

/// Absolute links to every per-release article listed in the index toctree.
fn article_links(doc: &Html, index_url: &Url) -> Result<Vec<Url>> {
    let main = find_in_doc(doc, "section", &[("id", AttrMatch::Exact("what-s-new-in-python"))])?;
    let toc = find_tag(main, "div", &[("class", AttrMatch::Exact("toctree-wrapper"))])?;
    let mut links = Vec::new();
    for item in find_all(toc, "li", &[("class", AttrMatch::Exact("toctree-l1"))]) {
        let anchor = find_tag(item, "a", &[])?;
        links.push(index_url.join(href_of(&anchor)?)?);
    }
    Ok(links)
}

/// Title and editor block of a single article.
fn article_summary(doc: &Html) -> Result<(String, String)> {
    let h1 = find_in_doc(doc, "h1", &[])?;
    let dl = find_in_doc(doc, "dl", &[])?;
    Ok((text_of(&h1), text_of(&dl).replace('\n', " ")))
}

pub fn run(transport: &dyn Transport, config: &Config) -> Result<Option<ResultSet>> {
    let index_url = config.main_doc_url.join("whatsnew/")?;
    let Some(doc) = get_page(transport, &index_url) else {
        return Ok(None);
    };
    let links = article_links(&doc, &index_url)?;

    let mut results = ResultSet::new(HEADER);
    for link in track(links, "Sections", "sect") {
        let Some(page) = get_page(transport, &link) else {
            continue;
        };
        let (title, editors) = article_summary(&page)?;
        results.push([link.to_string(), title, editors])?;
    }
    Ok(Some(results))
}
