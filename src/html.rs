// src/html.rs

use regex::Regex;
use scraper::{ElementRef, Html};
use std::fmt;
use tracing::error;

use crate::error::ScrapeError;

/// How a single attribute must look for an element to match.
#[derive(Debug, Clone, Copy)]
pub enum AttrMatch<'r> {
    Exact(&'r str),
    Pattern(&'r Regex),
}

impl AttrMatch<'_> {
    /// `class` is compared against the whole value and against each
    /// whitespace-separated class name.
    fn matches(&self, name: &str, value: &str) -> bool {
        let check = |v: &str| match self {
            AttrMatch::Exact(want) => v == *want,
            AttrMatch::Pattern(re) => re.is_match(v),
        };
        if check(value) {
            return true;
        }
        name == "class" && value.split_whitespace().any(check)
    }
}

impl fmt::Display for AttrMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrMatch::Exact(v) => write!(f, "{:?}", v),
            AttrMatch::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

pub type Attrs<'a, 'r> = &'a [(&'a str, AttrMatch<'r>)];

fn element_matches(el: &ElementRef<'_>, tag: &str, attrs: Attrs<'_, '_>) -> bool {
    el.value().name() == tag
        && attrs.iter().all(|(name, want)| {
            el.value()
                .attr(name)
                .is_some_and(|value| want.matches(name, value))
        })
}

fn describe_attrs(attrs: Attrs<'_, '_>) -> String {
    let parts = attrs
        .iter()
        .map(|(name, want)| format!("{}={}", name, want))
        .collect::<Vec<_>>();
    format!("{{{}}}", parts.join(", "))
}

/// Short `<tag id=.. class=..>` label used in error context.
pub fn describe_node(node: &ElementRef<'_>) -> String {
    let el = node.value();
    let mut out = format!("<{}", el.name());
    for key in ["id", "class"] {
        if let Some(v) = el.attr(key) {
            out.push_str(&format!(" {}=\"{}\"", key, v));
        }
    }
    out.push('>');
    out
}

/// Iterate descendant elements of `node` in document order, excluding
/// `node` itself, that satisfy the tag and attribute filter.
pub fn find_all<'a, 'b>(
    node: ElementRef<'a>,
    tag: &'b str,
    attrs: Attrs<'b, 'b>,
) -> impl Iterator<Item = ElementRef<'a>> + 'b
where
    'a: 'b,
{
    node.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |el| element_matches(el, tag, attrs))
}

/// Locate the first descendant of `node` named `tag` whose attributes
/// satisfy `attrs`. A miss is logged and returned as
/// [`ScrapeError::TagNotFound`].
pub fn find_tag<'a>(
    node: ElementRef<'a>,
    tag: &str,
    attrs: Attrs<'_, '_>,
) -> Result<ElementRef<'a>, ScrapeError> {
    if let Some(found) = find_all(node, tag, attrs).next() {
        return Ok(found);
    }
    let err = ScrapeError::TagNotFound {
        node: describe_node(&node),
        tag: tag.to_string(),
        attrs: describe_attrs(attrs),
    };
    error!("{}", err);
    Err(err)
}

/// [`find_tag`] starting from the document root.
pub fn find_in_doc<'a>(
    doc: &'a Html,
    tag: &str,
    attrs: Attrs<'_, '_>,
) -> Result<ElementRef<'a>, ScrapeError> {
    let root = doc.root_element();
    if element_matches(&root, tag, attrs) {
        return Ok(root);
    }
    find_tag(root, tag, attrs)
}

/// All text nodes under `el`, concatenated.
pub fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect()
}

/// Required `href` of an anchor; a missing one is a structural absence.
pub fn href_of<'a>(el: &ElementRef<'a>) -> Result<&'a str, ScrapeError> {
    el.value().attr("href").ok_or_else(|| {
        let err = ScrapeError::TagNotFound {
            node: describe_node(el),
            tag: el.value().name().to_string(),
            attrs: "{href=*}".to_string(),
        };
        error!("{}", err);
        err
    })
}
