use thiserror::Error;

/// Page-structure failures. Any of these means the site layout changed
/// and the current mode cannot produce meaningful output.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("tag <{tag}> with attrs {attrs} not found inside {node}")]
    TagNotFound {
        node: String,
        tag: String,
        attrs: String,
    },

    #[error("no sidebar list mentions \"All versions\"")]
    VersionListMissing,

    #[error("malformed PEP index row: {0}")]
    MalformedIndexRow(String),
}
