pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod html;
pub mod logging;
pub mod output;
pub mod progress;

pub use config::Config;
pub use error::ScrapeError;
pub use extract::{Mode, Outcome, ResultSet};
pub use output::OutputFormat;
