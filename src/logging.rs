// src/logging.rs

use anyhow::Result;
use chrono::Local;
use file_rotate::{compression::Compression, suffix::AppendCount, ContentLimit, FileRotate};
use std::{fmt, sync::Mutex};
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{
        format::{self, FormatEvent, FormatFields},
        FmtContext,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{ensure_dir, Config};

pub const LOG_DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";
pub const LOG_MAX_BYTES: usize = 1 << 20;
pub const LOG_BACKUPS: usize = 5;

/// `timestamp - [LEVEL] - message` lines, shared by console and file output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - [{}] - ",
            Local::now().format(LOG_DATETIME_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber: stderr plus `logs/parser.log`, rotated at
/// 1 MiB with five numbered backups. Filter comes from `RUST_LOG`, default `info`.
pub fn init(config: &Config) -> Result<()> {
    ensure_dir(&config.logs_dir())?;
    let rotating = FileRotate::new(
        config.log_file(),
        AppendCount::new(LOG_BACKUPS),
        ContentLimit::Bytes(LOG_MAX_BYTES),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(std::io::stderr);
    let file = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_ansi(false)
        .with_writer(Mutex::new(rotating));

    tracing_subscriber::registry()
        .with(env)
        .with(console)
        .with(file)
        .try_init()?;
    Ok(())
}
