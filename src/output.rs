// src/output.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use prettytable::{format::Alignment, Cell, Row, Table};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;

use crate::{
    config::{ensure_dir, Config},
    extract::{Mode, ResultSet},
};

pub const RESULTS_DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Extra output targets. Without one, rows are printed plainly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table on stdout
    Pretty,
    /// CSV file under `results/`
    File,
}

/// Send `results` wherever `format` says.
pub fn render(
    results: &ResultSet,
    format: Option<OutputFormat>,
    mode: Mode,
    config: &Config,
) -> Result<()> {
    match format {
        Some(OutputFormat::Pretty) => {
            pretty_table(results).printstd();
        }
        Some(OutputFormat::File) => {
            file_output(results, mode, &config.results_dir(), Local::now())?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            default_output(results, &mut stdout)?;
        }
    }
    Ok(())
}

/// One line per row, header first, fields separated by a space.
pub fn default_output<W: Write>(results: &ResultSet, out: &mut W) -> Result<()> {
    for row in results.all_rows() {
        writeln!(out, "{}", row.join(" "))?;
    }
    Ok(())
}

pub fn pretty_table(results: &ResultSet) -> Table {
    let left = |text: &String| Cell::new_align(text, Alignment::LEFT);
    let mut table = Table::new();
    table.set_titles(Row::new(results.header().iter().map(left).collect()));
    for row in results.rows() {
        table.add_row(Row::new(row.iter().map(left).collect()));
    }
    table
}

/// Header and rows as unix-style CSV: LF endings, minimal quoting.
pub fn write_csv<W: Write>(results: &ResultSet, out: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(out);
    for row in results.all_rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `results/{mode}_{timestamp}.csv` and return its path.
pub fn file_output(
    results: &ResultSet,
    mode: Mode,
    results_dir: &Path,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    ensure_dir(results_dir)?;
    let path = results_dir.join(format!("{}_{}.csv", mode, now.format(RESULTS_DATETIME_FORMAT)));
    let file = File::create(&path).with_context(|| format!("creating {:?}", &path))?;
    write_csv(results, file).with_context(|| format!("writing {:?}", &path))?;
    info!("results saved: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use csv::ReaderBuilder;
    use tempfile::tempdir;

    fn sample() -> ResultSet {
        let mut rs = ResultSet::new(["Article link", "Title", "Editor, Author"]);
        rs.push([
            "https://docs.python.org/3/whatsnew/3.12.html",
            "What's New In Python 3.12",
            "Editor Adam Turner",
        ])
        .unwrap();
        rs.push(["https://x/", "Quote \"this\"", "Line\nbreak, comma"])
            .unwrap();
        rs
    }

    #[test]
    fn test_default_output_lines() {
        let mut rs = ResultSet::new(["Status", "Count"]);
        rs.push(["Final", "2"]).unwrap();
        rs.push(["Total", "2"]).unwrap();
        let mut buf = Vec::new();
        default_output(&rs, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Status Count\nFinal 2\nTotal 2\n");
    }

    #[test]
    fn test_csv_round_trip() {
        let tmp = tempdir().unwrap();
        let rs = sample();
        let now = Local.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
        let path = file_output(&rs, Mode::WhatsNew, &tmp.path().join("results"), now).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "whats-new_2024-05-17_09-30-00.csv"
        );

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("Article link,Title,\"Editor, Author\"\n"));
        assert!(!raw.contains("\r\n"));

        let mut reader = ReaderBuilder::new().has_headers(false).from_path(&path).unwrap();
        let back: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        let expected: Vec<Vec<String>> = rs.all_rows().map(<[String]>::to_vec).collect();
        assert_eq!(back, expected);
    }

    #[test]
    fn test_pretty_table_shape() {
        let table = pretty_table(&sample());
        assert_eq!(table.len(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Editor, Author"));
        assert!(rendered.contains("What's New In Python 3.12"));
    }
}
