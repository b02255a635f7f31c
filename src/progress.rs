// src/progress.rs

use indicatif::{ProgressBar, ProgressBarIter, ProgressFinish, ProgressIterator, ProgressStyle};

const TEMPLATE: &str = "{msg}: {percent:>3}%|{wide_bar:.cyan/blue}| {pos}/{len}{prefix} [{elapsed_precise}<{eta_precise}]";

fn bar(len: usize, desc: &str, unit: &str, finish: ProgressFinish) -> ProgressBar {
    let pb = ProgressBar::new(len as u64).with_finish(finish);
    pb.set_style(ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar()));
    pb.set_message(desc.to_string());
    pb.set_prefix(format!(" {}", unit));
    pb
}

/// Wrap an iteration in a stderr progress bar that stays on screen when done.
/// Nothing is drawn when stderr is not a terminal.
pub fn track<I>(items: I, desc: &str, unit: &str) -> ProgressBarIter<I::IntoIter>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
{
    let iter = items.into_iter();
    let pb = bar(iter.len(), desc, unit, ProgressFinish::AndLeave);
    iter.progress_with(pb)
}

/// Like [`track`], but the bar is cleared once the iteration ends.
pub fn track_transient<I>(items: I, desc: &str, unit: &str) -> ProgressBarIter<I::IntoIter>
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
{
    let iter = items.into_iter();
    let pb = bar(iter.len(), desc, unit, ProgressFinish::AndClear);
    iter.progress_with(pb)
}
