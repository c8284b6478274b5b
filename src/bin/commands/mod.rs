use std::fs::File;
use std::io::{self as stdio, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use is_terminal::IsTerminal;
use log::error;

pub mod histogram;
pub mod run;
pub mod table;
pub mod threshold;

/// Initializes `env_logger`; each `-v` raises the default level, `RUST_LOG` still wins.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Wraps long-running operations with a spinner rendered to stderr.
pub fn run_with_spinner<T, F>(message: &str, work: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let spinner = ProgressBar::with_draw_target(None, stderr_target());
    let style = ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    let result = work();

    match &result {
        Ok(_) => spinner.finish_with_message(format!("{} ✓", message)),
        Err(_) => spinner.abandon_with_message(format!("{} ✗", message)),
    }

    result
}

/// Progress bar over `total` work units, drawn only when stderr is a terminal.
pub fn unit_progress(total: usize) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(total as u64), stderr_target());
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} units ({msg})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=>-");
    bar.set_style(style);
    bar.set_message("0 failed");
    bar
}

fn stderr_target() -> ProgressDrawTarget {
    if stdio::stderr().is_terminal() {
        ProgressDrawTarget::stderr()
    } else {
        ProgressDrawTarget::hidden()
    }
}

/// Opens an output file produced by `hbdist run` for buffered reading.
pub fn open_records(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open output file {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Output prefix for a tabulated input: explicit when one input is given, else the input stem.
pub fn output_prefix(input: &Path, explicit: Option<&Path>, suffix: &str) -> PathBuf {
    match explicit {
        Some(prefix) => prefix.to_path_buf(),
        None => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "hbdist".to_string());
            input.with_file_name(format!("{stem}{suffix}"))
        }
    }
}

/// Runs `work` once per input, logging failures and continuing with the remaining files.
///
/// Fails after all inputs were attempted when at least one of them failed.
pub fn for_each_input<F>(inputs: &[PathBuf], mut work: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    let mut failed = 0;
    for input in inputs {
        if let Err(e) = work(input) {
            error!("{}: {:#}", input.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} input files could not be tabulated", failed, inputs.len());
    }
    Ok(())
}

pub fn print_boxed_label<W: Write>(writer: &mut W, title: &str) -> stdio::Result<()> {
    let inner = format!(" {title} ");
    let width = inner.chars().count();
    writeln!(writer, "╭{}╮", "─".repeat(width))?;
    writeln!(writer, "│{}│", inner)?;
    writeln!(writer, "╰{}╯", "─".repeat(width))?;
    Ok(())
}
