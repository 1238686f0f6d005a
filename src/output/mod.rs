// Workflow outputs: publishes the verdict for later workflow steps.
//
// Modern runners hand us a file via $GITHUB_OUTPUT to append `key=value`
// lines to. Older runners (and local runs) only understand the deprecated
// `::set-output` workflow command on stdout, so that stays as the fallback.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::moderation::policy::Verdict;

pub const KEY_IS_INAPPROPRIATE: &str = "is-inappropriate";
pub const KEY_FLAGGED_CATEGORIES: &str = "flagged-categories";
pub const KEY_MODERATION_RESULTS: &str = "moderation-results-json";

/// Where the run's outputs are published.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputSink {
    /// Append `key=value` lines to this file.
    File(PathBuf),
    /// Print `::set-output` commands to stdout.
    Legacy,
}

impl OutputSink {
    /// Pick the sink: the output file when configured, stdout otherwise.
    pub fn from_config(config: &Config) -> Self {
        match &config.output_path {
            Some(path) => OutputSink::File(path.clone()),
            None => OutputSink::Legacy,
        }
    }

    /// Publish the three output records.
    pub fn publish(&self, verdict: &Verdict, raw_body: &str) -> Result<()> {
        let records = output_records(verdict, raw_body);
        match self {
            OutputSink::File(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open output file {}", path.display()))?;
                write_records(&mut file, &records)
                    .with_context(|| format!("Failed to write outputs to {}", path.display()))?;
                debug!(path = %path.display(), "Outputs written");
            }
            OutputSink::Legacy => {
                info!("GITHUB_OUTPUT not set, falling back to ::set-output");
                let stdout = io::stdout();
                write_legacy(&mut stdout.lock(), &records)
                    .context("Failed to write outputs to stdout")?;
            }
        }
        Ok(())
    }
}

/// The three records in their fixed order.
pub fn output_records(verdict: &Verdict, raw_body: &str) -> [(&'static str, String); 3] {
    [
        (KEY_IS_INAPPROPRIATE, verdict.is_inappropriate.to_string()),
        (KEY_FLAGGED_CATEGORIES, verdict.flagged_categories.join(",")),
        (KEY_MODERATION_RESULTS, single_line(raw_body)),
    ]
}

/// Join a multi-line response body onto one line.
///
/// JSON string literals cannot contain raw line breaks, so dropping them
/// along with indentation leaves the document's content unchanged.
pub fn single_line(body: &str) -> String {
    if !body.contains(['\n', '\r']) {
        return body.to_string();
    }
    body.split(['\n', '\r']).map(str::trim).collect()
}

/// Write records as `key=value` lines.
pub fn write_records<W: Write>(out: &mut W, records: &[(&str, String)]) -> io::Result<()> {
    for (key, value) in records {
        writeln!(out, "{key}={value}")?;
    }
    out.flush()
}

/// Write records as legacy `::set-output` workflow commands.
pub fn write_legacy<W: Write>(out: &mut W, records: &[(&str, String)]) -> io::Result<()> {
    for (key, value) in records {
        writeln!(out, "::set-output name={key}::{value}")?;
    }
    out.flush()
}
