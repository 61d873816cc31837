use std::{collections::BTreeMap, fs, io, path::PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::resolver::IdentifierKind;

/// `{kind: {"YYYY-MM-DD": count}}`
type Counts = BTreeMap<String, BTreeMap<String, u64>>;

/// Daily per-kind lookup counts kept in a JSON file.
///
/// Counting only happens when the file already exists, so a deployment opts in by creating it.
/// Updates are a plain read-modify-write with no locking.
pub struct UsageCounter {
    path: PathBuf,
}

impl UsageCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        UsageCounter { path: path.into() }
    }

    /// Bump the count for `kind` on `date`. Returns `false` when counting is disabled.
    pub fn record(&self, kind: IdentifierKind, date: NaiveDate) -> anyhow::Result<bool> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "usage counter disabled");
                return Ok(false);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read {}", self.path.display()));
            }
        };

        let mut counts: Counts = if raw.trim().is_empty() {
            Counts::new()
        } else {
            serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "resetting unreadable usage counter");
                Counts::new()
            })
        };

        *counts
            .entry(kind.as_str().to_string())
            .or_default()
            .entry(date.format("%Y-%m-%d").to_string())
            .or_default() += 1;

        let out = serde_json::to_string(&counts)?;
        fs::write(&self.path, out)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(true)
    }
}
