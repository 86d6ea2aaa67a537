//! Image alias map built from the duplicate report.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{Error, Result};

static REPORT_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^|]*)\|([^|]*)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAlias {
    pub filename: String,
    pub path: String,
}

#[derive(Debug, Default)]
pub struct AliasMap {
    /// Canonical entries in first-seen order.
    pub canonical: Vec<ImageAlias>,
    /// Filenames seen more than once.
    pub duplicates: BTreeSet<String>,
    pub skipped_lines: usize,
}

/// Build the alias map from report text, one `filename|path` per line.
/// The first path seen for a filename wins.
pub fn build_alias_map(report: &str) -> AliasMap {
    let mut map = AliasMap::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (i, raw) in report.lines().enumerate() {
        let line = raw.trim();
        let Some(caps) = REPORT_LINE_RE.captures(line) else {
            debug!("Skipping malformed report line {}: {:?}", i + 1, line);
            map.skipped_lines += 1;
            continue;
        };
        let filename = &caps[1];
        if seen.insert(filename.to_string()) {
            map.canonical.push(ImageAlias {
                filename: filename.to_string(),
                path: caps[2].to_string(),
            });
        } else {
            map.duplicates.insert(filename.to_string());
        }
    }

    map
}

/// Write canonical entries as `filename,path` rows.
pub fn write_alias_map(map: &AliasMap, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| Error::csv(path, e))?;
    for alias in &map.canonical {
        writer
            .write_record([alias.filename.as_str(), alias.path.as_str()])
            .map_err(|e| Error::csv(path, e))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    Ok(())
}

/// Read the report, write the alias map, and log the counts.
pub fn deduplicate(report_path: &Path, alias_map_path: &Path) -> Result<AliasMap> {
    let bytes = fs::read(report_path).map_err(|e| Error::io(report_path, e))?;
    let report = String::from_utf8_lossy(&bytes);
    let map = build_alias_map(&report);
    write_alias_map(&map, alias_map_path)?;
    info!(
        unique = map.canonical.len(),
        duplicates = map.duplicates.len(),
        skipped = map.skipped_lines,
        "Image deduplication complete"
    );
    Ok(map)
}
