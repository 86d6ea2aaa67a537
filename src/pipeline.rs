//! Batch loops for the two output variants.
//!
//! Parsing runs in parallel chunks. Identifier assignment, link resolution
//! and writes stay on the calling thread in discovery order, so the registry
//! sees exactly the sequence a one-document-at-a-time run would produce.

use std::io;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::buckets::{self, Buckets};
use crate::corpus::{self, SourceDoc};
use crate::output;
use crate::parser::{self, links::LinkPolicy};
use crate::record::{ContentElement, DocumentRecord};
use crate::registry::IdRegistry;
use crate::settings::Settings;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ConvertCounts {
    pub converted: usize,
    pub failed: usize,
    pub new_ids: usize,
}

impl ConvertCounts {
    pub fn print(&self) {
        println!(
            "Converted {} documents ({} failed), {} new identifiers.",
            self.converted, self.failed, self.new_ids,
        );
    }
}

pub struct BundleRun {
    pub buckets: Buckets,
    pub failed: usize,
}

impl BundleRun {
    pub fn print(&self) {
        println!(
            "Bundled {} documents ({} failed).",
            self.buckets.total(),
            self.failed
        );
        for (bucket, records) in self.buckets.iter() {
            println!("  {:<12} {:>6}", bucket.name(), records.len());
        }
    }
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn parse_chunk(chunk: &[SourceDoc]) -> Vec<io::Result<Vec<ContentElement>>> {
    chunk
        .par_iter()
        .map(|doc| corpus::read_html(&doc.path).map(|html| parser::parse_document(&html)))
        .collect()
}

/// Per-document JSON: each record carries an identifier and only links that
/// resolve against the registry at the time the document is reached.
pub fn convert_documents(
    docs: &[SourceDoc],
    registry: &mut IdRegistry,
    settings: &Settings,
) -> Result<ConvertCounts> {
    output::ensure_dir(&settings.json_output_dir)?;

    let pb = progress_bar(docs.len())?;
    let mut counts = ConvertCounts::default();
    let created_before = registry.created();

    for chunk in docs.chunks(settings.chunk_size) {
        for (doc, parsed) in chunk.iter().zip(parse_chunk(chunk)) {
            pb.inc(1);
            let content = match parsed {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read {}: {}", doc.relative, e);
                    counts.failed += 1;
                    continue;
                }
            };

            let id = registry.resolve(&doc.stem);
            let content = parser::settle_links(content, &LinkPolicy::Resolve(&*registry));
            let record = DocumentRecord {
                id: Some(id),
                title: doc.stem.clone(),
                content,
                source_file: doc.relative.clone(),
                version: Some(settings.version.clone()),
                source_type: settings.source_type,
            };

            output::write_record_json(&settings.json_output_dir, &record)
                .with_context(|| format!("Failed to write record for {}", doc.relative))?;
            counts.converted += 1;
        }
    }

    pb.finish_and_clear();
    counts.new_ids = registry.created() - created_before;
    info!(
        converted = counts.converted,
        failed = counts.failed,
        new_ids = counts.new_ids,
        "JSON conversion complete"
    );
    Ok(counts)
}

/// Bucketed NDJSON: no identifiers, raw hrefs kept. Records stay in memory
/// until `flush_buckets`.
pub fn bundle_documents(docs: &[SourceDoc], settings: &Settings) -> Result<BundleRun> {
    let pb = progress_bar(docs.len())?;
    let mut run = BundleRun {
        buckets: Buckets::new(),
        failed: 0,
    };

    for chunk in docs.chunks(settings.chunk_size) {
        for (doc, parsed) in chunk.iter().zip(parse_chunk(chunk)) {
            pb.inc(1);
            let content = match parsed {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read {}: {}", doc.relative, e);
                    run.failed += 1;
                    continue;
                }
            };

            let record = DocumentRecord {
                id: None,
                title: doc.stem.clone(),
                content: parser::settle_links(content, &LinkPolicy::KeepRaw),
                source_file: doc.relative.clone(),
                version: None,
                source_type: settings.source_type,
            };
            let bucket = buckets::classify(&doc.relative, &settings.nested_root);
            run.buckets.push(bucket, record);
        }
    }

    pb.finish_and_clear();
    info!(
        bundled = run.buckets.total(),
        failed = run.failed,
        "NDJSON bundling complete"
    );
    Ok(run)
}

pub fn flush_buckets(buckets: &Buckets, settings: &Settings) -> Result<()> {
    let dir = &settings.ndjson_output_dir;
    output::ensure_dir(dir)?;
    for (bucket, records) in buckets.iter() {
        let path = output::write_bucket(dir, bucket, records)
            .with_context(|| format!("Failed to write bucket {}", bucket.name()))?;
        info!("Wrote {} records to {}", records.len(), path.display());
    }
    Ok(())
}
