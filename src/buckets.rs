//! Topic buckets for the NDJSON pipeline.

use std::collections::HashMap;

use crate::record::DocumentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Basics,
    Parts,
    Assemblies,
    Jobs,
    Tips,
    NestedCnc,
    General,
}

impl Bucket {
    /// Flush order.
    pub const ALL: [Bucket; 7] = [
        Bucket::Basics,
        Bucket::Parts,
        Bucket::Assemblies,
        Bucket::Jobs,
        Bucket::Tips,
        Bucket::NestedCnc,
        Bucket::General,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Bucket::Basics => "Basics",
            Bucket::Parts => "Parts",
            Bucket::Assemblies => "Assemblies",
            Bucket::Jobs => "Jobs",
            Bucket::Tips => "Tips",
            Bucket::NestedCnc => "Nested_CNC",
            Bucket::General => "General",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.ndjson", self.name().to_lowercase())
    }
}

/// First matching path fragment wins; `nested_root` is the secondary target
/// folder whose documents fall into `Nested_CNC` when nothing else matched.
pub fn classify(relative_path: &str, nested_root: &str) -> Bucket {
    let has = |needle: &str| relative_path.contains(needle);

    if has("Part_Level") {
        Bucket::Parts
    } else if has("Assembly_Level") {
        Bucket::Assemblies
    } else if has("Job_Level") {
        Bucket::Jobs
    } else if has("System_Level") || has("Introduction") || has("Room_Level") {
        Bucket::Basics
    } else if has("Tips_Tricks_FAQs") {
        Bucket::Tips
    } else if !nested_root.is_empty() && has(nested_root) {
        Bucket::NestedCnc
    } else {
        Bucket::General
    }
}

/// In-memory accumulators, flushed once at the end of a run.
#[derive(Debug, Default)]
pub struct Buckets {
    records: HashMap<Bucket, Vec<DocumentRecord>>,
}

impl Buckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bucket: Bucket, record: DocumentRecord) {
        self.records.entry(bucket).or_default().push(record);
    }

    pub fn get(&self, bucket: Bucket) -> &[DocumentRecord] {
        self.records.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Every bucket in flush order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &[DocumentRecord])> {
        Bucket::ALL.into_iter().map(move |b| (b, self.get(b)))
    }
}
