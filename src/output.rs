use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::buckets::Bucket;
use crate::error::{Error, Result};
use crate::record::DocumentRecord;

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Write `<title>.json` into `dir`, replacing any previous version.
pub fn write_record_json(dir: &Path, record: &DocumentRecord) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", record.title));
    let bytes = record
        .to_pretty_json()
        .map_err(|e| Error::json(&path, e))?;
    fs::write(&path, bytes).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}

/// One compact record per line.
pub fn write_bucket(dir: &Path, bucket: Bucket, records: &[DocumentRecord]) -> Result<PathBuf> {
    let path = dir.join(bucket.file_name());
    let file = File::create(&path).map_err(|e| Error::io(&path, e))?;
    let mut out = BufWriter::new(file);

    for record in records {
        let line = record
            .to_ndjson_line()
            .map_err(|e| Error::json(&path, e))?;
        writeln!(out, "{line}").map_err(|e| Error::io(&path, e))?;
    }
    out.flush().map_err(|e| Error::io(&path, e))?;
    Ok(path)
}
