//! Source discovery and lenient reading.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDoc {
    pub path: PathBuf,
    /// File name without extension; the document's natural key.
    pub stem: String,
    /// Path relative to the corpus root, `/`-separated.
    pub relative: String,
}

/// All files under `dir` whose extension is in `extensions`
/// (case-insensitive), sorted by path.
pub fn discover(root: &Path, dir: &Path, extensions: &[String]) -> Vec<SourceDoc> {
    let mut docs = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
            continue;
        }
        let path = entry.into_path();
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            debug!("Skipping non UTF-8 file name {}", path.display());
            continue;
        };
        let relative = relative_path(root, &path);
        docs.push(SourceDoc {
            path,
            stem,
            relative,
        });
    }

    docs
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|want| want.eq_ignore_ascii_case(e)))
}

fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Read a document, replacing invalid UTF-8 rather than failing.
pub fn read_html(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            debug!("Lossy decode of {}", path.display());
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn discovers_matching_extensions_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("CVEnglish/Part_Level/b.htm"), b"");
        touch(&root.join("CVEnglish/Part_Level/a.HTM"), b"");
        touch(&root.join("CVEnglish/images/a.gif"), b"");
        touch(&root.join("CVEnglish/notes.txt"), b"");

        let docs = discover(root, root, &["htm".to_string()]);
        let rel: Vec<_> = docs.iter().map(|d| d.relative.as_str()).collect();
        assert_eq!(rel, vec!["CVEnglish/Part_Level/a.HTM", "CVEnglish/Part_Level/b.htm"]);
        assert_eq!(docs[0].stem, "a");
    }

    #[test]
    fn relative_to_root_when_walking_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("NCEnglish/Nesting/sheet.htm"), b"");
        let docs = discover(root, &root.join("NCEnglish"), &["htm".to_string()]);
        assert_eq!(docs[0].relative, "NCEnglish/Nesting/sheet.htm");
    }

    #[test]
    fn missing_dir_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(dir.path(), &dir.path().join("absent"), &["htm".to_string()]).is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.htm");
        touch(&path, b"<p>caf\xe9</p>");
        let html = read_html(&path).unwrap();
        assert_eq!(html, "<p>caf\u{FFFD}</p>");
    }
}
