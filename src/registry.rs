//! Persistent stem → identifier registry.
//!
//! Identifiers are assigned lazily the first time a stem is resolved and are
//! never reassigned. The registry is loaded once per run and saved once at the
//! end; it is the only source used to resolve intra-corpus links.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Opaque, stable document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn generate() -> Self {
        Identifier(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Identifier(s.to_string())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
pub struct IdRegistry {
    ids: BTreeMap<String, Identifier>,
    created: usize,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a `stem,identifier` CSV. A missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No id map at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(e) => return Err(Error::io(path, e)),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut ids = BTreeMap::new();
        for (line, record) in reader.byte_records().enumerate() {
            let record = record.map_err(|e| Error::csv(path, e))?;
            let field = |i: usize| record.get(i).and_then(|f| std::str::from_utf8(f).ok());
            match (field(0), field(1)) {
                (Some(stem), Some(id)) if !stem.is_empty() && !id.is_empty() => {
                    ids.insert(stem.to_string(), Identifier::from(id));
                }
                _ => warn!("Skipping malformed id map row {} in {}", line + 1, path.display()),
            }
        }

        info!("Loaded {} identifiers from {}", ids.len(), path.display());
        Ok(IdRegistry { ids, created: 0 })
    }

    /// Rewrite the whole map, sorted by stem.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path).map_err(|e| Error::csv(path, e))?;
        for (stem, id) in &self.ids {
            writer
                .write_record([stem.as_str(), id.as_str()])
                .map_err(|e| Error::csv(path, e))?;
        }
        writer.flush().map_err(|e| Error::io(path, e))?;
        Ok(())
    }

    /// Existing identifier for `stem`, or a freshly generated one.
    pub fn resolve(&mut self, stem: &str) -> Identifier {
        if let Some(id) = self.ids.get(stem) {
            return id.clone();
        }
        let id = Identifier::generate();
        self.ids.insert(stem.to_string(), id.clone());
        self.created += 1;
        id
    }

    /// Read-only lookup used for link resolution. Never assigns.
    pub fn lookup(&self, stem: &str) -> Option<&Identifier> {
        self.ids.get(stem)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Identifiers assigned since load.
    pub fn created(&self) -> usize {
        self.created
    }
}
