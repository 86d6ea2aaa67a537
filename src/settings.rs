use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::record::SourceType;

pub const DEFAULT_CONFIG_FILE: &str = "chm2json.toml";
const ENV_PREFIX: &str = "CHM2JSON";

/// Run configuration: defaults, then the optional config file, then
/// `CHM2JSON_*` environment variables. CLI flags are applied on top by the
/// caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the extracted help tree.
    pub root: PathBuf,
    pub json_output_dir: PathBuf,
    pub ndjson_output_dir: PathBuf,
    /// `filename|path` report of every image occurrence.
    pub duplicates_file: PathBuf,
    pub alias_map_file: PathBuf,
    pub id_map_file: PathBuf,
    pub source_type: SourceType,
    pub version: String,
    /// Folders under `root` walked by the bundle pipeline.
    pub targets: Vec<String>,
    /// Target folder whose leftovers go to the Nested_CNC bucket.
    pub nested_root: String,
    pub extensions: Vec<String>,
    pub chunk_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            root: PathBuf::from("data/HTML_Extracted"),
            json_output_dir: PathBuf::from("data/JSON_Converted"),
            ndjson_output_dir: PathBuf::from("data/NDJSON_Bundles"),
            duplicates_file: PathBuf::from("data/Metadata/duplicates_in_index.txt"),
            alias_map_file: PathBuf::from("data/Metadata/alias_map.csv"),
            id_map_file: PathBuf::from("data/Metadata/uuid_map.csv"),
            source_type: SourceType::HelpFile,
            version: "2024".to_string(),
            targets: vec!["CVEnglish".to_string(), "NCEnglish".to_string()],
            nested_root: "NCEnglish".to_string(),
            extensions: vec!["htm".to_string()],
            chunk_size: 500,
        }
    }
}

impl Settings {
    /// `path` must exist when given explicitly; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("targets")
                    .with_list_parse_key("extensions"),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(settings.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.chunk_size = self.chunk_size.max(1);
        for ext in &mut self.extensions {
            *ext = ext.trim_start_matches('.').to_ascii_lowercase();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let s = Settings::default().sanitized();
        assert_eq!(s.version, "2024");
        assert_eq!(s.source_type, SourceType::HelpFile);
        assert_eq!(s.targets, vec!["CVEnglish", "NCEnglish"]);
        assert_eq!(s.chunk_size, 500);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chm2json.toml");
        std::fs::write(
            &path,
            "root = \"/srv/help\"\nsource_type = \"user_forum\"\nextensions = [\".HTM\", \"html\"]\nchunk_size = 0\n",
        )
        .unwrap();

        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.root, PathBuf::from("/srv/help"));
        assert_eq!(s.source_type, SourceType::UserForum);
        assert_eq!(s.extensions, vec!["htm", "html"]);
        assert_eq!(s.chunk_size, 1);
        // Untouched keys keep their defaults.
        assert_eq!(s.nested_root, "NCEnglish");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
