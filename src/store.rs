//! Publication list persistence.
//!
//! The most recent search result is mirrored to a single JSON file. Each
//! save fully overwrites the previous content — no merge, no history, and
//! no locking (concurrent searches racing to write is accepted behavior).

use crate::error::Result;
use crate::profile::Publication;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default store path, relative to the working directory
pub const DEFAULT_STORE_PATH: &str = "publications.json";

/// File-backed sink for the latest publication list.
pub struct PublicationStore {
    path: PathBuf,
}

impl PublicationStore {
    /// Create a store at a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the store file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the store with the given publication list.
    ///
    /// Writes a 4-space-indented JSON array; non-ASCII characters are
    /// written literally rather than `\u`-escaped. An empty list still
    /// produces a file containing `[]`.
    pub fn save(&self, publications: &[Publication]) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        publications.serialize(&mut serializer)?;
        std::fs::write(&self.path, buf)?;
        info!(path = %self.path.display(), count = publications.len(), "Saved publications");
        Ok(())
    }

    /// Read the stored publication list back.
    pub fn load(&self) -> Result<Vec<Publication>> {
        debug!(path = %self.path.display(), "Loading publications");
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for PublicationStore {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample(title: &str) -> Publication {
        Publication {
            title: title.to_string(),
            authors: "Ada Lovelace, Charles Babbage".to_string(),
            year: "1843".to_string(),
            link: "https://example.org/notes".to_string(),
            kind: "Journal Articles".to_string(),
            description: "Notes on the analytical engine".to_string(),
        }
    }

    #[test]
    fn test_round_trip() -> Result<()> {
        let temp = NamedTempFile::new()?;
        let store = PublicationStore::with_path(temp.path().to_path_buf());

        let publications = vec![sample("Paper A"), sample("Paper B")];
        store.save(&publications)?;

        let loaded = store.load()?;
        assert_eq!(loaded, publications);
        Ok(())
    }

    #[test]
    fn test_empty_list_writes_empty_array() -> Result<()> {
        let temp = NamedTempFile::new()?;
        let store = PublicationStore::with_path(temp.path().to_path_buf());

        store.save(&[])?;
        let content = std::fs::read_to_string(store.path())?;
        assert_eq!(content, "[]");
        Ok(())
    }

    #[test]
    fn test_save_overwrites_prior_content() -> Result<()> {
        let temp = NamedTempFile::new()?;
        let store = PublicationStore::with_path(temp.path().to_path_buf());

        store.save(&[sample("Paper A"), sample("Paper B")])?;
        store.save(&[sample("Paper C")])?;

        let loaded = store.load()?;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Paper C");
        Ok(())
    }

    #[test]
    fn test_json_keys_and_indentation() -> Result<()> {
        let temp = NamedTempFile::new()?;
        let store = PublicationStore::with_path(temp.path().to_path_buf());

        store.save(&[sample("Paper A")])?;
        let content = std::fs::read_to_string(store.path())?;
        assert!(content.contains("    \"Title\": \"Paper A\""));
        assert!(content.contains("\"Authors\""));
        assert!(content.contains("\"Year\""));
        assert!(content.contains("\"Link\""));
        assert!(content.contains("\"Type\""));
        assert!(content.contains("\"Description\""));
        Ok(())
    }

    #[test]
    fn test_non_ascii_written_literally() -> Result<()> {
        let temp = NamedTempFile::new()?;
        let store = PublicationStore::with_path(temp.path().to_path_buf());

        let mut publication = sample("Über Widgets");
        publication.authors = "René Descartes".to_string();
        store.save(&[publication])?;

        let content = std::fs::read_to_string(store.path())?;
        assert!(content.contains("Über Widgets"));
        assert!(content.contains("René Descartes"));
        assert!(!content.contains("\\u"));
        Ok(())
    }
}
