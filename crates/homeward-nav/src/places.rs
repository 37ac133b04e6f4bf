//! Personal location database: one `<name> <coordinates>` per line.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::FatalError;
use crate::resolve;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLocation {
    pub name: String,
    pub coords: String,
}

#[derive(Debug, Clone, Default)]
pub struct Places {
    entries: Vec<StoredLocation>,
}

impl Places {
    pub fn load(path: &Path) -> Result<Self, FatalError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| FatalError::PlacesUnreadable { path: path.to_path_buf(), source })?;
        let places = Self::parse(path, &text)?;
        debug!("places: loaded {} entries from {}", places.entries.len(), path.display());
        Ok(places)
    }

    /// Blank lines and `#` comments are skipped. Every other line must carry a
    /// name and coordinate text that [`resolve::resolve`] accepts.
    pub fn parse(path: &Path, text: &str) -> Result<Self, FatalError> {
        let mut entries = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') { continue; }

            let bad = || FatalError::BadPlacesLine { path: PathBuf::from(path), line: i + 1, text: line.to_string() };
            let (name, coords) = line.split_once(char::is_whitespace).ok_or_else(bad)?;
            let coords = coords.trim();
            if resolve::resolve(coords).is_none() {
                return Err(bad());
            }
            entries.push(StoredLocation { name: name.to_string(), coords: coords.to_string() });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[StoredLocation] {
        &self.entries
    }

    /// Case-insensitive substring match on the name; exactly one entry must match.
    pub fn lookup(&self, fragment: &str) -> Result<&StoredLocation, FatalError> {
        let needle = fragment.trim().to_lowercase();
        let hits: Vec<&StoredLocation> = self
            .entries
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .collect();

        match hits.as_slice() {
            [] => Err(FatalError::NoMatch(fragment.to_string())),
            [one] => Ok(*one),
            many => Err(FatalError::MultipleMatches {
                query: fragment.to_string(),
                candidates: many.iter().map(|e| (*e).clone()).collect(),
            }),
        }
    }
}
