// Read-only location directory, loaded once at startup.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use newsmap_common::{Location, NewsMapError};

/// Immutable id→location lookup backed by the static dataset.
/// Shared across all sessions via `Arc`; never mutated after load.
pub struct LocationDirectory {
    locations: Vec<Location>,
    by_id: HashMap<String, usize>,
}

impl LocationDirectory {
    pub fn new(locations: Vec<Location>) -> Self {
        let by_id = locations
            .iter()
            .enumerate()
            .map(|(i, loc)| (loc.location_id.clone(), i))
            .collect();
        Self { locations, by_id }
    }

    /// Load the directory from a JSON dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NewsMapError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| NewsMapError::Dataset(format!("{}: {e}", path.display())))?;
        let locations: Vec<Location> = serde_json::from_str(&raw)
            .map_err(|e| NewsMapError::Dataset(format!("{}: {e}", path.display())))?;

        info!(count = locations.len(), path = %path.display(), "Loaded location dataset");
        Ok(Self::new(locations))
    }

    pub fn lookup(&self, location_id: &str) -> Option<&Location> {
        self.by_id.get(location_id).map(|&i| &self.locations[i])
    }

    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
