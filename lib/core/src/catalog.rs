use crate::{text, Error, Result, Track};
use ahash::AHashMap;
use std::path::Path;
use tracing::info;

/// Minimum fuzzy score for a track to count as a search hit
const SEARCH_THRESHOLD: f64 = 0.6;

/// An in-memory, read-only track catalog.
///
/// `Catalog::default()` is the unloaded state; [`Catalog::load`] and
/// [`Catalog::from_tracks`] produce a loaded catalog. Track order is the
/// load order and is stable for the catalog's lifetime.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    by_id: AHashMap<String, usize>,
    loaded: bool,
}

impl Catalog {
    /// Build a loaded catalog from tracks already in memory.
    ///
    /// When several tracks share an identifier, lookups return the first.
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let mut by_id = AHashMap::with_capacity(tracks.len());
        for (index, track) in tracks.iter().enumerate() {
            by_id.entry(track.id.clone()).or_insert(index);
        }
        Self {
            tracks,
            by_id,
            loaded: true,
        }
    }

    /// Load tracks from a JSON array (`.json`) or JSON Lines
    /// (`.jsonl` / `.ndjson`) file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let is_lines = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson"))
            .unwrap_or(false);

        let tracks = if is_lines {
            parse_json_lines(&contents)?
        } else {
            serde_json::from_str::<Vec<Track>>(&contents)
                .map_err(|e| Error::Serialization(format!("{}: {}", path.display(), e)))?
        };

        let catalog = Self::from_tracks(tracks);
        info!(
            "Loaded {} tracks across {} genres from {:?}",
            catalog.len(),
            catalog.genres().len(),
            path
        );
        Ok(catalog)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Get a track by its identifier
    pub fn get(&self, id: &str) -> Option<&Track> {
        self.by_id.get(id).map(|&index| &self.tracks[index])
    }

    /// Like [`Catalog::get`] but fails with [`Error::TrackNotFound`]
    pub fn require(&self, id: &str) -> Result<&Track> {
        if !self.loaded {
            return Err(Error::CatalogNotLoaded);
        }
        self.get(id).ok_or_else(|| Error::TrackNotFound(id.to_string()))
    }

    /// Distinct genre labels, sorted
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self.tracks.iter().map(|t| t.genre.clone()).collect();
        genres.sort();
        genres.dedup();
        genres
    }

    /// Fuzzy search over "name artists".
    ///
    /// Returns at most `limit` tracks ordered by match score, best first;
    /// equal scores keep catalog order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Track> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<(f64, &Track)> = self
            .tracks
            .iter()
            .filter_map(|track| {
                let haystack = format!("{} {}", track.name, track.artists);
                let score = text::match_score(query, &haystack);
                (score > SEARCH_THRESHOLD).then_some((score, track))
            })
            .collect();

        hits.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        hits.into_iter().map(|(_, track)| track).collect()
    }
}

fn parse_json_lines(contents: &str) -> Result<Vec<Track>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str::<Track>(line)
                .map_err(|e| Error::Serialization(format!("line {}: {}", number + 1, e)))
        })
        .collect()
}
