//! Genre similarity from audio feature centroids
//!
//! Fitting groups the catalog by genre, averages each tracked feature into
//! a centroid, standardizes the centroids per feature across genres and
//! stores the full pairwise Euclidean distance table.

use ahash::AHashMap;
use mixwheel_core::{AudioFeature, Catalog, Error, Result};
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Features that make up a genre profile
pub const GENRE_FEATURES: [AudioFeature; 9] = AudioFeature::ALL;

const DIM: usize = GENRE_FEATURES.len();

/// Number of closest features named in an explanation
const EXPLAINED_FEATURES: usize = 2;

/// Mean feature values for one genre
#[derive(Debug, Clone, PartialEq)]
pub struct GenreProfile {
    pub genre: String,
    pub track_count: usize,
    centroid: [f64; DIM],
}

impl GenreProfile {
    pub fn value(&self, feature: AudioFeature) -> f64 {
        let index = GENRE_FEATURES
            .iter()
            .position(|f| *f == feature)
            .unwrap_or_default();
        self.centroid[index]
    }
}

/// A neighbouring genre returned by [`GenreSimilarityModel::similar_genres`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreMatch {
    pub genre: String,
    pub distance: f64,
    pub explanation: String,
}

/// Fitted, immutable genre state
#[derive(Debug)]
pub struct GenreTable {
    genres: Vec<String>,
    index: AHashMap<String, usize>,
    profiles: Vec<GenreProfile>,
    normalized: Vec<[f64; DIM]>,
    distances: Vec<Vec<f64>>,
}

impl GenreTable {
    fn build(catalog: &Catalog) -> Self {
        let mut sums: AHashMap<&str, ([f64; DIM], usize)> = AHashMap::new();
        for track in catalog.tracks() {
            let entry = sums.entry(track.genre.as_str()).or_insert(([0.0; DIM], 0));
            for (slot, feature) in entry.0.iter_mut().zip(GENRE_FEATURES) {
                *slot += track.feature(feature);
            }
            entry.1 += 1;
        }

        let mut genres: Vec<String> = sums.keys().map(|g| g.to_string()).collect();
        genres.sort();

        let profiles: Vec<GenreProfile> = genres
            .iter()
            .map(|genre| {
                let (sum, count) = sums[genre.as_str()];
                GenreProfile {
                    genre: genre.clone(),
                    track_count: count,
                    centroid: sum.map(|total| total / count as f64),
                }
            })
            .collect();

        let normalized = standardize(&profiles);
        let distances = pairwise_distances(&normalized);
        let index = genres
            .iter()
            .enumerate()
            .map(|(i, genre)| (genre.clone(), i))
            .collect();

        Self {
            genres,
            index,
            profiles,
            normalized,
            distances,
        }
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.index.contains_key(genre)
    }

    fn position(&self, genre: &str) -> Result<usize> {
        self.index
            .get(genre)
            .copied()
            .ok_or_else(|| Error::GenreNotFound(genre.to_string()))
    }

    pub fn profile(&self, genre: &str) -> Result<&GenreProfile> {
        Ok(&self.profiles[self.position(genre)?])
    }

    /// Standardized centroid, zero mean and unit variance per feature
    pub fn normalized_profile(&self, genre: &str) -> Result<&[f64]> {
        Ok(&self.normalized[self.position(genre)?])
    }

    pub fn distance(&self, a: &str, b: &str) -> Result<f64> {
        Ok(self.distances[self.position(a)?][self.position(b)?])
    }

    /// The `k` closest other genres, nearest first; ties break by label.
    pub fn similar_genres(&self, genre: &str, k: usize) -> Result<Vec<GenreMatch>> {
        let row = self.position(genre)?;

        let mut neighbours: Vec<usize> = (0..self.genres.len()).filter(|&i| i != row).collect();
        neighbours.sort_by_key(|&i| (OrderedFloat(self.distances[row][i]), &self.genres[i]));
        neighbours.truncate(k);

        Ok(neighbours
            .into_iter()
            .map(|i| GenreMatch {
                genre: self.genres[i].clone(),
                distance: self.distances[row][i],
                explanation: explain(&self.profiles[row], &self.profiles[i]),
            })
            .collect())
    }
}

/// Z-score each feature column across genres. A column with no spread
/// maps to zero.
fn standardize(profiles: &[GenreProfile]) -> Vec<[f64; DIM]> {
    if profiles.is_empty() {
        return Vec::new();
    }
    let n = profiles.len() as f64;

    let mut mean = [0.0; DIM];
    for profile in profiles {
        for (m, v) in mean.iter_mut().zip(profile.centroid) {
            *m += v / n;
        }
    }

    let mut std_dev = [0.0; DIM];
    for profile in profiles {
        for ((s, v), m) in std_dev.iter_mut().zip(profile.centroid).zip(mean) {
            *s += (v - m).powi(2) / n;
        }
    }
    let std_dev = std_dev.map(|variance| {
        let s = variance.sqrt();
        if s > 0.0 {
            s
        } else {
            1.0
        }
    });

    profiles
        .iter()
        .map(|profile| {
            let mut row = [0.0; DIM];
            for i in 0..DIM {
                row[i] = (profile.centroid[i] - mean[i]) / std_dev[i];
            }
            row
        })
        .collect()
}

fn pairwise_distances(rows: &[[f64; DIM]]) -> Vec<Vec<f64>> {
    let n = rows.len();
    let mut table = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = rows[i]
                .iter()
                .zip(&rows[j])
                .map(|(a, b)| (a - b).powi(2))
                .sum::<f64>()
                .sqrt();
            table[i][j] = d;
            table[j][i] = d;
        }
    }
    table
}

/// Name the raw features on which two genres are closest,
/// e.g. "Similar tempo (120 vs 122 BPM) and loudness (-6.0 vs -6.2 dB)".
fn explain(query: &GenreProfile, other: &GenreProfile) -> String {
    let mut order: Vec<usize> = (0..DIM).collect();
    order.sort_by_key(|&i| OrderedFloat((query.centroid[i] - other.centroid[i]).abs()));

    let parts: Vec<String> = order
        .into_iter()
        .take(EXPLAINED_FEATURES)
        .map(|i| {
            let (a, b) = (query.centroid[i], other.centroid[i]);
            match GENRE_FEATURES[i] {
                AudioFeature::Tempo => format!("tempo ({:.0} vs {:.0} BPM)", a, b),
                AudioFeature::Loudness => format!("loudness ({:.1} vs {:.1} dB)", a, b),
                feature => format!("{} ({:.2} vs {:.2})", feature, a, b),
            }
        })
        .collect();

    format!("Similar {}", parts.join(" and "))
}

/// Genre similarity model.
///
/// Starts unfitted; [`fit`](GenreSimilarityModel::fit) builds a complete
/// [`GenreTable`] and swaps it in, so concurrent readers observe either the
/// previous table or the new one.
#[derive(Debug, Default)]
pub struct GenreSimilarityModel {
    state: RwLock<Option<Arc<GenreTable>>>,
}

impl GenreSimilarityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model and fit it in one step
    pub fn fitted(catalog: &Catalog) -> Result<Self> {
        let model = Self::new();
        model.fit(catalog)?;
        Ok(model)
    }

    pub fn fit(&self, catalog: &Catalog) -> Result<()> {
        if !catalog.is_loaded() {
            return Err(Error::CatalogNotLoaded);
        }
        let table = Arc::new(GenreTable::build(catalog));
        debug!(
            "Fitted genre similarity over {} genres from {} tracks",
            table.len(),
            catalog.len()
        );
        *self.state.write() = Some(table);
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        self.state.read().is_some()
    }

    /// Snapshot of the current fitted table
    pub fn table(&self) -> Result<Arc<GenreTable>> {
        self.state.read().clone().ok_or(Error::ModelNotFitted)
    }

    /// The `k` genres nearest to `genre`, excluding `genre` itself
    pub fn similar_genres(&self, genre: &str, k: usize) -> Result<Vec<GenreMatch>> {
        self.table()?.similar_genres(genre, k)
    }

    pub fn genres(&self) -> Result<Vec<String>> {
        Ok(self.table()?.genres().to_vec())
    }

    pub fn distance(&self, a: &str, b: &str) -> Result<f64> {
        self.table()?.distance(a, b)
    }

    pub fn profile(&self, genre: &str) -> Result<GenreProfile> {
        self.table()?.profile(genre).cloned()
    }
}
