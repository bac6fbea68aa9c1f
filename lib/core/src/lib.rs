//! # mixwheel Core
//!
//! Core data structures for the mixwheel DJ recommendation engine.
//!
//! - [`Track`] - An immutable catalog track with typed audio features
//! - [`Catalog`] - Loaded, read-only track collection with lookup and fuzzy search
//! - [`HarmonicKey`] - Position on the harmonic wheel and key compatibility
//!
//! ## Example
//!
//! ```rust
//! use mixwheel_core::{harmonic_similarity, to_harmonic_key};
//!
//! let c_major = to_harmonic_key(0, 1);
//! let a_minor = to_harmonic_key(9, 0);
//! assert_eq!(c_major.to_string(), "8B");
//! assert_eq!(harmonic_similarity(&c_major, &a_minor), 0.95);
//! ```

pub mod catalog;
pub mod error;
pub mod key;
pub mod text;
pub mod track;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use key::{harmonic_similarity, musical_key_name, to_harmonic_key, HarmonicKey, KeyMode};
pub use track::{AudioFeature, Track, DEFAULT_FEATURE_VALUE};
