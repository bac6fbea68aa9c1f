use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog must be loaded before use")]
    CatalogNotLoaded,

    #[error("Genre similarity model must be fitted before use")]
    ModelNotFitted,

    #[error("Genre '{0}' not found in dataset")]
    GenreNotFound(String),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Invalid direction '{token}': expected one of {expected}")]
    InvalidDirection { expected: &'static str, token: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Caller-supplied input was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidDirection { .. } | Error::InvalidOption(_))
    }

    /// A required collaborator was missing or not ready.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Error::CatalogNotLoaded
                | Error::ModelNotFitted
                | Error::GenreNotFound(_)
                | Error::TrackNotFound(_)
        )
    }
}
