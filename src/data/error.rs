use thiserror::Error;

/// Why a single feed entry could not become an [`EarthquakeRecord`].
///
/// These are per-entry problems: the loader skips the entry and carries on.
///
/// [`EarthquakeRecord`]: super::model::EarthquakeRecord
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("feature {index}: no geometry")]
    MissingGeometry { index: usize },

    #[error("feature {index}: expected Point geometry, got {kind}")]
    NotAPoint { index: usize, kind: String },

    #[error("feature {index}: point has {found} coordinates, need at least 2")]
    TooFewCoordinates { index: usize, found: usize },

    #[error("feature {index}: coordinate {position} is not a number")]
    NonNumericCoordinate { index: usize, position: usize },

    #[error("row {index}: latitude/longitude missing or not a number")]
    InvalidCoordinates { index: usize },
}
