//! Error types for `trailhead-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A candidate record carried a coordinate outside the WGS84 range.
  #[error("coordinate out of range: lat {lat}, lon {lon}")]
  CoordinateOutOfRange { lat: f64, lon: f64 },

  #[error("place name must not be empty")]
  EmptyName,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
