//! Place — a stored point of interest.
//!
//! A place's external identity is the `(source, source_id)` pair; the store
//! assigns an internal surrogate id that is stable once created. On top of
//! that hard uniqueness constraint, the store keeps a best-effort invariant
//! that no two rows denote the same physical establishment even when sourced
//! independently (the near-duplicate pass in `trailhead-store-sqlite`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Internal surrogate key — the SQLite rowid, shared with the text index.
pub type PlaceId = i64;

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The category of a point of interest. Source categories outside this set
/// normalize to [`PlaceKind::Poi`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
  Restaurant,
  Cafe,
  Lodging,
  Resort,
  /// Generic point of interest; the fallback for unmapped source categories.
  Poi,
}

// ─── Place ───────────────────────────────────────────────────────────────────

/// A stored point of interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
  pub id:         PlaceId,
  /// Origin system, e.g. `"osm"`.
  pub source:     String,
  /// Unique id within the origin system.
  pub source_id:  String,
  pub name:       String,
  pub kind:       PlaceKind,
  pub lat:        f64,
  pub lon:        f64,
  pub address:    Option<String>,
  pub phone:      Option<String>,
  pub website:    Option<String>,
  pub rating:     Option<f64>,
  pub price:      Option<String>,
  /// Source tags, stored verbatim for later inspection.
  pub tags:       serde_json::Map<String, serde_json::Value>,
  /// Timestamp of the last write that touched this row.
  pub updated_at: DateTime<Utc>,
}

// ─── NewPlace ────────────────────────────────────────────────────────────────

/// A candidate record produced by an external source — the input to
/// [`crate::store::PlaceStore::upsert`]. The internal id and `updated_at`
/// are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlace {
  pub source:    String,
  pub source_id: String,
  pub name:      String,
  pub kind:      PlaceKind,
  pub lat:       f64,
  pub lon:       f64,
  #[serde(default)]
  pub address:   Option<String>,
  #[serde(default)]
  pub phone:     Option<String>,
  #[serde(default)]
  pub website:   Option<String>,
  #[serde(default)]
  pub rating:    Option<f64>,
  #[serde(default)]
  pub price:     Option<String>,
  #[serde(default)]
  pub tags:      serde_json::Map<String, serde_json::Value>,
}

impl NewPlace {
  /// Reject records the fetch collaborator should never produce: a
  /// coordinate outside the WGS84 range, or an empty name.
  pub fn validate(&self) -> Result<()> {
    if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lon) {
      return Err(Error::CoordinateOutOfRange { lat: self.lat, lon: self.lon });
    }
    if self.name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(())
  }
}

// ─── Search results ──────────────────────────────────────────────────────────

/// A place returned from proximity search, with its computed distance from
/// the query center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyPlace {
  #[serde(flatten)]
  pub place:      Place,
  /// Great-circle distance from the query center, in meters (0.1 m
  /// resolution).
  pub distance_m: f64,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn candidate() -> NewPlace {
    NewPlace {
      source:    "osm".into(),
      source_id: "node:1".into(),
      name:      "Mountain Lodge".into(),
      kind:      PlaceKind::Lodging,
      lat:       27.7,
      lon:       86.8,
      address:   None,
      phone:     None,
      website:   None,
      rating:    None,
      price:     None,
      tags:      serde_json::Map::new(),
    }
  }

  #[test]
  fn valid_candidate_passes() {
    assert!(candidate().validate().is_ok());
  }

  #[test]
  fn out_of_range_latitude_rejected() {
    let mut c = candidate();
    c.lat = 200.0;
    assert!(matches!(
      c.validate(),
      Err(Error::CoordinateOutOfRange { .. })
    ));
  }

  #[test]
  fn out_of_range_longitude_rejected() {
    let mut c = candidate();
    c.lon = -181.0;
    assert!(matches!(
      c.validate(),
      Err(Error::CoordinateOutOfRange { .. })
    ));
  }

  #[test]
  fn blank_name_rejected() {
    let mut c = candidate();
    c.name = "   ".into();
    assert!(matches!(c.validate(), Err(Error::EmptyName)));
  }
}
