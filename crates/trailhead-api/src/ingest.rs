//! Handler for `POST /ingest/osm`.
//!
//! Fetches points of interest from the Overpass API around a coordinate and
//! absorbs them into the place directory. The response reports how many
//! records were fetched vs. successfully absorbed so callers can detect
//! partial failure without the endpoint erroring.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use trailhead_core::{place::PlaceKind, store::PlaceStore};

use crate::{ApiState, error::ApiError, places::check_center};

const DEFAULT_RADIUS_M: u32 = 2000;

fn default_kinds() -> Vec<PlaceKind> {
  vec![
    PlaceKind::Restaurant,
    PlaceKind::Cafe,
    PlaceKind::Lodging,
    PlaceKind::Resort,
  ]
}

#[derive(Debug, Deserialize)]
pub struct IngestBody {
  pub lat:      f64,
  pub lon:      f64,
  /// Meters; defaults to 2000, clamped to 100..=10000.
  pub radius_m: Option<u32>,
  /// Defaults to every concrete kind (no generic poi).
  pub kinds:    Option<Vec<PlaceKind>>,
}

/// Counts reported back from an ingest run.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestReport {
  pub fetched:  usize,
  pub ingested: usize,
}

/// `POST /ingest/osm` — body: `{"lat":..,"lon":..,"radius_m":..,"kinds":[..]}`
pub async fn osm<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<IngestBody>,
) -> Result<Json<IngestReport>, ApiError>
where
  S: PlaceStore,
{
  check_center(body.lat, body.lon)?;

  let radius_m = body.radius_m.unwrap_or(DEFAULT_RADIUS_M).clamp(100, 10_000);
  let kinds = body.kinds.unwrap_or_else(default_kinds);

  let candidates = state
    .osm
    .fetch_places(body.lat, body.lon, radius_m, &kinds)
    .await
    .map_err(ApiError::Upstream)?;

  let fetched = candidates.len();
  let ingested = state
    .store
    .upsert_batch(candidates)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(fetched, ingested, "osm ingest complete");
  Ok(Json(IngestReport { fetched, ingested }))
}
