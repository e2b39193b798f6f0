//! Handlers for `/places` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/places/nearby` | `?lat=..&lon=..[&radius_m=..][&kind=..][&limit=..]` |
//! | `GET`  | `/places/search` | `?q=..[&limit=..]` |

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use trailhead_core::{
  place::{NearbyPlace, Place, PlaceKind},
  store::{NearbyQuery, PlaceStore},
};

use crate::{ApiState, error::ApiError};

const DEFAULT_RADIUS_M: f64 = 2000.0;
const MAX_LIMIT: usize = 200;

pub(crate) fn check_center(lat: f64, lon: f64) -> Result<(), ApiError> {
  if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
    return Err(ApiError::BadRequest(format!(
      "center coordinate out of range: lat {lat}, lon {lon}"
    )));
  }
  Ok(())
}

// ─── Nearby ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
  pub lat:      f64,
  pub lon:      f64,
  pub radius_m: Option<f64>,
  pub kind:     Option<PlaceKind>,
  pub limit:    Option<usize>,
}

/// `GET /places/nearby?lat=..&lon=..[&radius_m=..][&kind=..][&limit=..]`
pub async fn nearby<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<NearbyPlace>>, ApiError>
where
  S: PlaceStore,
{
  check_center(params.lat, params.lon)?;

  let radius_m = params.radius_m.unwrap_or(DEFAULT_RADIUS_M);
  if !radius_m.is_finite() || radius_m <= 0.0 {
    return Err(ApiError::BadRequest("radius_m must be positive".into()));
  }

  let query = NearbyQuery {
    lat: params.lat,
    lon: params.lon,
    radius_m,
    kind: params.kind,
    limit: params.limit.unwrap_or(50).clamp(1, MAX_LIMIT),
  };

  let hits = state
    .store
    .search_nearby(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(hits))
}

// ─── Text search ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub q:     String,
  pub limit: Option<usize>,
}

/// `GET /places/search?q=..[&limit=..]`
pub async fn search<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Place>>, ApiError>
where
  S: PlaceStore,
{
  let limit = params.limit.unwrap_or(20).clamp(1, MAX_LIMIT);
  let places = state
    .store
    .search_text(&params.q, limit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(places))
}
