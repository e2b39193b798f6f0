//! Handlers for `/risk` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/risk/assess` | Body: [`AssessBody`]; runs the stub and persists |
//! | `GET`  | `/risk/assess` | Same, parameters in the query string |
//! | `GET`  | `/risk/history` | `?limit=..`, newest first |
//! | `GET`  | `/risk/{id}` | 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use trailhead_core::{
  risk::{Assessment, AssessmentSummary, NewAssessment, assess_seasonal},
  store::AssessmentStore,
};

use crate::{ApiState, error::ApiError, places::check_center};

const ELEVATION_RANGE_M: std::ops::RangeInclusive<f64> = -500.0..=9000.0;

// ─── Assess ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssessBody {
  pub lat:         f64,
  pub lon:         f64,
  /// ISO 8601 calendar date; defaults to today (UTC).
  pub date:        Option<NaiveDate>,
  pub elevation_m: Option<f64>,
  /// Free-form feature map, persisted alongside the assessment.
  #[serde(default)]
  pub features:    Option<serde_json::Map<String, serde_json::Value>>,
}

async fn run_assessment<S>(
  state: &ApiState<S>,
  body: AssessBody,
) -> Result<Assessment, ApiError>
where
  S: AssessmentStore,
{
  check_center(body.lat, body.lon)?;
  if let Some(elev) = body.elevation_m
    && !ELEVATION_RANGE_M.contains(&elev)
  {
    return Err(ApiError::BadRequest(format!(
      "elevation_m out of range: {elev}"
    )));
  }

  let date = body.date.unwrap_or_else(|| Utc::now().date_naive());
  let risk = assess_seasonal(body.lat, body.lon, Some(date), body.elevation_m);

  state
    .store
    .record_assessment(NewAssessment {
      lat: body.lat,
      lon: body.lon,
      date,
      elevation_m: body.elevation_m,
      risk,
      features: body.features,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))
}

/// `POST /risk/assess`
pub async fn assess<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<AssessBody>,
) -> Result<Json<Assessment>, ApiError>
where
  S: AssessmentStore,
{
  run_assessment(&state, body).await.map(Json)
}

#[derive(Debug, Deserialize)]
pub struct AssessParams {
  pub lat:         f64,
  pub lon:         f64,
  pub date:        Option<NaiveDate>,
  pub elevation_m: Option<f64>,
}

/// `GET /risk/assess?lat=..&lon=..[&date=..][&elevation_m=..]`
pub async fn assess_query<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<AssessParams>,
) -> Result<Json<Assessment>, ApiError>
where
  S: AssessmentStore,
{
  let body = AssessBody {
    lat:         params.lat,
    lon:         params.lon,
    date:        params.date,
    elevation_m: params.elevation_m,
    features:    None,
  };
  run_assessment(&state, body).await.map(Json)
}

// ─── History ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub limit: Option<usize>,
}

/// `GET /risk/history[?limit=..]`
pub async fn history<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<AssessmentSummary>>, ApiError>
where
  S: AssessmentStore,
{
  let limit = params.limit.unwrap_or(20).clamp(1, 200);
  let items = state
    .store
    .recent_assessments(limit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(items))
}

// ─── Get one ─────────────────────────────────────────────────────────────────

/// `GET /risk/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Assessment>, ApiError>
where
  S: AssessmentStore,
{
  let assessment = state
    .store
    .get_assessment(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("assessment {id} not found")))?;
  Ok(Json(assessment))
}
