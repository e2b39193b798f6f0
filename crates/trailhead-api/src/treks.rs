//! Handlers for the trek catalog and recommendation endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/treks` | Full catalog, no scores |
//! | `GET`  | `/treks/{id}` | 404 if not found |
//! | `GET`  | `/treks/{id}/plan` | Trek + guides + lodging + safety notes |
//! | `POST` | `/recommendations` | Body: [`UserProfile`] |

use axum::{Json, extract::Path};
use serde::Serialize;
use trailhead_core::{
  catalog::{self, Guide, LodgingOption},
  trek::{Recommendation, Trek, UserProfile, recommend},
};

use crate::error::ApiError;

// ─── Catalog ─────────────────────────────────────────────────────────────────

/// `GET /treks`
pub async fn list() -> Json<Vec<Trek>> { Json(catalog::treks().to_vec()) }

/// `GET /treks/{id}`
pub async fn get_one(Path(id): Path<u32>) -> Result<Json<Trek>, ApiError> {
  catalog::trek(id)
    .cloned()
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("trek {id} not found")))
}

// ─── Plan bundle ─────────────────────────────────────────────────────────────

/// Everything the dashboard needs to plan one trek.
#[derive(Debug, Serialize)]
pub struct PlanBundle {
  pub trek:        Trek,
  pub guides:      Vec<Guide>,
  pub lodging:     Vec<LodgingOption>,
  pub safety_recs: Vec<String>,
}

/// `GET /treks/{id}/plan`
pub async fn plan(Path(id): Path<u32>) -> Result<Json<PlanBundle>, ApiError> {
  let trek = catalog::trek(id)
    .ok_or_else(|| ApiError::NotFound(format!("trek {id} not found")))?;

  let acclimatization = if trek.altitude_m >= 3000 {
    "Altitude acclimatization required"
  } else {
    "Standard acclimatization"
  };

  Ok(Json(PlanBundle {
    trek:        trek.clone(),
    guides:      catalog::guides_for(&trek.location).to_vec(),
    lodging:     catalog::lodging_for(&trek.location).to_vec(),
    safety_recs: vec![
      acclimatization.to_owned(),
      "Weather monitoring essential".to_owned(),
      "Emergency evacuation insurance recommended".to_owned(),
    ],
  }))
}

// ─── Recommendations ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
  pub recommendations: Vec<Recommendation>,
}

/// `POST /recommendations` — body: a [`UserProfile`]; every field optional.
pub async fn recommendations(
  Json(profile): Json<UserProfile>,
) -> Json<RecommendationsResponse> {
  Json(RecommendationsResponse { recommendations: recommend(&profile) })
}
