//! JSON REST API for Trailhead.
//!
//! Exposes an axum [`Router`] backed by any store implementing
//! [`PlaceStore`] and [`AssessmentStore`]. TLS and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = trailhead_api::api_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod ingest;
pub mod places;
pub mod risk;
pub mod treks;

use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use serde_json::json;
use trailhead_core::store::{AssessmentStore, PlaceStore};
use trailhead_osm::OverpassClient;

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub osm:   Arc<OverpassClient>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), osm: Arc::clone(&self.osm) }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: PlaceStore + AssessmentStore + 'static,
{
  Router::new()
    .route("/", get(health))
    // Treks
    .route("/treks", get(treks::list))
    .route("/treks/{id}", get(treks::get_one))
    .route("/treks/{id}/plan", get(treks::plan))
    .route("/recommendations", post(treks::recommendations))
    // Risk
    .route(
      "/risk/assess",
      get(risk::assess_query::<S>).post(risk::assess::<S>),
    )
    .route("/risk/history", get(risk::history::<S>))
    .route("/risk/{id}", get(risk::get_one::<S>))
    // Places
    .route("/ingest/osm", post(ingest::osm::<S>))
    .route("/places/nearby", get(places::nearby::<S>))
    .route("/places/search", get(places::search::<S>))
    .with_state(state)
}

/// `GET /` — service liveness blob.
async fn health() -> Json<serde_json::Value> {
  Json(json!({ "ok": true, "service": "trailhead" }))
}

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use tower::ServiceExt as _;
  use trailhead_core::{
    place::{NewPlace, PlaceKind},
    store::PlaceStore as _,
  };
  use trailhead_store_sqlite::SqliteStore;

  async fn make_state() -> ApiState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    // Points at the real endpoint but is never exercised by these tests.
    let osm =
      OverpassClient::new(trailhead_osm::DEFAULT_ENDPOINT, "trailhead-tests")
        .unwrap();
    ApiState { store: Arc::new(store), osm: Arc::new(osm) }
  }

  async fn oneshot(
    state: ApiState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
  ) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        builder.body(Body::from(json.to_string())).unwrap()
      }
      None => builder.body(Body::empty()).unwrap(),
    };

    let response = api_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      serde_json::Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn lodge(source_id: &str, name: &str, lat: f64, lon: f64) -> NewPlace {
    NewPlace {
      source: "osm".into(),
      source_id: source_id.into(),
      name: name.into(),
      kind: PlaceKind::Lodging,
      lat,
      lon,
      address: None,
      phone: None,
      website: None,
      rating: None,
      price: None,
      tags: serde_json::Map::new(),
    }
  }

  // ── Health ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_blob() {
    let (status, body) = oneshot(make_state().await, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
  }

  // ── Treks ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn treks_list_and_get() {
    let state = make_state().await;

    let (status, body) = oneshot(state.clone(), "GET", "/treks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = oneshot(state.clone(), "GET", "/treks/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Everest Base Camp");

    let (status, _) = oneshot(state, "GET", "/treks/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn trek_plan_bundles_guides_and_lodging() {
    let (status, body) =
      oneshot(make_state().await, "GET", "/treks/1/plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trek"]["location"], "Nepal");
    assert!(!body["guides"].as_array().unwrap().is_empty());
    assert!(!body["lodging"].as_array().unwrap().is_empty());
    // EBC sits above the acclimatization cutoff.
    assert_eq!(
      body["safety_recs"][0],
      "Altitude acclimatization required"
    );
  }

  #[tokio::test]
  async fn recommendations_are_scored_and_sorted() {
    let profile = serde_json::json!({
      "experience": "beginner",
      "fitness": "moderate",
      "budget": "high"
    });
    let (status, body) =
      oneshot(make_state().await, "POST", "/recommendations", Some(profile))
        .await;
    assert_eq!(status, StatusCode::OK);

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 3);
    let scores: Vec<i64> =
      recs.iter().map(|r| r["score"].as_i64().unwrap()).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    // The hard trek takes the beginner penalty: 85 - 20.
    let ebc = recs
      .iter()
      .find(|r| r["trek"]["name"] == "Everest Base Camp")
      .unwrap();
    assert_eq!(ebc["score"], 65);
  }

  // ── Risk ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn assess_persists_and_is_retrievable() {
    let state = make_state().await;

    let body = serde_json::json!({
      "lat": 27.7, "lon": 86.8, "date": "2025-01-15", "elevation_m": 5600.0
    });
    let (status, stored) =
      oneshot(state.clone(), "POST", "/risk/assess", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["risk"]["source"], "stub_v1");
    assert!(stored["risk"]["reason"]
      .as_str()
      .unwrap()
      .contains("winter conditions"));

    let id = stored["id"].as_i64().unwrap();
    let (status, fetched) =
      oneshot(state.clone(), "GET", &format!("/risk/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["risk"]["overall_pct"], stored["risk"]["overall_pct"]);

    let (status, history) =
      oneshot(state, "GET", "/risk/history?limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn assess_via_query_string() {
    let (status, body) = oneshot(
      make_state().await,
      "GET",
      "/risk/assess?lat=27.7&lon=86.8&date=2025-07-01",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["risk"]["reason"]
      .as_str()
      .unwrap()
      .contains("monsoon period"));
  }

  #[tokio::test]
  async fn assess_rejects_bad_coordinates_and_elevation() {
    let state = make_state().await;

    let (status, _) = oneshot(
      state.clone(),
      "GET",
      "/risk/assess?lat=200&lon=86.8",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "lat": 27.7, "lon": 86.8, "elevation_m": 12000.0 });
    let (status, _) =
      oneshot(state, "POST", "/risk/assess", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn unknown_assessment_is_404() {
    let (status, _) =
      oneshot(make_state().await, "GET", "/risk/7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Places ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn nearby_returns_sorted_hits_with_distance() {
    let state = make_state().await;
    state
      .store
      .upsert(lodge("a", "Mountain Lodge", 27.7010, 86.8010))
      .await
      .unwrap();
    state
      .store
      .upsert(lodge("b", "Sunrise Guesthouse", 27.7002, 86.8002))
      .await
      .unwrap();

    let (status, body) = oneshot(
      state,
      "GET",
      "/places/nearby?lat=27.7&lon=86.8&radius_m=2000&kind=lodging",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["name"], "Sunrise Guesthouse");
    assert!(hits[0]["distance_m"].as_f64().unwrap() <= hits[1]["distance_m"].as_f64().unwrap());
  }

  #[tokio::test]
  async fn nearby_rejects_nonpositive_radius() {
    let (status, _) = oneshot(
      make_state().await,
      "GET",
      "/places/nearby?lat=27.7&lon=86.8&radius_m=0",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn text_search_over_seeded_store() {
    let state = make_state().await;
    state
      .store
      .upsert(lodge("a", "Mountain Lodge", 27.7, 86.8))
      .await
      .unwrap();

    let (status, body) = oneshot(
      state.clone(),
      "GET",
      "/places/search?q=lodge",
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Mountain Lodge");

    let (status, body) =
      oneshot(state, "GET", "/places/search?q=nomatch", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn ingest_rejects_out_of_range_center() {
    let body = serde_json::json!({ "lat": 200.0, "lon": 86.8 });
    let (status, _) =
      oneshot(make_state().await, "POST", "/ingest/osm", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}
