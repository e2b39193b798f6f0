//! The `PlaceStore` and `AssessmentStore` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `trailhead-store-sqlite`). Higher layers (`trailhead-api`,
//! `trailhead-server`) depend on these abstractions, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  place::{NearbyPlace, NewPlace, Place, PlaceId, PlaceKind},
  risk::{Assessment, AssessmentSummary, NewAssessment},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PlaceStore::search_nearby`].
#[derive(Debug, Clone)]
pub struct NearbyQuery {
  /// Center latitude, degrees.
  pub lat:      f64,
  /// Center longitude, degrees.
  pub lon:      f64,
  /// Search radius in meters. The boundary is inclusive: a place at exactly
  /// this distance is returned.
  pub radius_m: f64,
  /// Restrict to places of a specific kind.
  pub kind:     Option<PlaceKind>,
  /// Maximum number of results.
  pub limit:    usize,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Abstraction over the deduplicated place directory.
///
/// Every call is self-contained: it acquires the underlying connection, does
/// its work, commits if it wrote anything, and returns. No transaction spans
/// multiple calls.
///
/// All methods return `Send` futures so the traits can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PlaceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Insert-or-merge one candidate record; returns the id of the affected
  /// place.
  ///
  /// Resolution order: exact `(source, source_id)` match (authoritative,
  /// full overwrite), then same-kind near-duplicate (distance ≤ 200 m and
  /// name similarity ≥ 90; name overwritten, contact fields filled only if
  /// empty), then insert as new. The text index is resynchronized from
  /// post-write state in all three outcomes.
  fn upsert(
    &self,
    record: NewPlace,
  ) -> impl Future<Output = Result<PlaceId, Self::Error>> + Send + '_;

  /// Apply [`upsert`](Self::upsert) to each record independently.
  ///
  /// A malformed record is logged and skipped without aborting the batch;
  /// storage failures still abort. Returns the number of records
  /// successfully absorbed. Records committed earlier in the batch are
  /// visible as near-duplicate candidates to later ones.
  fn upsert_batch(
    &self,
    records: Vec<NewPlace>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Retrieve a place by internal id. Returns `None` if not found.
  fn get_place(
    &self,
    id: PlaceId,
  ) -> impl Future<Output = Result<Option<Place>, Self::Error>> + Send + '_;

  /// Radius-bounded proximity search, sorted ascending by distance, with
  /// the computed distance attached to each hit.
  fn search_nearby<'a>(
    &'a self,
    query: &'a NearbyQuery,
  ) -> impl Future<Output = Result<Vec<NearbyPlace>, Self::Error>> + Send + 'a;

  /// Free-text search over the name/address/tags index, in the index's
  /// relevance order. If the index query mechanism itself fails (e.g.
  /// malformed query syntax), degrades to a case-insensitive substring
  /// match over name and address rather than surfacing an error.
  fn search_text<'a>(
    &'a self,
    query: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Place>, Self::Error>> + Send + 'a;
}

/// Abstraction over the persisted risk-assessment log.
pub trait AssessmentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist one assessment and return it with its assigned id and
  /// timestamp.
  fn record_assessment(
    &self,
    input: NewAssessment,
  ) -> impl Future<Output = Result<Assessment, Self::Error>> + Send + '_;

  /// Retrieve an assessment by id. Returns `None` if not found.
  fn get_assessment(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Assessment>, Self::Error>> + Send + '_;

  /// The most recent assessments, newest first.
  fn recent_assessments(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<AssessmentSummary>, Self::Error>> + Send + '_;
}
