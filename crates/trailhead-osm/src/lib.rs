//! Overpass API client — the external map-data collaborator.
//!
//! Fetches points of interest around a coordinate from the Overpass API and
//! normalizes them into candidate records for ingestion. Query construction
//! and normalization are pure; only [`OverpassClient::fetch_places`] touches
//! the network.

pub mod error;

use std::time::Duration;

use serde::Deserialize;
use trailhead_core::place::{NewPlace, PlaceKind};

pub use error::{Error, Result};

/// Default public Overpass endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

// ─── Kind mapping ────────────────────────────────────────────────────────────

/// OSM tag pairs that identify each [`PlaceKind`].
const KIND_TAGS: &[(PlaceKind, &[(&str, &str)])] = &[
  (PlaceKind::Restaurant, &[("amenity", "restaurant")]),
  (PlaceKind::Cafe, &[("amenity", "cafe"), ("amenity", "fast_food")]),
  (PlaceKind::Lodging, &[
    ("tourism", "hotel"),
    ("tourism", "guest_house"),
    ("tourism", "hostel"),
    ("tourism", "motel"),
    ("tourism", "alpine_hut"),
  ]),
  (PlaceKind::Resort, &[("tourism", "resort")]),
];

fn kind_tag_pairs(kind: PlaceKind) -> &'static [(&'static str, &'static str)] {
  KIND_TAGS
    .iter()
    .find(|(k, _)| *k == kind)
    .map(|(_, pairs)| *pairs)
    .unwrap_or(&[])
}

// ─── Query construction ──────────────────────────────────────────────────────

/// Build the Overpass QL query for nodes, ways, and relations matching
/// `kinds` around a point. Ways and relations are reduced to their center
/// coordinate by `out center`.
pub fn build_query(
  lat: f64,
  lon: f64,
  radius_m: u32,
  kinds: &[PlaceKind],
) -> String {
  let mut clauses = String::new();
  for kind in kinds {
    for (key, value) in kind_tag_pairs(*kind) {
      for typ in ["node", "way", "relation"] {
        clauses.push_str(&format!(
          "{typ}[\"{key}\"=\"{value}\"](around:{radius_m},{lat},{lon});\n"
        ));
      }
    }
  }
  format!("[out:json][timeout:25];({clauses});out center;")
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct OverpassResponse {
  #[serde(default)]
  elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
  #[serde(rename = "type")]
  element_type: String,
  id:           i64,
  lat:          Option<f64>,
  lon:          Option<f64>,
  /// Present for ways and relations when queried with `out center`.
  center:       Option<Center>,
  #[serde(default)]
  tags:         serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Center {
  lat: f64,
  lon: f64,
}

// ─── Normalization ───────────────────────────────────────────────────────────

/// Convert one Overpass element into a candidate record.
///
/// Returns `None` for elements without a name or usable coordinates.
/// Elements whose tags match none of the requested kinds fall back to
/// [`PlaceKind::Poi`].
fn normalize(element: OverpassElement, kinds: &[PlaceKind]) -> Option<NewPlace> {
  let name = element.tags.get("name").and_then(|v| v.as_str())?.to_owned();

  let (lat, lon) = match (element.lat, element.lon, &element.center) {
    (Some(lat), Some(lon), _) => (lat, lon),
    (_, _, Some(center)) => (center.lat, center.lon),
    _ => return None,
  };

  let tag_str = |key: &str| {
    element.tags.get(key).and_then(|v| v.as_str()).map(str::to_owned)
  };

  let kind = kinds
    .iter()
    .copied()
    .find(|k| {
      kind_tag_pairs(*k).iter().any(|(key, value)| {
        element.tags.get(*key).and_then(|v| v.as_str()) == Some(*value)
      })
    })
    .unwrap_or(PlaceKind::Poi);

  let address = {
    let joined = ["addr:street", "addr:place", "addr:city"]
      .iter()
      .filter_map(|key| tag_str(key))
      .collect::<Vec<_>>()
      .join(", ");
    (!joined.is_empty()).then_some(joined)
  };

  let phone = tag_str("phone").or_else(|| tag_str("contact:phone"));
  let website = tag_str("website").or_else(|| tag_str("contact:website"));
  let source_id = format!("{}:{}", element.element_type, element.id);

  Some(NewPlace {
    source: "osm".to_owned(),
    source_id,
    name,
    kind,
    lat,
    lon,
    address,
    phone,
    website,
    rating: None,
    price: None,
    tags: element.tags,
  })
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Client for the Overpass HTTP API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OverpassClient {
  http:     reqwest::Client,
  endpoint: String,
}

impl OverpassClient {
  /// Build a client against `endpoint`, identifying as `user_agent`.
  pub fn new(endpoint: impl Into<String>, user_agent: &str) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(user_agent)
      .build()?;
    Ok(Self { http, endpoint: endpoint.into() })
  }

  /// Fetch and normalize candidate records around a point.
  pub async fn fetch_places(
    &self,
    lat: f64,
    lon: f64,
    radius_m: u32,
    kinds: &[PlaceKind],
  ) -> Result<Vec<NewPlace>> {
    let query = build_query(lat, lon, radius_m, kinds);

    let response = self
      .http
      .post(&self.endpoint)
      .form(&[("data", query.as_str())])
      .send()
      .await?
      .error_for_status()?;

    let payload: OverpassResponse = response.json().await?;
    let total = payload.elements.len();

    let places: Vec<NewPlace> = payload
      .elements
      .into_iter()
      .filter_map(|element| normalize(element, kinds))
      .collect();

    tracing::debug!(
      fetched = total,
      usable = places.len(),
      "normalized overpass elements",
    );
    Ok(places)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn query_covers_every_tag_pair_and_element_type() {
    let q = build_query(27.7, 86.8, 2000, &[PlaceKind::Lodging]);
    assert!(q.starts_with("[out:json][timeout:25];("));
    assert!(q.ends_with(");out center;"));
    for typ in ["node", "way", "relation"] {
      assert!(q.contains(&format!(
        "{typ}[\"tourism\"=\"hotel\"](around:2000,27.7,86.8);"
      )));
    }
    assert!(q.contains("[\"tourism\"=\"alpine_hut\"]"));
    assert!(!q.contains("amenity"));
  }

  #[test]
  fn cafe_covers_fast_food_too() {
    let q = build_query(27.7, 86.8, 500, &[PlaceKind::Cafe]);
    assert!(q.contains("[\"amenity\"=\"cafe\"]"));
    assert!(q.contains("[\"amenity\"=\"fast_food\"]"));
  }

  fn element(json: serde_json::Value) -> OverpassElement {
    serde_json::from_value(json).unwrap()
  }

  #[test]
  fn node_normalizes_with_direct_coordinates() {
    let el = element(serde_json::json!({
      "type": "node",
      "id": 42,
      "lat": 27.7,
      "lon": 86.8,
      "tags": {
        "name": "Mountain Lodge",
        "tourism": "hotel",
        "phone": "+977-1-555",
        "addr:street": "Main St",
        "addr:city": "Namche"
      }
    }));

    let place = normalize(el, &[PlaceKind::Lodging]).unwrap();
    assert_eq!(place.source, "osm");
    assert_eq!(place.source_id, "node:42");
    assert_eq!(place.kind, PlaceKind::Lodging);
    assert_eq!(place.lat, 27.7);
    assert_eq!(place.address.as_deref(), Some("Main St, Namche"));
    assert_eq!(place.phone.as_deref(), Some("+977-1-555"));
    // The raw tag map rides along verbatim.
    assert_eq!(
      place.tags.get("tourism").and_then(|v| v.as_str()),
      Some("hotel")
    );
  }

  #[test]
  fn way_falls_back_to_center_coordinates() {
    let el = element(serde_json::json!({
      "type": "way",
      "id": 7,
      "center": { "lat": 27.71, "lon": 86.81 },
      "tags": { "name": "Summit Rest", "amenity": "restaurant" }
    }));

    let place = normalize(el, &[PlaceKind::Restaurant]).unwrap();
    assert_eq!(place.source_id, "way:7");
    assert_eq!(place.lat, 27.71);
    assert_eq!(place.lon, 86.81);
  }

  #[test]
  fn unnamed_elements_are_dropped() {
    let el = element(serde_json::json!({
      "type": "node",
      "id": 1,
      "lat": 27.7,
      "lon": 86.8,
      "tags": { "amenity": "restaurant" }
    }));
    assert!(normalize(el, &[PlaceKind::Restaurant]).is_none());
  }

  #[test]
  fn elements_without_coordinates_are_dropped() {
    let el = element(serde_json::json!({
      "type": "relation",
      "id": 9,
      "tags": { "name": "Ghost Hotel", "tourism": "hotel" }
    }));
    assert!(normalize(el, &[PlaceKind::Lodging]).is_none());
  }

  #[test]
  fn unmatched_tags_normalize_to_generic_poi() {
    let el = element(serde_json::json!({
      "type": "node",
      "id": 3,
      "lat": 27.7,
      "lon": 86.8,
      "tags": { "name": "Viewpoint", "tourism": "viewpoint" }
    }));
    let place = normalize(el, &[PlaceKind::Lodging]).unwrap();
    assert_eq!(place.kind, PlaceKind::Poi);
  }

  #[test]
  fn contact_prefixed_tags_are_fallbacks() {
    let el = element(serde_json::json!({
      "type": "node",
      "id": 4,
      "lat": 27.7,
      "lon": 86.8,
      "tags": {
        "name": "Green Meadow",
        "amenity": "cafe",
        "contact:phone": "+977-1-777",
        "contact:website": "https://greenmeadow.example"
      }
    }));
    let place = normalize(el, &[PlaceKind::Cafe]).unwrap();
    assert_eq!(place.phone.as_deref(), Some("+977-1-777"));
    assert_eq!(
      place.website.as_deref(),
      Some("https://greenmeadow.example")
    );
  }
}
