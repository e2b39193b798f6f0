//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as ISO 8601
//! days, and the place tag map as compact JSON.

use chrono::{DateTime, NaiveDate, Utc};
use trailhead_core::{
  place::{Place, PlaceKind},
  risk::{Assessment, AssessmentSummary, RiskBreakdown, RiskLabel},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse().map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

// ─── PlaceKind ───────────────────────────────────────────────────────────────

pub fn encode_kind(k: PlaceKind) -> &'static str {
  match k {
    PlaceKind::Restaurant => "restaurant",
    PlaceKind::Cafe => "cafe",
    PlaceKind::Lodging => "lodging",
    PlaceKind::Resort => "resort",
    PlaceKind::Poi => "poi",
  }
}

pub fn decode_kind(s: &str) -> Result<PlaceKind> {
  match s {
    "restaurant" => Ok(PlaceKind::Restaurant),
    "cafe" => Ok(PlaceKind::Cafe),
    "lodging" => Ok(PlaceKind::Lodging),
    "resort" => Ok(PlaceKind::Resort),
    "poi" => Ok(PlaceKind::Poi),
    other => Err(Error::UnknownKind(other.to_owned())),
  }
}

// ─── RiskLabel ───────────────────────────────────────────────────────────────

pub fn encode_label(l: RiskLabel) -> &'static str {
  match l {
    RiskLabel::Low => "LOW",
    RiskLabel::Moderate => "MODERATE",
    RiskLabel::Elevated => "ELEVATED",
    RiskLabel::High => "HIGH",
    RiskLabel::Extreme => "EXTREME",
  }
}

pub fn decode_label(s: &str) -> Result<RiskLabel> {
  match s {
    "LOW" => Ok(RiskLabel::Low),
    "MODERATE" => Ok(RiskLabel::Moderate),
    "ELEVATED" => Ok(RiskLabel::Elevated),
    "HIGH" => Ok(RiskLabel::High),
    "EXTREME" => Ok(RiskLabel::Extreme),
    other => Err(Error::UnknownLabel(other.to_owned())),
  }
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(
  tags: &serde_json::Map<String, serde_json::Value>,
) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(
  s: &str,
) -> Result<serde_json::Map<String, serde_json::Value>> {
  Ok(serde_json::from_str(s)?)
}

/// Flatten a tag map into the `key:value` blob indexed for text search.
pub fn tags_blob(tags: &serde_json::Map<String, serde_json::Value>) -> String {
  tags
    .iter()
    .map(|(k, v)| match v {
      serde_json::Value::String(s) => format!("{k}:{s}"),
      other => format!("{k}:{other}"),
    })
    .collect::<Vec<_>>()
    .join(" ")
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `places` select.
pub const PLACE_COLUMNS: &str = "id, source, source_id, name, kind, lat, \
   lon, address, phone, website, rating, price, tags, updated_at";

/// Same columns qualified for joins against the FTS table, whose own
/// `name`/`address`/`tags` columns would otherwise shadow them.
pub const PLACE_COLUMNS_QUALIFIED: &str = "p.id, p.source, p.source_id, \
   p.name, p.kind, p.lat, p.lon, p.address, p.phone, p.website, p.rating, \
   p.price, p.tags, p.updated_at";

/// Raw values read directly from a `places` row.
pub struct RawPlace {
  pub id:         i64,
  pub source:     String,
  pub source_id:  String,
  pub name:       String,
  pub kind:       String,
  pub lat:        f64,
  pub lon:        f64,
  pub address:    Option<String>,
  pub phone:      Option<String>,
  pub website:    Option<String>,
  pub rating:     Option<f64>,
  pub price:      Option<String>,
  pub tags:       String,
  pub updated_at: String,
}

impl RawPlace {
  /// Map a row selected with [`PLACE_COLUMNS`] (or its qualified twin).
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      source:     row.get(1)?,
      source_id:  row.get(2)?,
      name:       row.get(3)?,
      kind:       row.get(4)?,
      lat:        row.get(5)?,
      lon:        row.get(6)?,
      address:    row.get(7)?,
      phone:      row.get(8)?,
      website:    row.get(9)?,
      rating:     row.get(10)?,
      price:      row.get(11)?,
      tags:       row.get(12)?,
      updated_at: row.get(13)?,
    })
  }

  pub fn into_place(self) -> Result<Place> {
    Ok(Place {
      id:         self.id,
      source:     self.source,
      source_id:  self.source_id,
      name:       self.name,
      kind:       decode_kind(&self.kind)?,
      lat:        self.lat,
      lon:        self.lon,
      address:    self.address,
      phone:      self.phone,
      website:    self.website,
      rating:     self.rating,
      price:      self.price,
      tags:       decode_tags(&self.tags)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from an `assessments` row.
pub struct RawAssessment {
  pub id:            i64,
  pub lat:           f64,
  pub lon:           f64,
  pub date:          String,
  pub elevation_m:   Option<f64>,
  pub avalanche_pct: f64,
  pub blizzard_pct:  f64,
  pub landslide_pct: f64,
  pub overall_pct:   f64,
  pub label:         String,
  pub reason:        String,
  pub source:        String,
  pub created_at:    String,
}

impl RawAssessment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      lat:           row.get(1)?,
      lon:           row.get(2)?,
      date:          row.get(3)?,
      elevation_m:   row.get(4)?,
      avalanche_pct: row.get(5)?,
      blizzard_pct:  row.get(6)?,
      landslide_pct: row.get(7)?,
      overall_pct:   row.get(8)?,
      label:         row.get(9)?,
      reason:        row.get(10)?,
      source:        row.get(11)?,
      created_at:    row.get(12)?,
    })
  }

  pub fn into_assessment(self) -> Result<Assessment> {
    Ok(Assessment {
      id:          self.id,
      lat:         self.lat,
      lon:         self.lon,
      date:        decode_date(&self.date)?,
      elevation_m: self.elevation_m,
      risk:        RiskBreakdown {
        avalanche_pct: self.avalanche_pct,
        blizzard_pct:  self.blizzard_pct,
        landslide_pct: self.landslide_pct,
        overall_pct:   self.overall_pct,
        label:         decode_label(&self.label)?,
        reason:        self.reason,
        source:        self.source,
      },
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values for the compact history listing.
pub struct RawAssessmentSummary {
  pub id:          i64,
  pub lat:         f64,
  pub lon:         f64,
  pub date:        String,
  pub overall_pct: f64,
  pub label:       String,
  pub created_at:  String,
}

impl RawAssessmentSummary {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      lat:         row.get(1)?,
      lon:         row.get(2)?,
      date:        row.get(3)?,
      overall_pct: row.get(4)?,
      label:       row.get(5)?,
      created_at:  row.get(6)?,
    })
  }

  pub fn into_summary(self) -> Result<AssessmentSummary> {
    Ok(AssessmentSummary {
      id:          self.id,
      lat:         self.lat,
      lon:         self.lon,
      date:        decode_date(&self.date)?,
      overall_pct: self.overall_pct,
      label:       decode_label(&self.label)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
