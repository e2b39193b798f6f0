//! Seasonal risk estimation — a canned, month-driven stub.
//!
//! The percentages here are fixed seasonal baselines, not a model. The
//! `source` field on every breakdown names the stub version so downstream
//! consumers can tell these apart from real forecasts later.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── Breakdown ───────────────────────────────────────────────────────────────

/// Severity bucket for an overall risk percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLabel {
  Low,
  Moderate,
  Elevated,
  High,
  Extreme,
}

impl RiskLabel {
  /// Bucket an overall percentage into a label.
  pub fn from_overall(pct: f64) -> Self {
    if pct < 20.0 {
      Self::Low
    } else if pct < 40.0 {
      Self::Moderate
    } else if pct < 60.0 {
      Self::Elevated
    } else if pct < 80.0 {
      Self::High
    } else {
      Self::Extreme
    }
  }
}

/// Per-hazard percentages plus the weighted overall estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBreakdown {
  pub avalanche_pct: f64,
  pub blizzard_pct:  f64,
  pub landslide_pct: f64,
  pub overall_pct:   f64,
  pub label:         RiskLabel,
  pub reason:        String,
  pub source:        String,
}

// ─── Stub ────────────────────────────────────────────────────────────────────

const STUB_SOURCE: &str = "stub_v1";

fn round_tenth(v: f64) -> f64 { (v * 10.0).round() / 10.0 }

/// Compute the canned seasonal estimate for a coordinate.
///
/// The coordinate itself does not influence the stub yet; only the month and
/// the optional elevation do. `date` defaults to today (UTC).
pub fn assess_seasonal(
  _lat:        f64,
  _lon:        f64,
  date:        Option<NaiveDate>,
  elevation_m: Option<f64>,
) -> RiskBreakdown {
  let month = date.unwrap_or_else(|| Utc::now().date_naive()).month();

  let mut blizzard: f64 = if matches!(month, 12 | 1 | 2) { 45.0 } else { 15.0 };
  let mut landslide: f64 = if matches!(month, 6..=9) { 40.0 } else { 12.0 };
  let mut avalanche: f64 = if matches!(month, 12 | 1 | 2 | 3) { 30.0 } else { 18.0 };

  if let Some(elev) = elevation_m {
    if elev >= 5500.0 {
      avalanche += 10.0;
      blizzard += 10.0;
    } else if elev <= 3000.0 {
      landslide += 5.0;
    }
  }

  let avalanche = round_tenth(avalanche.clamp(0.0, 100.0));
  let blizzard = round_tenth(blizzard.clamp(0.0, 100.0));
  let landslide = round_tenth(landslide.clamp(0.0, 100.0));

  let overall =
    round_tenth(0.45 * avalanche + 0.35 * blizzard + 0.20 * landslide);

  let mut reasons: Vec<&str> = Vec::new();
  if matches!(month, 12 | 1 | 2) {
    reasons.push("winter conditions");
  }
  if matches!(month, 6..=9) {
    reasons.push("monsoon period");
  }
  if elevation_m.is_some_and(|e| e >= 5500.0) {
    reasons.push("very high elevation");
  }
  if reasons.is_empty() {
    reasons.push("seasonal baseline");
  }

  RiskBreakdown {
    avalanche_pct: avalanche,
    blizzard_pct:  blizzard,
    landslide_pct: landslide,
    overall_pct:   overall,
    label:         RiskLabel::from_overall(overall),
    reason:        reasons.join(", "),
    source:        STUB_SOURCE.to_owned(),
  }
}

// ─── Persisted assessments ───────────────────────────────────────────────────

/// A persisted risk assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
  pub id:          i64,
  pub lat:         f64,
  pub lon:         f64,
  pub date:        NaiveDate,
  pub elevation_m: Option<f64>,
  pub risk:        RiskBreakdown,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::AssessmentStore::record_assessment`].
/// `created_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewAssessment {
  pub lat:         f64,
  pub lon:         f64,
  pub date:        NaiveDate,
  pub elevation_m: Option<f64>,
  pub risk:        RiskBreakdown,
  /// Raw caller-supplied feature map, stored for later inspection.
  pub features:    Option<serde_json::Map<String, serde_json::Value>>,
}

/// Compact row for the history listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSummary {
  pub id:          i64,
  pub lat:         f64,
  pub lon:         f64,
  pub date:        NaiveDate,
  pub overall_pct: f64,
  pub label:       RiskLabel,
  pub created_at:  DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn winter_raises_blizzard_and_avalanche() {
    let r = assess_seasonal(27.7, 86.8, Some(date(2025, 1, 15)), None);
    assert_eq!(r.blizzard_pct, 45.0);
    assert_eq!(r.avalanche_pct, 30.0);
    assert_eq!(r.landslide_pct, 12.0);
    assert!(r.reason.contains("winter conditions"));
  }

  #[test]
  fn monsoon_raises_landslide() {
    let r = assess_seasonal(27.7, 86.8, Some(date(2025, 7, 1)), None);
    assert_eq!(r.landslide_pct, 40.0);
    assert!(r.reason.contains("monsoon period"));
  }

  #[test]
  fn shoulder_season_uses_baselines() {
    let r = assess_seasonal(27.7, 86.8, Some(date(2025, 10, 20)), None);
    assert_eq!(r.blizzard_pct, 15.0);
    assert_eq!(r.landslide_pct, 12.0);
    assert_eq!(r.avalanche_pct, 18.0);
    assert_eq!(r.reason, "seasonal baseline");
  }

  #[test]
  fn very_high_elevation_adds_to_avalanche_and_blizzard() {
    let base = assess_seasonal(27.7, 86.8, Some(date(2025, 10, 20)), None);
    let high =
      assess_seasonal(27.7, 86.8, Some(date(2025, 10, 20)), Some(5600.0));
    assert_eq!(high.avalanche_pct, base.avalanche_pct + 10.0);
    assert_eq!(high.blizzard_pct, base.blizzard_pct + 10.0);
    assert!(high.reason.contains("very high elevation"));
  }

  #[test]
  fn low_elevation_adds_to_landslide() {
    let base = assess_seasonal(27.7, 86.8, Some(date(2025, 10, 20)), None);
    let low =
      assess_seasonal(27.7, 86.8, Some(date(2025, 10, 20)), Some(2500.0));
    assert_eq!(low.landslide_pct, base.landslide_pct + 5.0);
  }

  #[test]
  fn overall_is_the_weighted_sum() {
    // 0.45·30 + 0.35·45 + 0.20·12 ≈ 31.65.
    let r = assess_seasonal(27.7, 86.8, Some(date(2025, 1, 15)), None);
    assert!((31.5..31.8).contains(&r.overall_pct), "{}", r.overall_pct);
    assert_eq!(r.label, RiskLabel::Moderate);
  }

  #[test]
  fn label_thresholds() {
    assert_eq!(RiskLabel::from_overall(19.9), RiskLabel::Low);
    assert_eq!(RiskLabel::from_overall(20.0), RiskLabel::Moderate);
    assert_eq!(RiskLabel::from_overall(40.0), RiskLabel::Elevated);
    assert_eq!(RiskLabel::from_overall(60.0), RiskLabel::High);
    assert_eq!(RiskLabel::from_overall(80.0), RiskLabel::Extreme);
  }
}
