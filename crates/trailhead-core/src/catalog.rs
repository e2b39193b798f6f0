//! The static trek catalog, with per-location guide and lodging listings.
//!
//! Hand-curated data; the catalog is small enough that a compiled-in table
//! beats a database round trip.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::trek::{Difficulty, RiskLevel, Trek};

/// A guiding outfit operating in a trek's location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
  pub name:          String,
  pub rating:        f64,
  pub reviews:       u32,
  pub price_per_day: u32,
}

/// A class of accommodation available in a trek's location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LodgingOption {
  pub category:    String,
  pub price_range: String,
}

fn strings(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| (*s).to_owned()).collect()
}

static TREKS: LazyLock<Vec<Trek>> = LazyLock::new(|| {
  vec![
    Trek {
      id:            1,
      name:          "Everest Base Camp".to_owned(),
      difficulty:    Difficulty::Hard,
      altitude_m:    5364,
      duration_days: 14,
      location:      "Nepal".to_owned(),
      best_season:   "Oct-Nov, Mar-May".to_owned(),
      highlights:    strings(&[
        "World's highest peak base",
        "Sherpa culture",
        "Stunning mountain views",
      ]),
      gear:          strings(&[
        "High-altitude gear",
        "Warm sleeping bag",
        "Trekking poles",
      ]),
      cost_min:      2500,
      cost_max:      4000,
      risk_level:    RiskLevel::High,
      base_score:    85,
    },
    Trek {
      id:            2,
      name:          "Annapurna Circuit".to_owned(),
      difficulty:    Difficulty::Moderate,
      altitude_m:    5416,
      duration_days: 12,
      location:      "Nepal".to_owned(),
      best_season:   "Oct-Nov, Mar-May".to_owned(),
      highlights:    strings(&[
        "Diverse landscapes",
        "Cultural villages",
        "Thorong La Pass",
      ]),
      gear:          strings(&["Standard trekking gear", "Layers", "Good boots"]),
      cost_min:      1200,
      cost_max:      2500,
      risk_level:    RiskLevel::Medium,
      base_score:    92,
    },
    Trek {
      id:            3,
      name:          "Torres del Paine W Trek".to_owned(),
      difficulty:    Difficulty::Moderate,
      altitude_m:    1200,
      duration_days: 5,
      location:      "Chile".to_owned(),
      best_season:   "Dec-Mar".to_owned(),
      highlights:    strings(&[
        "Dramatic granite towers",
        "Glacial lakes",
        "Diverse wildlife",
      ]),
      gear:          strings(&[
        "Wind-resistant jacket",
        "Hiking boots",
        "Rain gear",
      ]),
      cost_min:      800,
      cost_max:      1500,
      risk_level:    RiskLevel::Low,
      base_score:    88,
    },
  ]
});

static GUIDES: LazyLock<Vec<(&'static str, Vec<Guide>)>> =
  LazyLock::new(|| {
    vec![
      ("Nepal", vec![
        Guide {
          name:          "Sherpa Adventures".to_owned(),
          rating:        4.9,
          reviews:       127,
          price_per_day: 280,
        },
        Guide {
          name:          "Mountain Guides Co.".to_owned(),
          rating:        4.7,
          reviews:       89,
          price_per_day: 250,
        },
      ]),
      ("Chile", vec![Guide {
        name:          "Patagonia Trek Pro".to_owned(),
        rating:        4.8,
        reviews:       66,
        price_per_day: 220,
      }]),
    ]
  });

static LODGING: LazyLock<Vec<(&'static str, Vec<LodgingOption>)>> =
  LazyLock::new(|| {
    vec![
      ("Nepal", vec![
        LodgingOption {
          category:    "Tea Houses".to_owned(),
          price_range: "$10-25/night".to_owned(),
        },
        LodgingOption {
          category:    "Lodge Rooms".to_owned(),
          price_range: "$25-50/night".to_owned(),
        },
        LodgingOption {
          category:    "Private Rooms".to_owned(),
          price_range: "$50-100/night".to_owned(),
        },
      ]),
      ("Chile", vec![
        LodgingOption {
          category:    "Refugios".to_owned(),
          price_range: "$30-60/night".to_owned(),
        },
        LodgingOption {
          category:    "Campsites".to_owned(),
          price_range: "$10-25/night".to_owned(),
        },
      ]),
    ]
  });

/// Every trek in the catalog, in id order.
pub fn treks() -> &'static [Trek] { &TREKS }

/// Look up a single trek by id.
pub fn trek(id: u32) -> Option<&'static Trek> {
  TREKS.iter().find(|t| t.id == id)
}

/// Guides operating in `location`; empty for unknown locations.
pub fn guides_for(location: &str) -> &'static [Guide] {
  GUIDES
    .iter()
    .find(|(loc, _)| *loc == location)
    .map(|(_, guides)| guides.as_slice())
    .unwrap_or(&[])
}

/// Lodging classes available in `location`; empty for unknown locations.
pub fn lodging_for(location: &str) -> &'static [LodgingOption] {
  LODGING
    .iter()
    .find(|(loc, _)| *loc == location)
    .map(|(_, lodging)| lodging.as_slice())
    .unwrap_or(&[])
}
