//! Trek catalog types and the rule-based recommendation scorer.
//!
//! Scoring is deliberately transparent: a trek starts from its hand-tuned
//! base score and loses points for concrete profile mismatches, each of
//! which is named in the returned reason string.

use serde::{Deserialize, Serialize};

use crate::catalog;

// ─── Catalog types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  Moderate,
  Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
  Low,
  Medium,
  High,
}

/// One entry in the static trek catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trek {
  pub id:            u32,
  pub name:          String,
  pub difficulty:    Difficulty,
  pub altitude_m:    u32,
  pub duration_days: u32,
  pub location:      String,
  pub best_season:   String,
  pub highlights:    Vec<String>,
  pub gear:          Vec<String>,
  pub cost_min:      u32,
  pub cost_max:      u32,
  pub risk_level:    RiskLevel,
  /// Hand-tuned starting score (0–100) before profile adjustments.
  pub base_score:    u8,
}

// ─── User profile ────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
  #[default]
  Beginner,
  Intermediate,
  Advanced,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Fitness {
  Low,
  #[default]
  Moderate,
  High,
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Budget {
  Low,
  #[default]
  Medium,
  High,
}

/// What we know about the person asking for recommendations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
  #[serde(default)]
  pub experience:  Experience,
  #[serde(default)]
  pub fitness:     Fitness,
  #[serde(default)]
  pub budget:      Budget,
  #[serde(default)]
  pub preferences: Vec<String>,
}

// ─── Scoring ─────────────────────────────────────────────────────────────────

/// A trek with its profile-adjusted score and the explanation for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
  pub trek:   Trek,
  pub score:  u8,
  pub reason: String,
}

/// Score one trek against a profile; returns the clamped score and a
/// semicolon-joined explanation of every adjustment applied.
pub fn score_trek(profile: &UserProfile, trek: &Trek) -> (u8, String) {
  let mut score = i32::from(trek.base_score);
  let mut reasons: Vec<&str> = Vec::new();

  if profile.experience == Experience::Beginner
    && trek.difficulty == Difficulty::Hard
  {
    score -= 20;
    reasons.push("reduced: beginner vs hard route (-20)");
  }
  if profile.experience == Experience::Advanced
    && trek.difficulty == Difficulty::Easy
  {
    score -= 10;
    reasons.push("reduced: easy for advanced (-10)");
  }

  if profile.budget == Budget::Low && trek.cost_min > 1500 {
    score -= 15;
    reasons.push("reduced: above low budget (-15)");
  }

  if profile.fitness == Fitness::Low && trek.difficulty != Difficulty::Easy {
    score -= 8;
    reasons.push("reduced: low fitness vs non-easy (-8)");
  }
  if profile.fitness == Fitness::High && trek.difficulty == Difficulty::Easy {
    score -= 5;
    reasons.push("reduced: easy vs high fitness (-5)");
  }

  let score = score.clamp(0, 100) as u8;
  if reasons.is_empty() {
    reasons.push("good match based on profile");
  }
  (score, reasons.join("; "))
}

/// Score every trek in the catalog, sorted descending by score.
pub fn recommend(profile: &UserProfile) -> Vec<Recommendation> {
  let mut recs: Vec<Recommendation> = catalog::treks()
    .iter()
    .map(|trek| {
      let (score, reason) = score_trek(profile, trek);
      Recommendation { trek: trek.clone(), score, reason }
    })
    .collect();
  recs.sort_by(|a, b| b.score.cmp(&a.score));
  recs
}

#[cfg(test)]
mod tests {
  use super::*;

  fn profile(
    experience: Experience,
    fitness: Fitness,
    budget: Budget,
  ) -> UserProfile {
    UserProfile { experience, fitness, budget, preferences: Vec::new() }
  }

  fn hard_trek() -> &'static Trek {
    catalog::treks()
      .iter()
      .find(|t| t.difficulty == Difficulty::Hard)
      .expect("catalog has a hard trek")
  }

  #[test]
  fn beginner_penalized_on_hard_route() {
    let trek = hard_trek();
    let (score, reason) = score_trek(
      &profile(Experience::Beginner, Fitness::Moderate, Budget::High),
      trek,
    );
    assert_eq!(i32::from(score), i32::from(trek.base_score) - 20);
    assert!(reason.contains("beginner vs hard route"));
  }

  #[test]
  fn low_budget_penalized_on_expensive_trek() {
    let trek = hard_trek();
    assert!(trek.cost_min > 1500);
    let (score, reason) = score_trek(
      &profile(Experience::Advanced, Fitness::High, Budget::Low),
      trek,
    );
    assert_eq!(i32::from(score), i32::from(trek.base_score) - 15);
    assert!(reason.contains("above low budget"));
  }

  #[test]
  fn penalties_stack() {
    let trek = hard_trek();
    let (score, _) = score_trek(
      &profile(Experience::Beginner, Fitness::Low, Budget::Low),
      trek,
    );
    // -20 (beginner vs hard) -15 (budget) -8 (fitness)
    assert_eq!(i32::from(score), i32::from(trek.base_score) - 43);
  }

  #[test]
  fn clean_match_keeps_base_score_and_generic_reason() {
    let trek = catalog::treks()
      .iter()
      .find(|t| t.difficulty == Difficulty::Moderate)
      .unwrap();
    let (score, reason) = score_trek(
      &profile(Experience::Intermediate, Fitness::Moderate, Budget::High),
      trek,
    );
    assert_eq!(score, trek.base_score);
    assert_eq!(reason, "good match based on profile");
  }

  #[test]
  fn recommendations_are_sorted_descending() {
    let recs = recommend(&UserProfile::default());
    assert_eq!(recs.len(), catalog::treks().len());
    assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
  }

  #[test]
  fn score_never_underflows() {
    let mut trek = hard_trek().clone();
    trek.base_score = 10;
    let (score, _) = score_trek(
      &profile(Experience::Beginner, Fitness::Low, Budget::Low),
      &trek,
    );
    assert_eq!(score, 0);
  }
}
