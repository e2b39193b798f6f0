//! [`AssessmentStore`] implementation — the persisted risk-assessment log.

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use trailhead_core::{
  risk::{Assessment, AssessmentSummary, NewAssessment},
  store::AssessmentStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAssessment, RawAssessmentSummary, encode_date, encode_dt, encode_label,
  },
  store::SqliteStore,
};

const ASSESSMENT_COLUMNS: &str = "id, lat, lon, date, elevation_m, \
   avalanche_pct, blizzard_pct, landslide_pct, overall_pct, label, reason, \
   source, created_at";

impl AssessmentStore for SqliteStore {
  type Error = Error;

  async fn record_assessment(&self, input: NewAssessment) -> Result<Assessment> {
    let created_at = Utc::now();

    let date_str = encode_date(input.date);
    let label_str = encode_label(input.risk.label).to_owned();
    let created_str = encode_dt(created_at);
    let features_str = input
      .features
      .as_ref()
      .map(serde_json::to_string)
      .transpose()?;

    let risk = input.risk.clone();
    let (lat, lon, elevation_m) = (input.lat, input.lon, input.elevation_m);

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO assessments (lat, lon, date, elevation_m,
             avalanche_pct, blizzard_pct, landslide_pct, overall_pct,
             label, reason, source, features_json, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            lat,
            lon,
            date_str,
            elevation_m,
            risk.avalanche_pct,
            risk.blizzard_pct,
            risk.landslide_pct,
            risk.overall_pct,
            label_str,
            risk.reason,
            risk.source,
            features_str,
            created_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Assessment {
      id,
      lat: input.lat,
      lon: input.lon,
      date: input.date,
      elevation_m: input.elevation_m,
      risk: input.risk,
      created_at,
    })
  }

  async fn get_assessment(&self, id: i64) -> Result<Option<Assessment>> {
    let raw: Option<RawAssessment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE id = ?1"
              ),
              rusqlite::params![id],
              RawAssessment::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAssessment::into_assessment).transpose()
  }

  async fn recent_assessments(
    &self,
    limit: usize,
  ) -> Result<Vec<AssessmentSummary>> {
    let limit_val = limit as i64;

    let raws: Vec<RawAssessmentSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, lat, lon, date, overall_pct, label, created_at
             FROM assessments
            ORDER BY id DESC
            LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit_val], RawAssessmentSummary::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssessmentSummary::into_summary).collect()
  }
}
