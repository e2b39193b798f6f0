//! [`SqliteStore`] — the SQLite implementation of the store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use trailhead_core::{
  geo,
  place::{NearbyPlace, NewPlace, Place, PlaceId},
  similarity::{self, SimilarityFn},
  store::{NearbyQuery, PlaceStore},
};

use crate::{
  Error, Result,
  encode::{
    PLACE_COLUMNS, PLACE_COLUMNS_QUALIFIED, RawPlace, encode_dt, encode_kind,
    encode_tags, tags_blob,
  },
  schema::SCHEMA,
};

// ─── Dedup thresholds ────────────────────────────────────────────────────────

/// Maximum distance between two same-kind places still presumed to be one
/// physical establishment.
const DEDUP_RADIUS_M: f64 = 200.0;

/// Minimum name similarity (0–100) for the same presumption.
const DEDUP_SIMILARITY: f64 = 90.0;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Trailhead store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. Every call
/// funnels through the connection's single worker thread, and each upsert
/// runs its lookup, dedup scan, write, and index sync inside one closure
/// there. Concurrent upserts therefore never interleave: two in-flight
/// records that duplicate each other cannot both land as new rows.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  similarity:      SimilarityFn,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, similarity: similarity::name_similarity };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, similarity: similarity::name_similarity };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the name-similarity function used by the dedup pass.
  ///
  /// The replacement must honour the [`SimilarityFn`] contract: 0–100,
  /// symmetric, 100 iff equal under case folding.
  pub fn with_similarity(mut self, similarity: SimilarityFn) -> Self {
    self.similarity = similarity;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Wrap a non-SQLite error for transport out of a connection closure.
fn other_err(
  e: impl std::error::Error + Send + Sync + 'static,
) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

/// Rewrite the FTS row for `id` from the `places` row's current state.
/// Delete-then-insert because FTS5 has no native upsert; idempotent.
fn sync_text_index(
  tx: &rusqlite::Transaction<'_>,
  id: PlaceId,
) -> std::result::Result<(), tokio_rusqlite::Error> {
  let (name, address, tags_json): (String, Option<String>, String) = tx
    .query_row(
      "SELECT name, address, tags FROM places WHERE id = ?1",
      rusqlite::params![id],
      |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

  let tags = crate::encode::decode_tags(&tags_json).map_err(other_err)?;
  let blob = tags_blob(&tags);

  tx.execute(
    "DELETE FROM places_fts WHERE rowid = ?1",
    rusqlite::params![id],
  )?;
  tx.execute(
    "INSERT INTO places_fts (rowid, name, address, tags)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![id, name, address, blob],
  )?;
  Ok(())
}

// ─── PlaceStore impl ─────────────────────────────────────────────────────────

impl PlaceStore for SqliteStore {
  type Error = Error;

  async fn upsert(&self, record: NewPlace) -> Result<PlaceId> {
    record.validate()?;

    let similarity = self.similarity;
    let tags_json = encode_tags(&record.tags)?;
    let now_str = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let kind_str = encode_kind(record.kind);

        // 1. Exact source identity is authoritative: overwrite everything.
        let existing: Option<PlaceId> = tx
          .query_row(
            "SELECT id FROM places WHERE source = ?1 AND source_id = ?2",
            rusqlite::params![record.source, record.source_id],
            |row| row.get(0),
          )
          .optional()?;

        let id = if let Some(id) = existing {
          tx.execute(
            "UPDATE places
                SET name = ?1, kind = ?2, lat = ?3, lon = ?4, address = ?5,
                    phone = ?6, website = ?7, rating = ?8, price = ?9,
                    tags = ?10, updated_at = ?11
              WHERE id = ?12",
            rusqlite::params![
              record.name,
              kind_str,
              record.lat,
              record.lon,
              record.address,
              record.phone,
              record.website,
              record.rating,
              record.price,
              tags_json,
              now_str,
              id,
            ],
          )?;
          id
        } else {
          // 2. Near-duplicate pass over same-kind rows. First qualifying
          //    hit in insertion order wins; no best-match tie-break.
          let mut stmt = tx.prepare(
            "SELECT id, name, lat, lon FROM places WHERE kind = ?1
             ORDER BY id",
          )?;
          let candidates = stmt
            .query_map(rusqlite::params![kind_str], |row| {
              Ok((
                row.get::<_, PlaceId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, f64>(3)?,
              ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          drop(stmt);

          let duplicate = candidates.into_iter().find(|(_, name, lat, lon)| {
            geo::haversine_m(record.lat, record.lon, *lat, *lon)
              <= DEDUP_RADIUS_M
              && similarity(&record.name, name) >= DEDUP_SIMILARITY
          });

          if let Some((id, ..)) = duplicate {
            // Lower-confidence match: take the incoming name, fill only
            // empty contact fields, leave everything else untouched.
            tx.execute(
              "UPDATE places
                  SET name       = ?1,
                      address    = COALESCE(address, ?2),
                      phone      = COALESCE(phone, ?3),
                      website    = COALESCE(website, ?4),
                      updated_at = ?5
                WHERE id = ?6",
              rusqlite::params![
                record.name,
                record.address,
                record.phone,
                record.website,
                now_str,
                id,
              ],
            )?;
            id
          } else {
            tx.execute(
              "INSERT INTO places (source, source_id, name, kind, lat, lon,
                                   address, phone, website, rating, price,
                                   tags, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12,
                       ?13)",
              rusqlite::params![
                record.source,
                record.source_id,
                record.name,
                kind_str,
                record.lat,
                record.lon,
                record.address,
                record.phone,
                record.website,
                record.rating,
                record.price,
                tags_json,
                now_str,
              ],
            )?;
            tx.last_insert_rowid()
          }
        };

        // 3. Whatever branch ran, the index row must mirror post-write
        //    name/address/tags.
        sync_text_index(&tx, id)?;

        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(id)
  }

  async fn upsert_batch(&self, records: Vec<NewPlace>) -> Result<usize> {
    let mut absorbed = 0usize;
    for record in records {
      // Malformed records are the producer's noise, not our failure: log and
      // move on. Storage errors still abort the batch.
      if let Err(e) = record.validate() {
        tracing::warn!(
          source = %record.source,
          source_id = %record.source_id,
          error = %e,
          "skipping malformed candidate record",
        );
        continue;
      }
      self.upsert(record).await?;
      absorbed += 1;
    }
    Ok(absorbed)
  }

  async fn get_place(&self, id: PlaceId) -> Result<Option<Place>> {
    let raw: Option<RawPlace> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PLACE_COLUMNS} FROM places WHERE id = ?1"),
              rusqlite::params![id],
              RawPlace::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPlace::into_place).transpose()
  }

  async fn search_nearby(
    &self,
    query: &NearbyQuery,
  ) -> Result<Vec<NearbyPlace>> {
    let kind_str = query.kind.map(encode_kind);
    let (lat, lon) = (query.lat, query.lon);

    let raws: Vec<RawPlace> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(k) = kind_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE kind = ?1"
          ))?;
          stmt
            .query_map(rusqlite::params![k], RawPlace::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("SELECT {PLACE_COLUMNS} FROM places"))?;
          stmt
            .query_map([], RawPlace::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    // Full scan: compute the distance to every row, keep those inside the
    // (inclusive) radius. Comparison uses the unrounded distance; only the
    // attached value is rounded for output.
    let mut out = Vec::new();
    for raw in raws {
      let place = raw.into_place()?;
      let d = geo::haversine_m(lat, lon, place.lat, place.lon);
      if d <= query.radius_m {
        out.push(NearbyPlace { place, distance_m: (d * 10.0).round() / 10.0 });
      }
    }
    out.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    out.truncate(query.limit);
    Ok(out)
  }

  async fn search_text(&self, query: &str, limit: usize) -> Result<Vec<Place>> {
    let q = query.to_owned();
    let limit_val = limit as i64;

    let raws: Vec<RawPlace> = self
      .conn
      .call(move |conn| {
        // Primary path: FTS5 MATCH in the index's relevance order.
        let fts = (|| -> rusqlite::Result<Vec<RawPlace>> {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PLACE_COLUMNS_QUALIFIED}
               FROM places_fts f
               JOIN places p ON p.id = f.rowid
              WHERE places_fts MATCH ?1
              ORDER BY f.rank
              LIMIT ?2"
          ))?;
          stmt
            .query_map(rusqlite::params![q, limit_val], RawPlace::from_row)?
            .collect()
        })();

        match fts {
          Ok(rows) => Ok(rows),
          Err(e) => {
            // Malformed MATCH syntax (or a broken index) must not surface;
            // degrade to a plain substring scan over name and address.
            tracing::debug!(
              error = %e,
              "text index query failed, using substring fallback",
            );
            let pattern = format!("%{q}%");
            let mut stmt = conn.prepare(&format!(
              "SELECT {PLACE_COLUMNS} FROM places
                WHERE name LIKE ?1 OR address LIKE ?1
                LIMIT ?2"
            ))?;
            Ok(
              stmt
                .query_map(
                  rusqlite::params![pattern, limit_val],
                  RawPlace::from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            )
          }
        }
      })
      .await?;

    raws.into_iter().map(RawPlace::into_place).collect()
  }
}

// ─── Test hooks ──────────────────────────────────────────────────────────────

#[cfg(test)]
impl SqliteStore {
  /// Drop the FTS table so the primary text-search path fails and the
  /// substring fallback has to carry the query.
  pub(crate) async fn drop_text_index(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch("DROP TABLE places_fts;")?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Count rows in `places` — upsert assertions need to see row identity.
  pub(crate) async fn count_places(&self) -> Result<i64> {
    let n = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM places", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n)
  }
}
