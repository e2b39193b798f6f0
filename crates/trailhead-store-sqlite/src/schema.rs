//! SQL schema for the Trailhead SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS places (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    source     TEXT NOT NULL,   -- origin system, e.g. 'osm'
    source_id  TEXT NOT NULL,   -- unique id within the origin system
    name       TEXT NOT NULL,
    kind       TEXT NOT NULL,   -- 'restaurant' | 'cafe' | 'lodging' | 'resort' | 'poi'
    lat        REAL NOT NULL,
    lon        REAL NOT NULL,
    address    TEXT,
    phone      TEXT,
    website    TEXT,
    rating     REAL,
    price      TEXT,
    tags       TEXT NOT NULL DEFAULT '{}',  -- JSON object of source tags
    updated_at TEXT NOT NULL,               -- ISO 8601 UTC
    UNIQUE (source, source_id)
);

-- Denormalized search blob, one row per place (rowid = places.id).
-- FTS5 has no native upsert, so every write path resynchronizes this table
-- with a delete-then-insert inside the same transaction.
CREATE VIRTUAL TABLE IF NOT EXISTS places_fts USING fts5(
    name, address, tags
);

CREATE INDEX IF NOT EXISTS places_kind_idx   ON places(kind);
CREATE INDEX IF NOT EXISTS places_latlon_idx ON places(lat, lon);

CREATE TABLE IF NOT EXISTS assessments (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    lat           REAL NOT NULL,
    lon           REAL NOT NULL,
    date          TEXT NOT NULL,   -- ISO 8601 calendar date
    elevation_m   REAL,
    avalanche_pct REAL NOT NULL,
    blizzard_pct  REAL NOT NULL,
    landslide_pct REAL NOT NULL,
    overall_pct   REAL NOT NULL,
    label         TEXT NOT NULL,
    reason        TEXT NOT NULL,
    source        TEXT NOT NULL,
    features_json TEXT,
    created_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS assessments_date_idx   ON assessments(date);
CREATE INDEX IF NOT EXISTS assessments_coords_idx ON assessments(lat, lon);

PRAGMA user_version = 1;
";
