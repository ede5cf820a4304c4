//! SQL schema for the poolcare SQLite store.
//!
//! Applied every time the store is opened. There are no migrations.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// Foreign keys are declared for documentation only. Every connection turns
/// `PRAGMA foreign_keys` off, so dangling references are accepted.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS responsibles (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL UNIQUE,
    active      INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS clients (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT    NOT NULL,
    address          TEXT,
    district         TEXT,
    phone            TEXT,
    responsible_id   INTEGER REFERENCES responsibles(id),
    service_day      TEXT,              -- 'Lunes' .. 'Domingo'
    price_per_visit  REAL    NOT NULL DEFAULT 0,
    active           INTEGER NOT NULL DEFAULT 1,
    notes            TEXT,
    created_at       TEXT    NOT NULL,  -- RFC 3339 UTC
    updated_at       TEXT    NOT NULL
);

-- Visits are append-only. No UPDATE or DELETE is issued against this table.
CREATE TABLE IF NOT EXISTS visits (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id       INTEGER NOT NULL REFERENCES clients(id),
    visit_date      TEXT    NOT NULL,   -- YYYY-MM-DD
    responsible_id  INTEGER REFERENCES responsibles(id),
    price           REAL    NOT NULL DEFAULT 0,
    done            INTEGER NOT NULL DEFAULT 0,
    notes           TEXT,
    created_at      TEXT    NOT NULL
);

-- One row per (week, client); writers use INSERT OR REPLACE.
CREATE TABLE IF NOT EXISTS weekly_assignments (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    week_start      TEXT    NOT NULL,   -- YYYY-MM-DD, a Monday
    client_id       INTEGER NOT NULL REFERENCES clients(id),
    responsible_id  INTEGER REFERENCES responsibles(id),
    service_day     TEXT,
    price           REAL    NOT NULL DEFAULT 0,
    assigned        INTEGER NOT NULL DEFAULT 1,
    done            INTEGER NOT NULL DEFAULT 0,
    notes           TEXT,
    created_at      TEXT    NOT NULL,
    UNIQUE (week_start, client_id)
);

CREATE INDEX IF NOT EXISTS clients_responsible_idx   ON clients(responsible_id);
CREATE INDEX IF NOT EXISTS clients_day_idx           ON clients(service_day);
CREATE INDEX IF NOT EXISTS visits_client_idx         ON visits(client_id);
CREATE INDEX IF NOT EXISTS visits_date_idx           ON visits(visit_date);
CREATE INDEX IF NOT EXISTS assignments_week_idx      ON weekly_assignments(week_start);
CREATE INDEX IF NOT EXISTS assignments_client_idx    ON weekly_assignments(client_id);
";
