//! SQLite-backed session and reading persistence.
//!
//! Timestamps are stored as Unix milliseconds so range scans and ordering
//! are plain integer comparisons.

use crate::{AppError, AppResult};

use std::{
    fs,
    panic::Location,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use error_location::ErrorLocation;
use rusqlite::{Connection, OptionalExtension, Row, params};
use telemetry_recorder_core::{
    CoreError, CoreResult, SensorReading, Session, SessionId, SessionScheme, SessionStore,
};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS sessions (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    owner       TEXT NOT NULL,
    started_at  INTEGER NOT NULL,
    ended_at    INTEGER,
    scheme      TEXT NOT NULL DEFAULT 'tagged'
);
CREATE INDEX IF NOT EXISTS idx_sessions_owner ON sessions(owner, started_at);

CREATE TABLE IF NOT EXISTS readings (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    velocity     REAL NOT NULL,
    voltage      REAL NOT NULL,
    current      REAL NOT NULL,
    temperature  REAL NOT NULL,
    recorded_at  INTEGER NOT NULL,
    session_id   TEXT REFERENCES sessions(id)
);
CREATE INDEX IF NOT EXISTS idx_readings_session ON readings(session_id, recorded_at);
CREATE INDEX IF NOT EXISTS idx_readings_recorded_at ON readings(recorded_at);
";

const SESSION_COLUMNS: &str = "id, name, owner, started_at, ended_at, scheme";
const READING_COLUMNS: &str = "velocity, voltage, current, temperature, recorded_at, session_id";

/// Raw session row before id/scheme/timestamp parsing.
struct SessionRow {
    id: String,
    name: String,
    owner: String,
    started_at: i64,
    ended_at: Option<i64>,
    scheme: String,
}

/// Raw reading row before id/timestamp parsing.
struct ReadingRow {
    velocity: f64,
    voltage: f64,
    current: f64,
    temperature: f64,
    recorded_at: i64,
    session_id: Option<String>,
}

/// [`SessionStore`] over a single SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    #[track_caller]
    #[instrument]
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(|e| AppError::StorageError {
            reason: format!("Failed to open database {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let store = Self::init(conn)?;
        info!(database_path = ?path, "SQLite store opened");
        Ok(store)
    }

    /// Private in-memory database, used by tests.
    #[track_caller]
    pub fn open_in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| AppError::StorageError {
            reason: format!("Failed to open in-memory database: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        Self::init(conn)
    }

    #[track_caller]
    fn init(conn: Connection) -> AppResult<Self> {
        // journal_mode answers with a row, so it is read rather than batched.
        // In-memory databases report "memory" and stay that way.
        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(|e| AppError::StorageError {
                reason: format!("Failed to set journal mode: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        conn.pragma_update(None, "foreign_keys", true)
            .and_then(|_| conn.execute_batch(SCHEMA_SQL))
            .map_err(|e| AppError::StorageError {
                reason: format!("Failed to initialize schema: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(journal_mode = %journal_mode, "SQLite schema ready");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| {
            error!("SQLite connection lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    #[track_caller]
    fn query_sessions(&self, sql: &str, param: Option<&str>) -> CoreResult<Vec<Session>> {
        let conn = self.lock();
        let rows = conn
            .prepare(sql)
            .and_then(|mut stmt| {
                let mapped = match param {
                    Some(p) => stmt.query_map(params![p], session_row)?,
                    None => stmt.query_map([], session_row)?,
                };
                mapped.collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(persistence_error)?;

        rows.into_iter().map(SessionRow::into_session).collect()
    }

    #[track_caller]
    fn query_readings(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> CoreResult<Vec<SensorReading>> {
        let conn = self.lock();
        let rows = conn
            .prepare(sql)
            .and_then(|mut stmt| {
                stmt.query_map(params, reading_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(persistence_error)?;

        rows.into_iter().map(ReadingRow::into_reading).collect()
    }
}

impl SessionStore for SqliteStore {
    #[track_caller]
    fn create_session(&self, session: &Session) -> CoreResult<()> {
        self.lock()
            .execute(
                "INSERT INTO sessions (id, name, owner, started_at, ended_at, scheme)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    session.id.to_string(),
                    session.name,
                    session.owner,
                    session.started_at.timestamp_millis(),
                    session.ended_at.map(|t| t.timestamp_millis()),
                    session.scheme.as_str(),
                ],
            )
            .map_err(persistence_error)?;
        Ok(())
    }

    #[track_caller]
    fn close_session(&self, id: SessionId, ended_at: DateTime<Utc>) -> CoreResult<()> {
        let updated = self
            .lock()
            .execute(
                "UPDATE sessions SET ended_at = ?1 WHERE id = ?2 AND ended_at IS NULL",
                params![ended_at.timestamp_millis(), id.to_string()],
            )
            .map_err(persistence_error)?;

        if updated == 0 {
            return Err(CoreError::Persistence {
                reason: format!("No open session {}", id),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    #[track_caller]
    fn find_session(&self, id: SessionId) -> CoreResult<Option<Session>> {
        let row = self
            .lock()
            .query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1"),
                params![id.to_string()],
                session_row,
            )
            .optional()
            .map_err(persistence_error)?;

        row.map(SessionRow::into_session).transpose()
    }

    #[track_caller]
    fn open_sessions(&self) -> CoreResult<Vec<Session>> {
        self.query_sessions(
            &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE ended_at IS NULL"),
            None,
        )
    }

    #[track_caller]
    fn sessions_for_owner(&self, owner: &str) -> CoreResult<Vec<Session>> {
        self.query_sessions(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM sessions WHERE owner = ?1
                 ORDER BY started_at DESC"
            ),
            Some(owner),
        )
    }

    #[track_caller]
    fn append_reading(&self, reading: &SensorReading) -> CoreResult<()> {
        self.lock()
            .execute(
                "INSERT INTO readings (velocity, voltage, current, temperature, recorded_at, session_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    reading.velocity,
                    reading.voltage,
                    reading.current,
                    reading.temperature,
                    reading.recorded_at.timestamp_millis(),
                    reading.session_id.map(|id| id.to_string()),
                ],
            )
            .map_err(persistence_error)?;
        Ok(())
    }

    #[track_caller]
    fn readings_for_session(&self, id: SessionId) -> CoreResult<Vec<SensorReading>> {
        self.query_readings(
            &format!(
                "SELECT {READING_COLUMNS} FROM readings WHERE session_id = ?1
                 ORDER BY recorded_at ASC, id ASC"
            ),
            params![id.to_string()],
        )
    }

    #[track_caller]
    fn readings_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> CoreResult<Vec<SensorReading>> {
        self.query_readings(
            &format!(
                "SELECT {READING_COLUMNS} FROM readings
                 WHERE recorded_at >= ?1 AND recorded_at <= ?2
                 ORDER BY recorded_at ASC, id ASC"
            ),
            params![from.timestamp_millis(), to.timestamp_millis()],
        )
    }
}

fn session_row(row: &Row<'_>) -> rusqlite::Result<SessionRow> {
    Ok(SessionRow {
        id: row.get(0)?,
        name: row.get(1)?,
        owner: row.get(2)?,
        started_at: row.get(3)?,
        ended_at: row.get(4)?,
        scheme: row.get(5)?,
    })
}

fn reading_row(row: &Row<'_>) -> rusqlite::Result<ReadingRow> {
    Ok(ReadingRow {
        velocity: row.get(0)?,
        voltage: row.get(1)?,
        current: row.get(2)?,
        temperature: row.get(3)?,
        recorded_at: row.get(4)?,
        session_id: row.get(5)?,
    })
}

impl SessionRow {
    #[track_caller]
    fn into_session(self) -> CoreResult<Session> {
        let scheme = SessionScheme::parse(&self.scheme).ok_or_else(|| CoreError::Persistence {
            reason: format!("Unknown session scheme {:?}", self.scheme),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Session {
            id: parse_id(&self.id)?,
            name: self.name,
            owner: self.owner,
            started_at: from_millis(self.started_at)?,
            ended_at: self.ended_at.map(from_millis).transpose()?,
            scheme,
        })
    }
}

impl ReadingRow {
    #[track_caller]
    fn into_reading(self) -> CoreResult<SensorReading> {
        Ok(SensorReading {
            velocity: self.velocity,
            voltage: self.voltage,
            current: self.current,
            temperature: self.temperature,
            recorded_at: from_millis(self.recorded_at)?,
            session_id: self.session_id.as_deref().map(parse_id).transpose()?,
        })
    }
}

#[track_caller]
fn parse_id(raw: &str) -> CoreResult<SessionId> {
    Uuid::parse_str(raw).map_err(|e| CoreError::Persistence {
        reason: format!("Corrupt session id {:?}: {}", raw, e),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn from_millis(millis: i64) -> CoreResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| CoreError::Persistence {
        reason: format!("Timestamp out of range: {}", millis),
        location: ErrorLocation::from(Location::caller()),
    })
}

#[track_caller]
fn persistence_error(e: rusqlite::Error) -> CoreError {
    CoreError::Persistence {
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}
