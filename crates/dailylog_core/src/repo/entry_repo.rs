//! Entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `entries` table.
//! - Enforce the one-entry-per-date invariant atomically.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Date collision check and write share one `IMMEDIATE` transaction.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Listing order is `date ASC, id ASC`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::entry::{Entry, EntryId, EntryInput, EntryValidationError, DATE_FORMAT};
use chrono::NaiveDate;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    date,
    sleep_hours,
    calories,
    hydration,
    running_mileage,
    notes
FROM entries";

const ENTRY_COLUMNS: &[&str] = &[
    "id",
    "date",
    "sleep_hours",
    "calories",
    "hydration",
    "running_mileage",
    "notes",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    /// No entry with this id exists.
    NotFound(EntryId),
    /// Another entry already holds this date.
    DuplicateDate(NaiveDate),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "entry not found: {id}"),
            Self::DuplicateDate(date) => write!(f, "an entry for {date} already exists"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing entries.
///
/// Date bounds are inclusive. Results are always ordered by `date ASC, id ASC`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for entry CRUD operations.
pub trait EntryRepository {
    /// Persists a new entry; fails with `DuplicateDate` on a date collision.
    fn create_entry(&mut self, input: &EntryInput) -> RepoResult<Entry>;
    /// Overwrites every field of an existing entry.
    fn update_entry(&mut self, id: EntryId, input: &EntryInput) -> RepoResult<Entry>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// Permanently removes an entry.
    fn delete_entry(&mut self, id: EntryId) -> RepoResult<()>;
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` for a mismatched layout.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn create_entry(&mut self, input: &EntryInput) -> RepoResult<Entry> {
        let entry = Entry::new(input.clone())?;
        let date_text = format_date(entry.date);
        let id_text = entry.id.to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if date_taken(&tx, &date_text, None)? {
            return Err(RepoError::DuplicateDate(entry.date));
        }

        tx.execute(
            "INSERT INTO entries (
                id,
                date,
                sleep_hours,
                calories,
                hydration,
                running_mileage,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                id_text,
                date_text,
                entry.sleep_hours,
                entry.calories,
                entry.hydration,
                entry.running_mileage,
                entry.notes.as_deref(),
            ],
        )
        .map_err(|err| map_write_error(err, entry.date))?;
        tx.commit()?;

        debug!("event=entry_create module=repo status=ok entry_id={id_text}");
        Ok(entry)
    }

    fn update_entry(&mut self, id: EntryId, input: &EntryInput) -> RepoResult<Entry> {
        input.validate()?;
        let id_text = id.to_string();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        // Unknown ids, nil included, are reported before the entry is built.
        if !entry_exists(&tx, &id_text)? {
            return Err(RepoError::NotFound(id));
        }
        let entry = Entry::with_id(id, input.clone())?;
        let date_text = format_date(entry.date);
        if date_taken(&tx, &date_text, Some(&id_text))? {
            return Err(RepoError::DuplicateDate(entry.date));
        }

        tx.execute(
            "UPDATE entries
             SET
                date = ?2,
                sleep_hours = ?3,
                calories = ?4,
                hydration = ?5,
                running_mileage = ?6,
                notes = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                id_text,
                date_text,
                entry.sleep_hours,
                entry.calories,
                entry.hydration,
                entry.running_mileage,
                entry.notes.as_deref(),
            ],
        )
        .map_err(|err| map_write_error(err, entry.date))?;
        tx.commit()?;

        debug!("event=entry_update module=repo status=ok entry_id={id_text}");
        Ok(entry)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn delete_entry(&mut self, id: EntryId) -> RepoResult<()> {
        let id_text = id.to_string();
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1;", [id_text.as_str()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=entry_delete module=repo status=ok entry_id={id_text}");
        Ok(())
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        let mut sql = format!("{ENTRY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(from) = query.from {
            sql.push_str(" AND date >= ?");
            bind_values.push(Value::Text(format_date(from)));
        }
        if let Some(to) = query.to {
            sql.push_str(" AND date <= ?");
            bind_values.push(Value::Text(format_date(to)));
        }

        sql.push_str(" ORDER BY date ASC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_taken(conn: &Connection, date_text: &str, exclude_id: Option<&str>) -> RepoResult<bool> {
    let taken: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM entries
            WHERE date = ?1
              AND (?2 IS NULL OR id <> ?2)
        );",
        params![date_text, exclude_id],
        |row| row.get(0),
    )?;
    Ok(taken == 1)
}

fn entry_exists(conn: &Connection, id_text: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM entries WHERE id = ?1);",
        [id_text],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

// The unique index on `date` is the last line of defence behind `date_taken`.
fn map_write_error(err: rusqlite::Error, date: NaiveDate) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepoError::DuplicateDate(date)
        }
        _ => err.into(),
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in entries.id"))
    })?;

    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date value `{date_text}` in entries.date"))
    })?;

    let entry = Entry::with_id(
        id,
        EntryInput {
            date,
            sleep_hours: row.get("sleep_hours")?,
            calories: row.get("calories")?,
            hydration: row.get("hydration")?,
            running_mileage: row.get("running_mileage")?,
            notes: row.get("notes")?,
        },
    )?;
    Ok(entry)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "entries")? {
        return Err(RepoError::MissingRequiredTable("entries"));
    }

    for &column in ENTRY_COLUMNS {
        if !table_has_column(conn, "entries", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "entries",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{map_write_error, RepoError};
    use crate::db::open_db_in_memory;
    use chrono::NaiveDate;
    use rusqlite::params;

    const INSERT_SQL: &str =
        "INSERT INTO entries (id, date, sleep_hours, calories, hydration, running_mileage)
         VALUES (?1, '2024-03-01', 7.0, ?2, 2.0, 1.0);";

    #[test]
    fn unique_index_violation_maps_to_duplicate_date() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            INSERT_SQL,
            params!["00000000-0000-4000-8000-000000000001", 2000],
        )
        .unwrap();
        let err = conn
            .execute(INSERT_SQL, params!["00000000-0000-4000-8000-000000000002", 2100])
            .unwrap_err();

        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(matches!(
            map_write_error(err, day),
            RepoError::DuplicateDate(d) if d == day
        ));
    }

    #[test]
    fn other_constraint_failures_stay_db_errors() {
        let conn = open_db_in_memory().unwrap();
        let err = conn
            .execute(INSERT_SQL, params!["00000000-0000-4000-8000-000000000001", -5])
            .unwrap_err();

        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(matches!(map_write_error(err, day), RepoError::Db(_)));
    }
}
