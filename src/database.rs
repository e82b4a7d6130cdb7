use chrono::{Local, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{Connection, Result, Row};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

use crate::types::{Numbers, Pick, PickId, UserId};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn create_database_with_connection(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS picks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner INTEGER NOT NULL,
            numbers TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_picks_owner ON picks (owner)",
        [],
    )?;

    Ok(())
}

pub fn insert_pick(conn: &Connection, owner: UserId, numbers: &Numbers) -> Result<Pick> {
    let created_at = Local::now().naive_local();
    conn.execute(
        "INSERT INTO picks (owner, numbers, created_at) VALUES (?1, ?2, ?3)",
        (
            owner,
            numbers.canonical(),
            created_at.format(TIMESTAMP_FORMAT).to_string(),
        ),
    )?;

    Ok(Pick {
        id: conn.last_insert_rowid(),
        owner,
        numbers: *numbers,
        created_at,
    })
}

pub fn get_picks_by_owner(conn: &Connection, owner: UserId) -> Result<Vec<Pick>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner, numbers, created_at FROM picks WHERE owner = ?1 ORDER BY id ASC",
    )?;
    let pick_iter = stmt.query_map([owner], pick_from_row)?;

    let mut picks = Vec::new();
    for pick in pick_iter {
        picks.push(pick?);
    }
    Ok(picks)
}

/// Deletes a pick only when it belongs to `owner`. Reports whether a row went away.
pub fn delete_pick(conn: &Connection, owner: UserId, id: PickId) -> Result<bool> {
    let removed = conn.execute(
        "DELETE FROM picks WHERE id = ?1 AND owner = ?2",
        (id, owner),
    )?;
    Ok(removed > 0)
}

fn pick_from_row(row: &Row<'_>) -> Result<Pick> {
    let numbers_text: String = row.get(2)?;
    let numbers = numbers_text
        .parse::<Numbers>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    let created_text: String = row.get(3)?;
    let created_at = NaiveDateTime::parse_from_str(&created_text, TIMESTAMP_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(Pick {
        id: row.get(0)?,
        owner: row.get(1)?,
        numbers,
        created_at,
    })
}

/// Shared handle over one SQLite connection.
///
/// Each operation touches a single row, so a plain mutex is all the
/// coordination the table needs.
pub struct PickStore {
    conn: Mutex<Connection>,
}

impl PickStore {
    pub fn new(conn: Connection) -> Result<Self> {
        create_database_with_connection(&conn)?;
        Ok(Self::from_initialized(conn))
    }

    /// Wraps a connection whose tables already exist.
    pub(crate) fn from_initialized(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, owner: UserId, numbers: &Numbers) -> Result<Pick> {
        let pick = insert_pick(&self.conn(), owner, numbers)?;
        info!("pick #{} registered for user {}: {}", pick.id, owner, numbers);
        Ok(pick)
    }

    pub fn list(&self, owner: UserId) -> Result<Vec<Pick>> {
        get_picks_by_owner(&self.conn(), owner)
    }

    pub fn remove(&self, owner: UserId, id: PickId) -> Result<bool> {
        let removed = delete_pick(&self.conn(), owner, id)?;
        if removed {
            info!("pick #{} removed by user {}", id, owner);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(raw: &str) -> Numbers {
        raw.parse().unwrap()
    }

    #[test]
    fn add_then_list_returns_canonical_numbers() {
        let store = PickStore::open_in_memory().unwrap();
        let pick = store.add(7, &numbers("56 40 33 23 15 4")).unwrap();

        let picks = store.list(7).unwrap();
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].id, pick.id);
        assert_eq!(picks[0].numbers.canonical(), "04,15,23,33,40,56");
        assert_eq!(picks[0].created_at, pick.created_at);
    }

    #[test]
    fn list_is_owner_scoped_and_in_insertion_order() {
        let store = PickStore::open_in_memory().unwrap();
        let a = store.add(1, &numbers("1,2,3,4,5,6")).unwrap();
        store.add(2, &numbers("7,8,9,10,11,12")).unwrap();
        let b = store.add(1, &numbers("1,2,3,4,5,6")).unwrap();

        let ids: Vec<PickId> = store.list(1).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
        assert_eq!(store.list(2).unwrap().len(), 1);
        assert!(store.list(3).unwrap().is_empty());
    }

    #[test]
    fn remove_reports_absence_on_second_call() {
        let store = PickStore::open_in_memory().unwrap();
        let pick = store.add(1, &numbers("1,2,3,4,5,6")).unwrap();

        assert!(store.remove(1, pick.id).unwrap());
        assert!(!store.remove(1, pick.id).unwrap());
    }

    #[test]
    fn remove_ignores_other_owners_picks() {
        let store = PickStore::open_in_memory().unwrap();
        let pick = store.add(1, &numbers("1,2,3,4,5,6")).unwrap();

        assert!(!store.remove(2, pick.id).unwrap());
        assert_eq!(store.list(1).unwrap().len(), 1);
    }

    #[test]
    fn ids_are_not_reused() {
        let store = PickStore::open_in_memory().unwrap();
        let first = store.add(1, &numbers("1,2,3,4,5,6")).unwrap();
        store.remove(1, first.id).unwrap();
        let second = store.add(1, &numbers("1,2,3,4,5,6")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn corrupt_row_surfaces_as_conversion_error() {
        let conn = Connection::open_in_memory().unwrap();
        create_database_with_connection(&conn).unwrap();
        conn.execute(
            "INSERT INTO picks (owner, numbers, created_at) VALUES (1, '1,2,3', '2025-01-01T10:00:00')",
            [],
        )
        .unwrap();
        assert!(matches!(
            get_picks_by_owner(&conn, 1),
            Err(rusqlite::Error::FromSqlConversionFailure(2, _, _))
        ));
    }
}
