//! SQLite backend for the `ecosystems` collection

use super::traits::{DocumentStore, OpenStore, StoreError, StoreResult};
use crate::schema::EcosystemMap;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed document store.
///
/// One row per map: the full document as JSON plus denormalized ordering
/// columns. Thread-safe via an internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS ecosystems (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                section TEXT NOT NULL,
                document_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Feed ordering key
            CREATE INDEX IF NOT EXISTS idx_ecosystems_updated_at
                ON ecosystems(updated_at DESC);

            -- WAL keeps reads concurrent with writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    /// RFC-3339 with microseconds; fixed-width UTC form so lexical order in
    /// SQL matches chronological order.
    fn timestamp_to_column(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn row_to_map(document_json: &str) -> StoreResult<EcosystemMap> {
        Ok(serde_json::from_str(document_json)?)
    }
}

impl DocumentStore for SqliteStore {
    fn put(&self, map: &EcosystemMap) -> StoreResult<()> {
        let document = serde_json::to_string(map)?;
        let conn = self.conn.lock().expect("sqlite mutex poisoned");
        conn.execute(
            r#"
            INSERT INTO ecosystems (id, name, section, document_json, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                section = excluded.section,
                document_json = excluded.document_json,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at
            "#,
            params![
                map.id,
                map.name,
                map.section,
                document,
                Self::timestamp_to_column(&map.created_at),
                Self::timestamp_to_column(&map.updated_at),
            ],
        )?;
        Ok(())
    }

    fn get(&self, id: &str) -> StoreResult<Option<EcosystemMap>> {
        let conn = self.conn.lock().expect("sqlite mutex poisoned");
        let document: Option<String> = conn
            .query_row(
                "SELECT document_json FROM ecosystems WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        document.as_deref().map(Self::row_to_map).transpose()
    }

    fn remove(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().expect("sqlite mutex poisoned");
        let affected = conn.execute("DELETE FROM ecosystems WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    fn list(&self) -> StoreResult<Vec<EcosystemMap>> {
        let conn = self.conn.lock().expect("sqlite mutex poisoned");
        let mut stmt =
            conn.prepare("SELECT document_json FROM ecosystems ORDER BY updated_at DESC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut maps = Vec::new();
        for document in rows {
            maps.push(Self::row_to_map(&document?)?);
        }
        Ok(maps)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EcosystemNode, NodeType};
    use chrono::Duration;

    fn saved_map(id: &str, name: &str, updated_offset_secs: i64) -> EcosystemMap {
        let mut map = EcosystemMap::new(name)
            .with_node(EcosystemNode::new("n1", "CGA", NodeType::Authority));
        map.id = id.to_string();
        map.updated_at = map.created_at + Duration::seconds(updated_offset_secs);
        map
    }

    #[test]
    fn put_then_get_round_trips_the_document() {
        let store = SqliteStore::open_in_memory().unwrap();
        let map = saved_map("m1", "Oversight", 0);

        store.put(&map).unwrap();
        let loaded = store.get("m1").unwrap().expect("document should exist");

        assert_eq!(loaded, map);
        assert_eq!(loaded.nodes[0].label, "CGA");
    }

    #[test]
    fn get_missing_id_is_none() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get("absent").unwrap().is_none());
    }

    #[test]
    fn put_replaces_existing_document() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put(&saved_map("m1", "before", 0)).unwrap();

        let mut replacement = saved_map("m1", "after", 1);
        replacement.nodes.clear();
        store.put(&replacement).unwrap();

        let loaded = store.get("m1").unwrap().unwrap();
        assert_eq!(loaded.name, "after");
        assert!(loaded.nodes.is_empty());
    }

    #[test]
    fn remove_reports_whether_a_row_existed() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put(&saved_map("m1", "x", 0)).unwrap();

        assert!(store.remove("m1").unwrap());
        assert!(!store.remove("m1").unwrap(), "second delete is a no-op");
        assert!(store.get("m1").unwrap().is_none());
    }

    #[test]
    fn list_orders_by_updated_at_descending() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.put(&saved_map("older", "older", 10)).unwrap();
        store.put(&saved_map("newest", "newest", 30)).unwrap();
        store.put(&saved_map("middle", "middle", 20)).unwrap();

        let ids: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, ["newest", "middle", "older"]);
    }

    #[test]
    fn store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ecomap.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.put(&saved_map("m1", "persisted", 0)).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("m1").unwrap().unwrap().name, "persisted");
    }
}
