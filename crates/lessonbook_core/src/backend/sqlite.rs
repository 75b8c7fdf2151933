//! Live backend over the SQLite `records` table.
//!
//! # Responsibility
//! - Persist each entity as a JSON body keyed by `(collection, id)`.
//! - Scope reads by owner and keep insertion order.
//!
//! # Invariants
//! - Write paths call `Entity::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - `bulk_remove` runs in one transaction.

use crate::backend::{BackendAdapter, BackendError, BackendResult};
use crate::db::DbError;
use crate::model::{Entity, EntityId};
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection};
use std::marker::PhantomData;
use uuid::Uuid;

/// SQLite-backed adapter for one collection.
pub struct SqliteBackend<'conn, T> {
    conn: &'conn Connection,
    _entity: PhantomData<fn() -> T>,
}

impl<'conn, T: Entity> SqliteBackend<'conn, T> {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    fn failed(op: &'static str) -> impl FnOnce(rusqlite::Error) -> BackendError {
        let tag = DbError::record(T::COLLECTION, op);
        move |source| BackendError::Db(tag(source))
    }

    fn insert(&self, entity: &T) -> BackendResult<()> {
        entity.validate()?;
        let body = serde_json::to_string(entity)?;
        self.conn.execute(
            "INSERT INTO records (collection, id, owner_id, body) VALUES (?1, ?2, ?3, ?4);",
            params![
                T::COLLECTION,
                entity.id().to_string(),
                entity.owner_id(),
                body
            ],
        )
        .map_err(Self::failed("insert"))?;
        Ok(())
    }

    fn delete_one(conn: &Connection, id: EntityId) -> BackendResult<()> {
        let changed = conn.execute(
            "DELETE FROM records WHERE collection = ?1 AND id = ?2;",
            params![T::COLLECTION, id.to_string()],
        )
        .map_err(Self::failed("delete"))?;
        if changed == 0 {
            return Err(BackendError::NotFound(id));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl<'conn, T: Entity> BackendAdapter<T> for SqliteBackend<'conn, T> {
    async fn fetch_all(&self, owner_id: &str) -> BackendResult<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, body FROM records
                 WHERE collection = ?1 AND owner_id = ?2
                 ORDER BY seq ASC;",
            )
            .map_err(Self::failed("fetch"))?;
        let mut rows = stmt
            .query(params![T::COLLECTION, owner_id])
            .map_err(Self::failed("fetch"))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next().map_err(Self::failed("fetch"))? {
            let id: String = row.get("id").map_err(Self::failed("fetch"))?;
            let body: String = row.get("body").map_err(Self::failed("fetch"))?;
            let entity: T = serde_json::from_str(&body).map_err(|err| {
                BackendError::InvalidData(format!(
                    "undecodable {} record `{id}`: {err}",
                    T::COLLECTION
                ))
            })?;
            if entity.id().to_string() != id {
                return Err(BackendError::InvalidData(format!(
                    "{} record `{id}` carries mismatched body id {}",
                    T::COLLECTION,
                    entity.id()
                )));
            }
            entity.validate().map_err(|err| {
                BackendError::InvalidData(format!("{} record `{id}`: {err}", T::COLLECTION))
            })?;
            records.push(entity);
        }

        debug!(
            "event=backend_fetch module=backend status=ok backend=sqlite collection={} count={}",
            T::COLLECTION,
            records.len()
        );
        Ok(records)
    }

    async fn create(&self, draft: &T::Draft) -> BackendResult<T> {
        let entity = T::from_draft(Uuid::new_v4(), draft);
        self.insert(&entity)?;
        Ok(entity)
    }

    async fn update(&self, entity: &T) -> BackendResult<T> {
        entity.validate()?;
        let body = serde_json::to_string(entity)?;
        let changed = self.conn.execute(
            "UPDATE records
             SET
                owner_id = ?1,
                body = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE collection = ?3 AND id = ?4;",
            params![
                entity.owner_id(),
                body,
                T::COLLECTION,
                entity.id().to_string()
            ],
        )
        .map_err(Self::failed("update"))?;
        if changed == 0 {
            return Err(BackendError::NotFound(entity.id()));
        }
        Ok(entity.clone())
    }

    async fn remove(&self, id: EntityId) -> BackendResult<()> {
        Self::delete_one(self.conn, id)
    }

    async fn bulk_remove(&self, ids: &[EntityId]) -> BackendResult<()> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(Self::failed("bulk_remove"))?;
        for id in ids {
            // Dropping `tx` on the error path rolls every delete back.
            Self::delete_one(&tx, *id)?;
        }
        tx.commit().map_err(Self::failed("bulk_remove"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqliteBackend;
    use crate::backend::{BackendAdapter, BackendError};
    use crate::db::{open_db_in_memory, DbError};
    use crate::model::todo::{Todo, TodoDraft};
    use futures::executor::block_on;

    fn draft(text: &str) -> TodoDraft {
        TodoDraft {
            owner_id: "owner-a".to_string(),
            text: text.to_string(),
            due: None,
            holder: None,
        }
    }

    #[test]
    fn bulk_remove_is_all_or_nothing() {
        let conn = open_db_in_memory().unwrap();
        let backend = SqliteBackend::<Todo>::new(&conn);

        let kept = block_on(backend.create(&draft("kept"))).unwrap();
        let missing = uuid::Uuid::new_v4();
        let err = block_on(backend.bulk_remove(&[kept.id, missing])).unwrap_err();
        assert!(matches!(err, BackendError::NotFound(id) if id == missing));

        let rows = block_on(backend.fetch_all("owner-a")).unwrap();
        assert_eq!(rows, vec![kept]);
    }

    #[test]
    fn fetch_all_is_scoped_by_owner() {
        let conn = open_db_in_memory().unwrap();
        let backend = SqliteBackend::<Todo>::new(&conn);

        block_on(backend.create(&draft("mine"))).unwrap();
        let mut foreign = draft("theirs");
        foreign.owner_id = "owner-b".to_string();
        block_on(backend.create(&foreign)).unwrap();

        let rows = block_on(backend.fetch_all("owner-a")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text, "mine");
    }

    #[test]
    fn sqlite_failures_name_the_collection() {
        let conn = open_db_in_memory().unwrap();
        let backend = SqliteBackend::<Todo>::new(&conn);
        conn.execute_batch("DROP TABLE records;").unwrap();

        let err = block_on(backend.fetch_all("owner-a")).unwrap_err();
        assert!(matches!(
            &err,
            BackendError::Db(DbError::Record {
                collection: "todos",
                op: "fetch",
                ..
            })
        ));
        assert!(err.to_string().starts_with("fetch on todos failed"));
    }
}
