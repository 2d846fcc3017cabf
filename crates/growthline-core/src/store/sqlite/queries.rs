//! Document CRUD queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use serde_json::Value;

use crate::{
    error::{Result, StoreResultExt, TimelineError},
    store::{apply_updates, Document, FieldUpdate, Fields, NewDocument},
};

const INSERT_DOCUMENT_SQL: &str = "INSERT INTO documents (collection, doc_id, data, create_time, update_time) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_DOCUMENT_SQL: &str = "SELECT doc_id, data, create_time, update_time FROM documents WHERE collection = ?1 AND doc_id = ?2";
const LIST_DOCUMENTS_SQL: &str = "SELECT doc_id, data, create_time, update_time FROM documents WHERE collection = ?1 ORDER BY doc_id";
const UPDATE_DOCUMENT_SQL: &str =
    "UPDATE documents SET data = ?1, update_time = ?2 WHERE collection = ?3 AND doc_id = ?4";
const DELETE_DOCUMENT_SQL: &str = "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2";

fn parse_time(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Timestamp>> {
    row.get::<_, Option<String>>(idx)?
        .map(|s| {
            s.parse::<Timestamp>()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        })
        .transpose()
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    let data: String = row.get(1)?;
    let fields: Fields = serde_json::from_str(&data)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    Ok(Document {
        id: row.get(0)?,
        fields,
        create_time: parse_time(row, 2)?,
        update_time: parse_time(row, 3)?,
    })
}

impl super::Database {
    /// Inserts a new document, resolving requested server timestamps to the
    /// write time.
    pub fn insert_document(
        &self,
        collection: &str,
        id: &str,
        document: &NewDocument,
    ) -> Result<Document> {
        let now = Timestamp::now();
        let now_str = now.to_string();

        let mut fields = document.fields.clone();
        for field in &document.server_timestamps {
            fields.insert(field.clone(), Value::String(now_str.clone()));
        }
        let data = serde_json::to_string(&fields)?;

        self.connection
            .execute(
                INSERT_DOCUMENT_SQL,
                params![collection, id, data, &now_str, &now_str],
            )
            .map_err(|e| {
                let duplicate = matches!(
                    &e,
                    rusqlite::Error::SqliteFailure(inner, _)
                        if inner.code == ErrorCode::ConstraintViolation
                );
                let message = if duplicate {
                    format!("Document {collection}/{id} already exists")
                } else {
                    "Failed to insert document".to_string()
                };
                TimelineError::store("create", message).with_source(e)
            })?;

        Ok(Document {
            id: id.to_string(),
            fields,
            create_time: Some(now),
            update_time: Some(now),
        })
    }

    /// Retrieves a document by collection and id.
    pub fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.connection
            .query_row(SELECT_DOCUMENT_SQL, params![collection, id], document_from_row)
            .optional()
            .store_context("get", "Failed to query document")
    }

    /// Lists a collection ordered by document id.
    pub fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let mut stmt = self
            .connection
            .prepare(LIST_DOCUMENTS_SQL)
            .store_context("list", "Failed to prepare query")?;

        let documents = stmt
            .query_map(params![collection], document_from_row)
            .store_context("list", "Failed to query documents")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .store_context("list", "Failed to read documents")?;

        Ok(documents)
    }

    /// Applies field updates to an existing document inside a transaction.
    pub fn update_document(
        &mut self,
        collection: &str,
        id: &str,
        updates: &[FieldUpdate],
    ) -> Result<()> {
        // Write lock is held from the read onward; concurrent updates wait on
        // the busy timeout.
        let tx = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .store_context("update", "Failed to begin transaction")?;

        let current = tx
            .query_row(SELECT_DOCUMENT_SQL, params![collection, id], document_from_row)
            .optional()
            .store_context("update", "Failed to query document")?
            .ok_or_else(|| {
                TimelineError::store("update", format!("Document {collection}/{id} not found"))
                    .build()
            })?;

        let mut fields = current.fields;
        apply_updates(&mut fields, updates).map_err(|e| {
            TimelineError::store("update", e.to_string()).build()
        })?;
        let data = serde_json::to_string(&fields)?;

        tx.execute(
            UPDATE_DOCUMENT_SQL,
            params![data, Timestamp::now().to_string(), collection, id],
        )
        .store_context("update", "Failed to update document")?;

        tx.commit().store_context("update", "Failed to commit transaction")
    }

    /// Deletes a document. Missing documents are ignored.
    pub fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        self.connection
            .execute(DELETE_DOCUMENT_SQL, params![collection, id])
            .store_context("delete", "Failed to delete document")?;
        Ok(())
    }
}
