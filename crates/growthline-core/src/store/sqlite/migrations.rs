//! Database schema initialization and migrations.

use crate::error::{Result, StoreResultExt};

/// Current on-disk schema version.
const SCHEMA_VERSION: &str = "1";

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        let schema_sql = include_str!("../../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .store_context("open", "Failed to initialize database schema")?;

        self.apply_migrations()
    }

    /// Records the schema version for databases created before it was tracked.
    fn apply_migrations(&self) -> Result<()> {
        self.connection
            .execute(
                "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('version', ?1)",
                [SCHEMA_VERSION],
            )
            .store_context("open", "Failed to record schema version")?;

        Ok(())
    }
}
