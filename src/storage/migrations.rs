use anyhow::{bail, Context, Result};
use rusqlite::Connection;

pub(crate) const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Create the key-value table on a fresh database and stamp `user_version`.
///
/// There is a single schema, so a database is either current, fresh, or
/// written by a newer build and refused.
pub fn ensure_schema(conn: &mut Connection) -> Result<()> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    match version {
        CURRENT_SCHEMA_VERSION => Ok(()),
        0 => {
            let tx = conn
                .transaction()
                .context("failed to open schema transaction")?;
            tx.execute_batch(include_str!("schemas/schema_v1.sql"))
                .context("failed to execute schema_v1.sql")?;
            tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
                .context("failed to update user_version pragma")?;
            tx.commit().context("failed to commit storage schema")
        }
        newer => bail!(
            "storage version ({newer}) is not supported by this build (expects {CURRENT_SCHEMA_VERSION})"
        ),
    }
}
