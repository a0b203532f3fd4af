use super::migrations::init_with_migrations;
use crate::libs::config::DatabaseConfig;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;
use std::thread;

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the database at `path`, checks it answers, and applies pending migrations.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Db> {
        let mut conn = Self::open_without_migrations(path)?;
        init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }

    /// Opens and pings the database without touching the schema.
    pub fn open_without_migrations<P: AsRef<Path>>(path: P) -> Result<Connection> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("cannot open database at {}", path.as_ref().display()))?;
        conn.pragma_update(None, "foreign_keys", true)?;
        ping(&conn)?;

        Ok(conn)
    }

    /// Opens the configured database, retrying with a fixed backoff.
    ///
    /// Each attempt is open + ping + migrate. The error of the last attempt is
    /// returned once `connect_retries` attempts have failed.
    pub fn connect_with_retry(config: &DatabaseConfig) -> Result<Db> {
        let path = config.path()?;
        let attempts = config.connect_retries.max(1);

        let mut attempt = 1;
        loop {
            match Self::open(&path) {
                Ok(db) => {
                    msg_debug!(Message::DatabaseConnected(path.display().to_string()));
                    return Ok(db);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(attempt, error = %e, "database connection failed");
                    msg_warning!(Message::DatabaseRetrying(attempt, attempts));
                    thread::sleep(config.connect_backoff());
                    attempt += 1;
                }
                Err(e) => {
                    return Err(e.context(Message::DatabaseUnavailable(attempts).to_string()));
                }
            }
        }
    }
}

fn ping(conn: &Connection) -> Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
        .context("database did not answer ping")?;
    Ok(())
}
