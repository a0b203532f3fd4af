//! Database layer for the tms application.
//!
//! SQLite storage for accounts and tasks. Every store borrows the single
//! connection owned by [`db::Db`]; each operation is one statement committed
//! on its own.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tms::db::{db::Db, tasks::Tasks};
//! use tms::libs::task::NewTask;
//!
//! let db = Db::open("tms.db")?;
//! let tasks = Tasks::new(&db.conn);
//! tasks.create(1, &NewTask::new("buy milk", "2%"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup, ping and startup retry.
pub mod db;

/// Versioned schema changes.
pub mod migrations;

/// Task records scoped to their owner.
pub mod tasks;

/// Account records with hashed credentials.
pub mod users;
