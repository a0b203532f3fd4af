//! # tms - Task Management System
//!
//! A command-line task manager with password-protected accounts and
//! per-user task lists stored in SQLite.
//!
//! ## Features
//!
//! - **Accounts**: Sign-up with a password policy, Argon2id hashed credentials
//! - **Sessions**: Random bearer tokens with an expiry, login lockout after repeated failures
//! - **Recovery**: Password reset through two security questions
//! - **Tasks**: Create, list, update and delete tasks owned by the logged-in user
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tms::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
pub mod services;
