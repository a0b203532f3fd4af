//! Credential store.
//!
//! Holds one row per account: the username and Argon2 hashes of the password
//! and of the two security answers. Plaintext secrets never reach this module.
//! Accounts are created at sign-up and only ever modified by a password reset.

use crate::libs::error::{TmsError, TmsResult};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

pub const MAX_USERNAME_LENGTH: usize = 50;

const INSERT_USER: &str = "INSERT INTO users (username, password, first_answer, second_answer) VALUES (?1, ?2, ?3, ?4)";
const SELECT_USER_BY_USERNAME: &str = "SELECT id, username, password, first_answer, second_answer FROM users WHERE username = ?1";
const SELECT_USER_ID_BY_USERNAME: &str = "SELECT id FROM users WHERE username = ?1";
const UPDATE_PASSWORD: &str = "UPDATE users SET password = ?2 WHERE username = ?1";
const COUNT_BY_USERNAME: &str = "SELECT COUNT(*) FROM users WHERE username = ?1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub first_answer_hash: Option<String>,
    pub second_answer_hash: Option<String>,
}

impl User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            first_answer_hash: row.get(3)?,
            second_answer_hash: row.get(4)?,
        })
    }

    /// Both answer hashes, when the account was created with security questions.
    pub fn answer_hashes(&self) -> Option<(&str, &str)> {
        match (&self.first_answer_hash, &self.second_answer_hash) {
            (Some(first), Some(second)) => Some((first.as_str(), second.as_str())),
            _ => None,
        }
    }
}

pub fn validate_username(username: &str) -> TmsResult<()> {
    if username.trim().is_empty() {
        return Err(TmsError::EmptyField("username"));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(TmsError::FieldTooLong {
            field: "username",
            max: MAX_USERNAME_LENGTH,
        });
    }
    Ok(())
}

pub struct Users<'a> {
    conn: &'a Connection,
}

impl<'a> Users<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Users { conn }
    }

    /// Inserts a new account and returns its id. An existing username is rejected, never replaced.
    pub fn create(
        &self,
        username: &str,
        password_hash: &str,
        first_answer_hash: Option<&str>,
        second_answer_hash: Option<&str>,
    ) -> TmsResult<i64> {
        validate_username(username)?;

        let existing: Option<i64> = self
            .conn
            .query_row(SELECT_USER_ID_BY_USERNAME, params![username], |row| row.get(0))
            .optional()?;
        if existing.is_some() {
            return Err(TmsError::DuplicateUsername(username.to_string()));
        }

        match self
            .conn
            .execute(INSERT_USER, params![username, password_hash, first_answer_hash, second_answer_hash])
        {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            // lost a race against another writer between the check and the insert
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(TmsError::DuplicateUsername(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_by_username(&self, username: &str) -> TmsResult<Option<User>> {
        let user = self
            .conn
            .query_row(SELECT_USER_BY_USERNAME, params![username], User::from_row)
            .optional()?;

        Ok(user)
    }

    pub fn update_password(&self, username: &str, password_hash: &str) -> TmsResult<()> {
        let affected = self.conn.execute(UPDATE_PASSWORD, params![username, password_hash])?;

        if affected == 0 {
            return Err(TmsError::UserNotFound);
        }

        Ok(())
    }

    pub fn count_by_username(&self, username: &str) -> TmsResult<i64> {
        let count = self.conn.query_row(COUNT_BY_USERNAME, params![username], |row| row.get(0))?;
        Ok(count)
    }
}
