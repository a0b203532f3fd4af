//! Task store.
//!
//! Every statement carries both the task id and the owning user id in its
//! WHERE clause, so one account can never read, change or remove another
//! account's task. Updates are one fixed statement per field.

use crate::libs::error::{TmsError, TmsResult};
use crate::libs::task::{NewTask, Task, TaskStatus, TaskUpdate};
use rusqlite::{params, Connection, OptionalExtension, Row};

const INSERT_TASK: &str = "INSERT INTO tasks (user_id, title, description, status) VALUES (?1, ?2, ?3, ?4)";
const SELECT_TASKS: &str =
    "SELECT id, user_id, title, description, status, created_at, updated_at FROM tasks WHERE user_id = ?1 ORDER BY id";
const SELECT_TASK: &str =
    "SELECT id, user_id, title, description, status, created_at, updated_at FROM tasks WHERE id = ?1 AND user_id = ?2";
const UPDATE_TITLE: &str = "UPDATE tasks SET title = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2 AND user_id = ?3";
const UPDATE_DESCRIPTION: &str = "UPDATE tasks SET description = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2 AND user_id = ?3";
const UPDATE_STATUS: &str = "UPDATE tasks SET status = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2 AND user_id = ?3";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status: String = row.get(4)?;
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        status: if status == TaskStatus::Complete.code() {
            TaskStatus::Complete
        } else {
            TaskStatus::NotDone
        },
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub struct Tasks<'a> {
    conn: &'a Connection,
}

impl<'a> Tasks<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Tasks { conn }
    }

    pub fn create(&self, user_id: i64, task: &NewTask) -> TmsResult<i64> {
        task.validate()?;
        self.conn
            .execute(INSERT_TASK, params![user_id, task.title, task.description, task.status.code()])?;

        Ok(self.conn.last_insert_rowid())
    }

    /// All tasks owned by `user_id`, in creation order.
    pub fn list(&self, user_id: i64) -> TmsResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(SELECT_TASKS)?;
        let task_iter = stmt.query_map(params![user_id], task_from_row)?;

        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }

        Ok(tasks)
    }

    pub fn get(&self, user_id: i64, task_id: i64) -> TmsResult<Option<Task>> {
        let task = self
            .conn
            .query_row(SELECT_TASK, params![task_id, user_id], task_from_row)
            .optional()?;

        Ok(task)
    }

    pub fn exists(&self, user_id: i64, task_id: i64) -> TmsResult<bool> {
        Ok(self.get(user_id, task_id)?.is_some())
    }

    pub fn update(&self, user_id: i64, task_id: i64, update: &TaskUpdate) -> TmsResult<()> {
        update.validate()?;

        let affected = match update {
            TaskUpdate::Title(title) => self.conn.execute(UPDATE_TITLE, params![title, task_id, user_id])?,
            TaskUpdate::Description(description) => {
                self.conn.execute(UPDATE_DESCRIPTION, params![description, task_id, user_id])?
            }
            TaskUpdate::Status(status) => self.conn.execute(UPDATE_STATUS, params![status.code(), task_id, user_id])?,
        };

        if affected == 0 {
            return Err(TmsError::TaskNotFound(task_id));
        }

        Ok(())
    }

    pub fn delete(&self, user_id: i64, task_id: i64) -> TmsResult<()> {
        let affected = self.conn.execute(DELETE_TASK, params![task_id, user_id])?;

        if affected == 0 {
            return Err(TmsError::TaskNotFound(task_id));
        }

        Ok(())
    }
}
