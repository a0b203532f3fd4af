#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use tms::db::db::Db;
    use tms::db::tasks::Tasks;
    use tms::db::users::Users;
    use tms::libs::error::TmsError;
    use tms::libs::task::{NewTask, TaskField, TaskStatus, TaskUpdate};

    struct TaskTestContext {
        _temp_dir: TempDir,
        db: Db,
        alice: i64,
        bob: i64,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("tms.db")).unwrap();
            let users = Users::new(&db.conn);
            let alice = users.create("alice", "hash", None, None).unwrap();
            let bob = users.create("bob", "hash", None, None).unwrap();
            TaskTestContext {
                _temp_dir: temp_dir,
                db,
                alice,
                bob,
            }
        }
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_create_and_list(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);

        let id = tasks.create(ctx.alice, &NewTask::new("buy milk", "2%")).unwrap();
        let listed = tasks.list(ctx.alice).unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, id);
        assert_eq!(listed[0].user_id, ctx.alice);
        assert_eq!(listed[0].title, "buy milk");
        assert_eq!(listed[0].description, "2%");
        assert_eq!(listed[0].status, TaskStatus::NotDone);
        assert!(!listed[0].created_at.is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_list_is_ordered_by_id(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);

        for i in 1..=3 {
            tasks.create(ctx.alice, &NewTask::new(&format!("Task {}", i), "")).unwrap();
        }

        let titles: Vec<String> = tasks.list(ctx.alice).unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Task 1", "Task 2", "Task 3"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_tasks_are_isolated_per_user(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);

        let alice_task = tasks.create(ctx.alice, &NewTask::new("alice task", "")).unwrap();
        tasks.create(ctx.bob, &NewTask::new("bob task", "")).unwrap();

        assert_eq!(tasks.list(ctx.alice).unwrap().len(), 1);
        assert!(tasks.get(ctx.bob, alice_task).unwrap().is_none());
        assert!(!tasks.exists(ctx.bob, alice_task).unwrap());

        // bob can neither change nor remove alice's task
        let update = TaskUpdate::Title("hijacked".to_string());
        assert!(matches!(tasks.update(ctx.bob, alice_task, &update), Err(TmsError::TaskNotFound(_))));
        assert!(matches!(tasks.delete(ctx.bob, alice_task), Err(TmsError::TaskNotFound(_))));

        let task = tasks.get(ctx.alice, alice_task).unwrap().unwrap();
        assert_eq!(task.title, "alice task");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_update_fields(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let id = tasks.create(ctx.alice, &NewTask::new("Original", "old")).unwrap();

        tasks
            .update(ctx.alice, id, &TaskUpdate::parse(TaskField::Title, "Renamed").unwrap())
            .unwrap();
        tasks
            .update(ctx.alice, id, &TaskUpdate::parse(TaskField::Description, "new").unwrap())
            .unwrap();
        tasks
            .update(ctx.alice, id, &TaskUpdate::parse(TaskField::Status, "C").unwrap())
            .unwrap();

        let task = tasks.get(ctx.alice, id).unwrap().unwrap();
        assert_eq!(task.title, "Renamed");
        assert_eq!(task.description, "new");
        assert_eq!(task.status, TaskStatus::Complete);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_update_touches_updated_at(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let id = tasks.create(ctx.alice, &NewTask::new("Task", "")).unwrap();
        let old = "2000-01-01 00:00:00";
        ctx.db
            .conn
            .execute("UPDATE tasks SET created_at = ?1, updated_at = ?1 WHERE id = ?2", rusqlite::params![old, id])
            .unwrap();

        tasks.update(ctx.alice, id, &TaskUpdate::Status(TaskStatus::Complete)).unwrap();

        let task = tasks.get(ctx.alice, id).unwrap().unwrap();
        assert_eq!(task.created_at, old);
        assert_ne!(task.updated_at, old);
        assert!(!task.updated_at.is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_invalid_status_leaves_task_unchanged(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let id = tasks.create(ctx.alice, &NewTask::new("Task", "")).unwrap();

        let err = TaskUpdate::parse(TaskField::Status, "X").unwrap_err();
        assert!(matches!(err, TmsError::InvalidStatus(ref s) if s == "X"));

        let task = tasks.get(ctx.alice, id).unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::NotDone);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_title_validation(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);

        assert!(matches!(
            tasks.create(ctx.alice, &NewTask::new("", "desc")),
            Err(TmsError::EmptyField(_))
        ));
        assert!(matches!(
            tasks.create(ctx.alice, &NewTask::new(&"t".repeat(51), "")),
            Err(TmsError::FieldTooLong { .. })
        ));
        assert!(tasks.list(ctx.alice).unwrap().is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_task_delete(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        let id = tasks
            .create(ctx.alice, &NewTask::new("Done soon", "").with_status(TaskStatus::Complete))
            .unwrap();

        tasks.delete(ctx.alice, id).unwrap();
        assert!(tasks.list(ctx.alice).unwrap().is_empty());

        // a second delete reports the missing task
        assert!(matches!(tasks.delete(ctx.alice, id), Err(TmsError::TaskNotFound(missing)) if missing == id));
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_deleting_user_removes_tasks(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db.conn);
        tasks.create(ctx.bob, &NewTask::new("bob task", "")).unwrap();

        ctx.db.conn.execute("DELETE FROM users WHERE id = ?1", [ctx.bob]).unwrap();

        let remaining: i64 = ctx
            .db
            .conn
            .query_row("SELECT COUNT(*) FROM tasks WHERE user_id = ?1", [ctx.bob], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
