use super::task::Task;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn tasks(tasks: &[Task]) {
        Self::tasks_table(tasks).printstd();
    }

    pub fn tasks_table(tasks: &[Task]) -> Table {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "DESCRIPTION", "STATUS", "CREATED", "UPDATED"]);
        for task in tasks {
            table.add_row(row![
                task.id,
                task.title,
                task.description,
                task.status,
                task.created_at,
                task.updated_at
            ]);
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::task::TaskStatus;

    #[test]
    fn test_tasks_table_has_header_and_rows() {
        let tasks = vec![Task {
            id: 1,
            user_id: 1,
            title: "buy milk".to_string(),
            description: "2%".to_string(),
            status: TaskStatus::NotDone,
            created_at: "2024-01-01 10:00:00".to_string(),
            updated_at: "2024-01-01 10:00:00".to_string(),
        }];

        let table = View::tasks_table(&tasks);
        assert_eq!(table.len(), 2);

        let rendered = table.to_string();
        assert!(rendered.contains("buy milk"));
        assert!(rendered.contains("Not Done"));
    }
}
