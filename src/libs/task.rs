use super::error::{TmsError, TmsResult};
use std::fmt;
use std::str::FromStr;

pub const MAX_TITLE_LENGTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    NotDone,
    Complete,
}

impl TaskStatus {
    /// Single-letter code stored in the `status` column.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotDone => "N",
            Self::Complete => "C",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotDone => "Not Done",
            Self::Complete => "Complete",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = TmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "N" | "n" => Ok(Self::NotDone),
            "C" | "c" => Ok(Self::Complete),
            other => match other.to_ascii_lowercase().as_str() {
                "not-done" | "not done" | "notdone" => Ok(Self::NotDone),
                "complete" => Ok(Self::Complete),
                _ => Err(TmsError::InvalidStatus(other.to_string())),
            },
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for a task that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl NewTask {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            status: TaskStatus::default(),
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn validate(&self) -> TmsResult<()> {
        validate_title(&self.title)
    }
}

pub fn validate_title(title: &str) -> TmsResult<()> {
    if title.trim().is_empty() {
        return Err(TmsError::EmptyField("title"));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(TmsError::FieldTooLong {
            field: "title",
            max: MAX_TITLE_LENGTH,
        });
    }
    Ok(())
}

/// The updatable task fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Description,
    Status,
}

impl FromStr for TaskField {
    type Err = TmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t" | "title" => Ok(Self::Title),
            "d" | "description" => Ok(Self::Description),
            "s" | "status" => Ok(Self::Status),
            _ => Err(TmsError::InvalidField(s.trim().to_string())),
        }
    }
}

/// A single-field change to an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    Title(String),
    Description(String),
    Status(TaskStatus),
}

impl TaskUpdate {
    pub fn parse(field: TaskField, value: &str) -> TmsResult<Self> {
        let update = match field {
            TaskField::Title => Self::Title(value.to_string()),
            TaskField::Description => Self::Description(value.to_string()),
            TaskField::Status => Self::Status(value.parse()?),
        };
        update.validate()?;
        Ok(update)
    }

    pub fn validate(&self) -> TmsResult<()> {
        match self {
            Self::Title(title) => validate_title(title),
            Self::Description(_) | Self::Status(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing() {
        assert_eq!("C".parse::<TaskStatus>().unwrap(), TaskStatus::Complete);
        assert_eq!("n".parse::<TaskStatus>().unwrap(), TaskStatus::NotDone);
        assert_eq!("Not-Done".parse::<TaskStatus>().unwrap(), TaskStatus::NotDone);
        assert_eq!("complete".parse::<TaskStatus>().unwrap(), TaskStatus::Complete);
        assert!(matches!("X".parse::<TaskStatus>(), Err(TmsError::InvalidStatus(s)) if s == "X"));
    }

    #[test]
    fn update_parse_validates_value() {
        assert_eq!(
            TaskUpdate::parse(TaskField::Status, "C").unwrap(),
            TaskUpdate::Status(TaskStatus::Complete)
        );
        assert!(matches!(
            TaskUpdate::parse(TaskField::Status, "done"),
            Err(TmsError::InvalidStatus(_))
        ));
        assert!(matches!(TaskUpdate::parse(TaskField::Title, "  "), Err(TmsError::EmptyField("title"))));
        assert_eq!(
            TaskUpdate::parse(TaskField::Description, "").unwrap(),
            TaskUpdate::Description(String::new())
        );
    }

    #[test]
    fn field_letters() {
        assert_eq!("T".parse::<TaskField>().unwrap(), TaskField::Title);
        assert_eq!("d".parse::<TaskField>().unwrap(), TaskField::Description);
        assert_eq!("status".parse::<TaskField>().unwrap(), TaskField::Status);
        assert!(matches!("X".parse::<TaskField>(), Err(TmsError::InvalidField(_))));
    }

    #[test]
    fn title_length_limit() {
        assert!(validate_title(&"a".repeat(MAX_TITLE_LENGTH)).is_ok());
        assert!(matches!(
            validate_title(&"a".repeat(MAX_TITLE_LENGTH + 1)),
            Err(TmsError::FieldTooLong { field: "title", max: 50 })
        ));
    }
}
