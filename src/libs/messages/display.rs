//! Display implementation for tms application messages.
//!
//! All user-facing text lives in this one match, so prompts and results read
//! the same everywhere and a new `Message` variant cannot ship without text.

use super::types::Message;
use crate::services::recovery::{FIRST_SECURITY_QUESTION, SECOND_SECURITY_QUESTION};
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === MENU MESSAGES ===
            Message::MainMenuTitle => "Choose an option".to_string(),
            Message::TaskMenuTitle => "Task Management Menu".to_string(),
            Message::MenuSignUp => "Sign Up".to_string(),
            Message::MenuLogIn => "Log In".to_string(),
            Message::MenuForgotPassword => "Forgot Password?".to_string(),
            Message::MenuExit => "Exit".to_string(),
            Message::MenuCreateTask => "Create Task".to_string(),
            Message::MenuViewTasks => "View Tasks".to_string(),
            Message::MenuUpdateTask => "Update Task".to_string(),
            Message::MenuDeleteTask => "Delete Task".to_string(),
            Message::MenuLogout => "Logout".to_string(),
            Message::Exiting => "Exiting program...".to_string(),

            // === ACCOUNT MESSAGES ===
            Message::PromptUsername => "Enter username".to_string(),
            Message::PromptPassword => "Enter password".to_string(),
            Message::PromptNewPassword => "Enter a new password".to_string(),
            Message::PromptTryAgain => "Try again?".to_string(),
            Message::UsernameTaken(name) => format!("Username '{}' already exists. Please choose another username.", name),
            Message::PasswordRejected(reason) => format!("Error: {}. Please try again with a valid password.", reason),
            Message::SignUpSuccessful => "Sign Up successful! You can now log in.".to_string(),
            Message::WelcomeBack(name) => format!("Welcome back, {}!", name),
            Message::LoginSuccessful(token) => format!("Login successful! Your authentication token is: {}", token),
            Message::LoginFailed => "Login failed. Returning to main menu.".to_string(),
            Message::TooManyAttempts(seconds) => format!("Too many failed attempts. Please try again after {} seconds.", seconds),
            Message::LoggingOut => "Logging out...".to_string(),
            Message::SessionExpired => "Your session has expired. Please log in again.".to_string(),
            Message::UsernameNotFound => "Username not found.".to_string(),
            Message::SecurityAnswersIncorrect => "Security question answers are incorrect.".to_string(),
            Message::PasswordResetSuccessful => "Password reset successfully!".to_string(),
            Message::CanLogInNow => "You can now log in with your new password.".to_string(),

            // === TASK MESSAGES ===
            Message::PromptTaskTitle => "Enter title".to_string(),
            Message::PromptTaskDescription => "Enter description".to_string(),
            Message::PromptTaskStatus => "Enter task status (C for Complete, N for Not Done)".to_string(),
            Message::PromptTaskId => "Enter task ID".to_string(),
            Message::SelectFieldToUpdate => "What would you like to update?".to_string(),
            Message::FieldTitle => "T: Title".to_string(),
            Message::FieldDescription => "D: Description".to_string(),
            Message::FieldStatus => "S: Status".to_string(),
            Message::PromptNewTaskTitle => "Enter new task title".to_string(),
            Message::PromptNewTaskDescription => "Enter new task description".to_string(),
            Message::PromptNewTaskStatus => "Enter new task status (C for Complete, N for Not Done)".to_string(),
            Message::ConfirmDeleteTask(id) => format!("Delete task {}?", id),
            Message::TaskCreated => "Task created successfully!".to_string(),
            Message::TaskUpdated => "Task updated successfully!".to_string(),
            Message::TaskDeleted => "Task deleted successfully!".to_string(),
            Message::TaskNotFoundWithId(id) => format!("Task ID {} does not exist.", id),
            Message::TasksHeader => "YOUR TASKS:".to_string(),
            Message::NoTasks => "You have no tasks yet.".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::PromptDatabaseFile => "Database file".to_string(),
            Message::PromptSessionTtl => "Session lifetime (minutes)".to_string(),
            Message::PromptMaxLoginAttempts => "Failed logins before lockout".to_string(),
            Message::PromptLockoutSeconds => "Lockout duration (seconds)".to_string(),
            Message::PromptEnableSecurityQuestions => format!(
                "Enable security questions (\"{}\" / \"{}\")?",
                FIRST_SECURITY_QUESTION, SECOND_SECURITY_QUESTION
            ),

            // === DATABASE MESSAGES ===
            Message::DatabaseConnected(path) => format!("Connected to database at {}", path),
            Message::DatabaseRetrying(attempt, attempts) => {
                format!("Database connection attempt {} of {} failed, retrying...", attempt, attempts)
            }
            Message::DatabaseUnavailable(attempts) => format!("Unable to connect to the database after {} attempts", attempts),
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "Database initialized".to_string(),
            Message::DatabaseVersion(version) => format!("Current database version: {}", version),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::DatabaseNeedsUpdate => "Database schema needs to be updated".to_string(),
            Message::MigrationHistory => "Migration history:".to_string(),

            // === GENERIC MESSAGES ===
            Message::OperationFailed(error) => format!("Operation failed: {}", error),
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };

        write!(f, "{}", text)
    }
}
