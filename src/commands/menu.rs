//! Interactive account and task menu.
//!
//! The top level offers sign-up, login, password recovery and exit. A
//! successful login enters the task menu, where every operation first
//! re-validates the session token. Validation, not-found and credential
//! errors are shown and the loop continues. Storage errors are logged and the
//! current operation is abandoned.

use crate::{
    db::{db::Db, tasks::Tasks, users::Users},
    libs::{
        clock::{Clock, SystemClock},
        config::Config,
        error::{ErrorKind, TmsError},
        hasher::SecretHasher,
        messages::Message,
        password,
        session::{MemorySessionStore, SessionStore},
        task::{NewTask, TaskField, TaskStatus, TaskUpdate},
        view::View,
    },
    msg_error, msg_info, msg_print, msg_success, msg_warning,
    services::{
        auth::{AuthService, AuthSession, SecurityAnswers},
        recovery::{RecoveryService, FIRST_SECURITY_QUESTION, SECOND_SECURITY_QUESTION},
    },
};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use rusqlite::Connection;
use std::sync::Arc;

pub fn cmd() -> Result<()> {
    let config = Config::read()?;
    let db = Db::connect_with_retry(&config.database)?;

    Menu::new(&db.conn, &config)?.run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MainAction {
    SignUp,
    LogIn,
    ForgotPassword,
    Exit,
}

impl MainAction {
    fn available(security_questions: bool) -> Vec<MainAction> {
        let mut actions = vec![MainAction::SignUp, MainAction::LogIn];
        if security_questions {
            actions.push(MainAction::ForgotPassword);
        }
        actions.push(MainAction::Exit);
        actions
    }

    fn label(self) -> Message {
        match self {
            MainAction::SignUp => Message::MenuSignUp,
            MainAction::LogIn => Message::MenuLogIn,
            MainAction::ForgotPassword => Message::MenuForgotPassword,
            MainAction::Exit => Message::MenuExit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskAction {
    Create,
    View,
    Update,
    Delete,
    Logout,
}

impl TaskAction {
    const ALL: [TaskAction; 5] = [
        TaskAction::Create,
        TaskAction::View,
        TaskAction::Update,
        TaskAction::Delete,
        TaskAction::Logout,
    ];

    fn label(self) -> Message {
        match self {
            TaskAction::Create => Message::MenuCreateTask,
            TaskAction::View => Message::MenuViewTasks,
            TaskAction::Update => Message::MenuUpdateTask,
            TaskAction::Delete => Message::MenuDeleteTask,
            TaskAction::Logout => Message::MenuLogout,
        }
    }
}

pub struct Menu<'a> {
    auth: AuthService<'a>,
    recovery: RecoveryService<'a>,
    tasks: Tasks<'a>,
    theme: ColorfulTheme,
}

impl<'a> Menu<'a> {
    pub fn new(conn: &'a Connection, config: &Config) -> Result<Self> {
        let hasher = SecretHasher::new(&config.hashing)?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(config.auth.session_ttl()));

        Ok(Self {
            auth: AuthService::new(Users::new(conn), hasher.clone(), sessions, clock.clone(), &config.auth)?,
            recovery: RecoveryService::new(Users::new(conn), hasher, clock, &config.auth),
            tasks: Tasks::new(conn),
            theme: ColorfulTheme::default(),
        })
    }

    /// Runs the top-level menu until the user picks Exit.
    pub fn run(&self) -> Result<()> {
        let actions = MainAction::available(self.auth.security_questions_enabled());

        loop {
            let expired = self.auth.expire_sessions();
            if expired > 0 {
                tracing::debug!(expired, "dropped expired sessions");
            }

            let action = self.select(Message::MainMenuTitle, actions.as_slice(), |action| action.label())?;
            let result = match action {
                MainAction::SignUp => self.sign_up(),
                MainAction::LogIn => self.log_in_and_manage(),
                MainAction::ForgotPassword => match self.forgot_password() {
                    Ok(true) => self.log_in_and_manage(),
                    Ok(false) => Ok(()),
                    Err(e) => Err(e),
                },
                MainAction::Exit => {
                    msg_print!(Message::Exiting);
                    return Ok(());
                }
            };
            report(result)?;
        }
    }

    fn sign_up(&self) -> Result<()> {
        let username = self.prompt_text(Message::PromptUsername.to_string())?;
        if !self.auth.username_available(&username)? {
            msg_error!(Message::UsernameTaken(username));
            return Ok(());
        }

        let password = self.prompt_valid_password(Message::PromptPassword)?;

        let answers = if self.auth.security_questions_enabled() {
            let first = self.prompt_text(FIRST_SECURITY_QUESTION.to_string())?;
            let second = self.prompt_text(SECOND_SECURITY_QUESTION.to_string())?;
            Some((first, second))
        } else {
            None
        };

        self.auth.sign_up(
            &username,
            &password,
            answers.as_ref().map(|(first, second)| SecurityAnswers::new(first, second)),
        )?;
        msg_success!(Message::SignUpSuccessful);

        Ok(())
    }

    fn log_in_and_manage(&self) -> Result<()> {
        match self.log_in()? {
            Some(session) => self.task_menu(session),
            None => Ok(()),
        }
    }

    /// Prompts for credentials until a login succeeds or the user gives up.
    fn log_in(&self) -> Result<Option<AuthSession>> {
        loop {
            let username = self.prompt_text(Message::PromptUsername.to_string())?;
            let password = self.prompt_password(Message::PromptPassword)?;

            match self.auth.authenticate(&username, &password) {
                Ok(session) => {
                    msg_print!(Message::WelcomeBack(session.username.clone()));
                    msg_success!(Message::LoginSuccessful(session.token.clone()));
                    return Ok(Some(session));
                }
                Err(TmsError::LockedOut { retry_after }) => {
                    msg_warning!(Message::TooManyAttempts(retry_after));
                }
                Err(e) if e.kind() == ErrorKind::Auth => {
                    msg_error!(e);
                    if let Some(retry_after) = self.auth.lockout_remaining(&username) {
                        msg_warning!(Message::TooManyAttempts(retry_after));
                    }
                }
                Err(e) => return Err(e.into()),
            }

            if !self.confirm(Message::PromptTryAgain, true)? {
                msg_info!(Message::LoginFailed);
                return Ok(None);
            }
        }
    }

    /// Returns true once the password has been replaced.
    fn forgot_password(&self) -> Result<bool> {
        let username = self.prompt_text(Message::PromptUsername.to_string())?;
        match self.recovery.ensure_user(&username) {
            Err(TmsError::UserNotFound) => {
                msg_error!(Message::UsernameNotFound);
                return Ok(false);
            }
            other => other?,
        }

        let first = self.prompt_text(FIRST_SECURITY_QUESTION.to_string())?;
        let second = self.prompt_text(SECOND_SECURITY_QUESTION.to_string())?;
        let answers = SecurityAnswers::new(&first, &second);

        match self.recovery.verify_answers(&username, answers) {
            Err(TmsError::WrongAnswers) => {
                msg_error!(Message::SecurityAnswersIncorrect);
                return Ok(false);
            }
            other => other?,
        }

        let new_password = self.prompt_valid_password(Message::PromptNewPassword)?;
        self.recovery.reset_password(&username, answers, &new_password)?;

        msg_success!(Message::PasswordResetSuccessful);
        msg_info!(Message::CanLogInNow);
        Ok(true)
    }

    fn task_menu(&self, session: AuthSession) -> Result<()> {
        loop {
            let action = self.select(Message::TaskMenuTitle, TaskAction::ALL.as_slice(), |action| action.label())?;

            if action == TaskAction::Logout {
                self.auth.logout(&session.token);
                msg_info!(Message::LoggingOut);
                return Ok(());
            }

            let user_id = match self.auth.validate_token(&session.token) {
                Ok(user_id) => user_id,
                Err(_) => {
                    msg_warning!(Message::SessionExpired);
                    return Ok(());
                }
            };

            let result = match action {
                TaskAction::Create => self.create_task(user_id),
                TaskAction::View => self.view_tasks(user_id),
                TaskAction::Update => self.update_task(user_id),
                TaskAction::Delete => self.delete_task(user_id),
                TaskAction::Logout => Ok(()),
            };
            report(result)?;
        }
    }

    fn create_task(&self, user_id: i64) -> Result<()> {
        let title = self.prompt_text(Message::PromptTaskTitle.to_string())?;
        let description = self.prompt_optional_text(Message::PromptTaskDescription)?;
        let status: TaskStatus = self.prompt_status(Message::PromptTaskStatus)?.parse()?;

        let task = NewTask::new(&title, &description).with_status(status);
        let task_id = self.tasks.create(user_id, &task)?;
        tracing::debug!(task_id, "task created");
        msg_success!(Message::TaskCreated);

        Ok(())
    }

    fn view_tasks(&self, user_id: i64) -> Result<()> {
        let tasks = self.tasks.list(user_id)?;
        if tasks.is_empty() {
            msg_info!(Message::NoTasks);
            return Ok(());
        }

        msg_print!(Message::TasksHeader, true);
        View::tasks(&tasks);

        Ok(())
    }

    fn update_task(&self, user_id: i64) -> Result<()> {
        let task_id = self.prompt_task_id()?;
        if !self.tasks.exists(user_id, task_id)? {
            msg_error!(Message::TaskNotFoundWithId(task_id));
            return Ok(());
        }

        let fields = [TaskField::Title, TaskField::Description, TaskField::Status];
        let field = self.select(Message::SelectFieldToUpdate, fields.as_slice(), |field| match field {
            TaskField::Title => Message::FieldTitle,
            TaskField::Description => Message::FieldDescription,
            TaskField::Status => Message::FieldStatus,
        })?;

        let value = match field {
            TaskField::Title => self.prompt_text(Message::PromptNewTaskTitle.to_string())?,
            TaskField::Description => self.prompt_optional_text(Message::PromptNewTaskDescription)?,
            TaskField::Status => self.prompt_status(Message::PromptNewTaskStatus)?,
        };

        let update = TaskUpdate::parse(field, &value)?;
        self.tasks.update(user_id, task_id, &update)?;
        msg_success!(Message::TaskUpdated);

        Ok(())
    }

    fn delete_task(&self, user_id: i64) -> Result<()> {
        let task_id = self.prompt_task_id()?;
        if !self.confirm(Message::ConfirmDeleteTask(task_id), true)? {
            msg_info!(Message::OperationCancelled);
            return Ok(());
        }

        self.tasks.delete(user_id, task_id)?;
        msg_success!(Message::TaskDeleted);

        Ok(())
    }

    fn select<T: Copy>(&self, prompt: Message, items: &[T], label: impl Fn(T) -> Message) -> Result<T> {
        let labels: Vec<String> = items.iter().map(|item| label(*item).to_string()).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt(prompt.to_string())
            .items(&labels)
            .default(0)
            .interact()?;

        Ok(items[selection])
    }

    fn prompt_text(&self, prompt: String) -> Result<String> {
        let value: String = Input::with_theme(&self.theme).with_prompt(prompt).interact_text()?;
        Ok(value.trim().to_string())
    }

    fn prompt_optional_text(&self, prompt: Message) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt.to_string())
            .allow_empty(true)
            .interact_text()?;
        Ok(value.trim().to_string())
    }

    fn prompt_status(&self, prompt: Message) -> Result<String> {
        let value: String = Input::with_theme(&self.theme)
            .with_prompt(prompt.to_string())
            .default(TaskStatus::NotDone.code().to_string())
            .interact_text()?;
        Ok(value)
    }

    fn prompt_task_id(&self) -> Result<i64> {
        let task_id: i64 = Input::with_theme(&self.theme)
            .with_prompt(Message::PromptTaskId.to_string())
            .interact_text()?;
        Ok(task_id)
    }

    fn prompt_password(&self, prompt: Message) -> Result<String> {
        let value = Password::with_theme(&self.theme).with_prompt(prompt.to_string()).interact()?;
        Ok(value)
    }

    /// Re-prompts until the password satisfies the policy.
    fn prompt_valid_password(&self, prompt: Message) -> Result<String> {
        loop {
            let candidate = self.prompt_password(prompt.clone())?;
            match password::validate(&candidate) {
                Ok(()) => return Ok(candidate),
                Err(violation) => msg_error!(Message::PasswordRejected(violation.to_string())),
            }
        }
    }

    fn confirm(&self, prompt: Message, default: bool) -> Result<bool> {
        let confirmed = Confirm::with_theme(&self.theme)
            .with_prompt(prompt.to_string())
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}

/// Shows recoverable domain errors and logs storage failures.
///
/// Anything that is not a [`TmsError`] (a closed terminal, for instance) is
/// passed back up and ends the program.
fn report(result: Result<()>) -> Result<()> {
    let Err(err) = result else {
        return Ok(());
    };

    match err.downcast_ref::<TmsError>() {
        Some(TmsError::TaskNotFound(task_id)) => msg_error!(Message::TaskNotFoundWithId(*task_id)),
        Some(e) if e.is_recoverable() => msg_error!(e),
        Some(e) => {
            tracing::error!(error = %e, "operation aborted");
            msg_error!(Message::OperationFailed(e.to_string()));
        }
        None => return Err(err),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forgot_password_hidden_without_security_questions() {
        assert_eq!(
            MainAction::available(false),
            vec![MainAction::SignUp, MainAction::LogIn, MainAction::Exit]
        );
        assert!(MainAction::available(true).contains(&MainAction::ForgotPassword));
    }

    #[test]
    fn test_report_keeps_menu_alive_for_domain_errors() {
        assert!(report(Err(TmsError::TaskNotFound(9).into())).is_ok());
        assert!(report(Err(TmsError::InvalidStatus("X".into()).into())).is_ok());
        assert!(report(Err(TmsError::Storage(rusqlite::Error::InvalidQuery).into())).is_ok());
    }

    #[test]
    fn test_report_propagates_other_errors() {
        assert!(report(Err(anyhow::anyhow!("terminal closed"))).is_err());
    }
}
