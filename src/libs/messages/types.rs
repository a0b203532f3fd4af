#[derive(Debug, Clone)]
pub enum Message {
    // === MENU MESSAGES ===
    MainMenuTitle,
    TaskMenuTitle,
    MenuSignUp,
    MenuLogIn,
    MenuForgotPassword,
    MenuExit,
    MenuCreateTask,
    MenuViewTasks,
    MenuUpdateTask,
    MenuDeleteTask,
    MenuLogout,
    Exiting,

    // === ACCOUNT MESSAGES ===
    PromptUsername,
    PromptPassword,
    PromptNewPassword,
    PromptTryAgain,
    UsernameTaken(String),
    PasswordRejected(String), // policy violation
    SignUpSuccessful,
    WelcomeBack(String),
    LoginSuccessful(String), // token
    LoginFailed,
    TooManyAttempts(i64), // seconds until retry
    LoggingOut,
    SessionExpired,
    UsernameNotFound,
    SecurityAnswersIncorrect,
    PasswordResetSuccessful,
    CanLogInNow,

    // === TASK MESSAGES ===
    PromptTaskTitle,
    PromptTaskDescription,
    PromptTaskStatus,
    PromptTaskId,
    SelectFieldToUpdate,
    FieldTitle,
    FieldDescription,
    FieldStatus,
    PromptNewTaskTitle,
    PromptNewTaskDescription,
    PromptNewTaskStatus,
    ConfirmDeleteTask(i64),
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    TaskNotFoundWithId(i64),
    TasksHeader,
    NoTasks,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    PromptDatabaseFile,
    PromptSessionTtl,
    PromptMaxLoginAttempts,
    PromptLockoutSeconds,
    PromptEnableSecurityQuestions,

    // === DATABASE MESSAGES ===
    DatabaseConnected(String), // path
    DatabaseRetrying(u32, u32), // attempt, attempts
    DatabaseUnavailable(u32),  // attempts
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,

    // === GENERIC MESSAGES ===
    OperationFailed(String),
    OperationCancelled,
}
