//! Sign-up, login and bearer-token validation.
//!
//! A login attempt goes `AwaitingCredentials -> Validating -> {Authenticated,
//! Rejected}`. Rejections never say whether the username or the password was
//! wrong, and every rejection counts against that username in the
//! [`LoginThrottle`]. Tokens are issued by the injected [`SessionStore`].
//! Usernames are trimmed on the way in; passwords are used as typed.

use crate::db::users::{validate_username, Users};
use crate::libs::clock::Clock;
use crate::libs::config::AuthConfig;
use crate::libs::error::{TmsError, TmsResult};
use crate::libs::hasher::SecretHasher;
use crate::libs::password;
use crate::libs::session::{Session, SessionStore};
use crate::libs::throttle::{LoginThrottle, ThrottleState};
use std::sync::Arc;

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

/// Answers to the two security questions, in question order.
#[derive(Debug, Clone, Copy)]
pub struct SecurityAnswers<'s> {
    pub first: &'s str,
    pub second: &'s str,
}

impl<'s> SecurityAnswers<'s> {
    pub fn new(first: &'s str, second: &'s str) -> Self {
        Self { first, second }
    }
}

pub struct AuthService<'a> {
    users: Users<'a>,
    hasher: SecretHasher,
    sessions: Arc<dyn SessionStore>,
    throttle: LoginThrottle,
    clock: Arc<dyn Clock>,
    security_questions: bool,
    // verified against when the username is unknown, so both rejections cost the same
    dummy_hash: String,
}

impl<'a> AuthService<'a> {
    pub fn new(
        users: Users<'a>,
        hasher: SecretHasher,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> TmsResult<Self> {
        let dummy_hash = hasher.hash("tms-dummy-password")?;
        Ok(Self {
            users,
            hasher,
            sessions,
            throttle: LoginThrottle::new(config.max_login_attempts, config.lockout()),
            clock,
            security_questions: config.security_questions,
            dummy_hash,
        })
    }

    pub fn security_questions_enabled(&self) -> bool {
        self.security_questions
    }

    pub fn username_available(&self, username: &str) -> TmsResult<bool> {
        let username = username.trim();
        validate_username(username)?;
        Ok(self.users.find_by_username(username)?.is_none())
    }

    /// Creates an account. Answers are required when security questions are enabled
    /// and ignored otherwise.
    pub fn sign_up(&self, username: &str, password: &str, answers: Option<SecurityAnswers<'_>>) -> TmsResult<i64> {
        let username = username.trim();
        validate_username(username)?;
        password::validate(password)?;

        let answers = if self.security_questions {
            let answers = answers.ok_or(TmsError::MissingSecurityAnswers)?;
            if answers.first.trim().is_empty() || answers.second.trim().is_empty() {
                return Err(TmsError::MissingSecurityAnswers);
            }
            Some(answers)
        } else {
            None
        };

        if !self.username_available(username)? {
            return Err(TmsError::DuplicateUsername(username.to_string()));
        }

        let password_hash = self.hasher.hash(password)?;
        let (first, second) = match answers {
            Some(answers) => (Some(self.hasher.hash(answers.first)?), Some(self.hasher.hash(answers.second)?)),
            None => (None, None),
        };

        let user_id = self
            .users
            .create(username, &password_hash, first.as_deref(), second.as_deref())?;
        tracing::info!(user_id, "account created");

        Ok(user_id)
    }

    pub fn authenticate(&self, username: &str, password: &str) -> TmsResult<AuthSession> {
        let username = username.trim();
        let now = self.clock.now();
        if let ThrottleState::Locked(retry_after) = self.throttle.check(username, now) {
            return Err(TmsError::LockedOut { retry_after });
        }

        let user = self.users.find_by_username(username)?;
        let verified = match &user {
            Some(user) => self.hasher.verify(password, &user.password_hash),
            None => {
                let _ = self.hasher.verify(password, &self.dummy_hash);
                false
            }
        };

        match user {
            Some(user) if verified => {
                self.throttle.record_success(username);
                let token = self.sessions.issue(user.id, &user.username, now);
                tracing::info!(user_id = user.id, "login succeeded");

                Ok(AuthSession {
                    user_id: user.id,
                    username: user.username,
                    token,
                })
            }
            _ => {
                self.throttle.record_failure(username, now);
                tracing::debug!("login rejected");
                Err(TmsError::InvalidCredentials)
            }
        }
    }

    /// Seconds left on the lockout for `username`, if it is locked.
    pub fn lockout_remaining(&self, username: &str) -> Option<i64> {
        let username = username.trim();
        match self.throttle.check(username, self.clock.now()) {
            ThrottleState::Locked(seconds) => Some(seconds),
            ThrottleState::Open => None,
        }
    }

    pub fn failed_attempts(&self, username: &str) -> u32 {
        let username = username.trim();
        self.throttle.failures(username, self.clock.now())
    }

    pub fn session(&self, token: &str) -> TmsResult<Session> {
        self.sessions.lookup(token, self.clock.now()).ok_or(TmsError::InvalidToken)
    }

    pub fn validate_token(&self, token: &str) -> TmsResult<i64> {
        self.session(token).map(|session| session.user_id)
    }

    pub fn logout(&self, token: &str) -> bool {
        self.sessions.revoke(token)
    }

    /// Drops expired sessions; returns how many were removed.
    pub fn expire_sessions(&self) -> usize {
        self.sessions.expire(self.clock.now())
    }
}
