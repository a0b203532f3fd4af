//! Password reset through the two security questions.
//!
//! Both answers must match their stored hashes. Failed answer attempts are
//! throttled per username with the same policy as logins.

use crate::db::users::Users;
use crate::libs::clock::Clock;
use crate::libs::config::AuthConfig;
use crate::libs::error::{TmsError, TmsResult};
use crate::libs::hasher::SecretHasher;
use crate::libs::password;
use crate::libs::throttle::{LoginThrottle, ThrottleState};
use crate::services::auth::SecurityAnswers;
use std::sync::Arc;

pub const FIRST_SECURITY_QUESTION: &str = "What was the first concert you attended?";
pub const SECOND_SECURITY_QUESTION: &str = "Who is your favorite artist?";

pub struct RecoveryService<'a> {
    users: Users<'a>,
    hasher: SecretHasher,
    throttle: LoginThrottle,
    clock: Arc<dyn Clock>,
}

impl<'a> RecoveryService<'a> {
    pub fn new(users: Users<'a>, hasher: SecretHasher, clock: Arc<dyn Clock>, config: &AuthConfig) -> Self {
        Self {
            users,
            hasher,
            throttle: LoginThrottle::new(config.max_login_attempts, config.lockout()),
            clock,
        }
    }

    /// Fails with `UserNotFound` for an unknown username.
    pub fn ensure_user(&self, username: &str) -> TmsResult<()> {
        let username = username.trim();
        self.users
            .find_by_username(username)?
            .map(|_| ())
            .ok_or(TmsError::UserNotFound)
    }

    /// Checks both answers without changing anything.
    pub fn verify_answers(&self, username: &str, answers: SecurityAnswers<'_>) -> TmsResult<()> {
        let username = username.trim();
        let now = self.clock.now();
        if let ThrottleState::Locked(retry_after) = self.throttle.check(username, now) {
            return Err(TmsError::LockedOut { retry_after });
        }

        let user = self.users.find_by_username(username)?.ok_or(TmsError::UserNotFound)?;

        let matched = match user.answer_hashes() {
            Some((first_hash, second_hash)) => {
                // both are always checked
                let first = self.hasher.verify(answers.first, first_hash);
                let second = self.hasher.verify(answers.second, second_hash);
                first && second
            }
            None => false,
        };

        if !matched {
            self.throttle.record_failure(username, now);
            tracing::debug!("security answers rejected");
            return Err(TmsError::WrongAnswers);
        }

        Ok(())
    }

    /// Replaces the password once both answers match and the new password passes the policy.
    pub fn reset_password(&self, username: &str, answers: SecurityAnswers<'_>, new_password: &str) -> TmsResult<()> {
        let username = username.trim();
        self.verify_answers(username, answers)?;
        password::validate(new_password)?;

        let password_hash = self.hasher.hash(new_password)?;
        self.users.update_password(username, &password_hash)?;
        self.throttle.record_success(username);
        tracing::info!("password reset");

        Ok(())
    }
}
