//! Authentication and account recovery rules on top of the credential store.

pub mod auth;
pub mod recovery;

pub use auth::{AuthService, AuthSession, SecurityAnswers};
pub use recovery::RecoveryService;
