//! Shared building blocks: configuration, error types, domain values,
//! credential hashing, sessions and terminal output.

pub mod clock;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod hasher;
pub mod messages;
pub mod password;
pub mod session;
pub mod task;
pub mod throttle;
pub mod view;
