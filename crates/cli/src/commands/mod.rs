//! Subcommand implementations. Each takes the shared [`AppState`](glamora_client::AppState).

pub mod auth;
pub mod catalog;
pub mod design;
pub mod onboarding;
