//! Glamora Core - Shared types library.
//!
//! This crate provides common types used across all Glamora components:
//! - `client` - Stores, sync coordinator, session and remote gateway
//! - `cli` - Command-line front end over the client
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no runtime.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, prices, emails, and the
//!   fixed enumerations shared with the backend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
