//! Snipbin Core - Shared types library.
//!
//! This crate provides the domain types shared by the Snipbin web
//! application and its tooling. It contains only types, with no I/O,
//! no database access, and no HTTP clients, which keeps it lightweight
//! and usable anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
