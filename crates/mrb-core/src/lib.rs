//! Core domain + application logic for the Market Relay Bot.
//!
//! The relay greets users with a static menu and shuttles messages between
//! end users and a single admin chat. This crate is framework-agnostic:
//! Telegram lives behind ports (traits) implemented in the adapter crate.

pub mod classify;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod menu;
pub mod outbound;
pub mod router;
pub mod store;
pub mod update;

pub use errors::{Error, Result};
