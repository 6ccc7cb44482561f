//! # Domain Layer
//!
//! Core definitions, types, and traits that define the bot's domain.
//! Independent of the chat SDK, serving as the contract for other layers.

pub mod config;
pub mod env;
pub mod paths;
pub mod traits;
pub mod types;

/// Prefix that marks a message as a command (`!help`).
pub const COMMAND_PREFIX: char = '!';
