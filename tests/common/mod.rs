//! Integration test common infrastructure.
//!
//! Provides a bot wired to an in-memory database and helpers for building
//! message events and asserting on captured replies.

pub mod bot;

#[allow(unused_imports)]
pub use bot::{TestBot, direct_message, guild_admin, guild_member, owner};
