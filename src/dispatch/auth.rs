//! Caller privilege checks run before any argument binding.

use super::context::MessageEvent;
use super::model::CommandDescriptor;
use crate::error::AuthorizationDenied;

/// Check `event`'s author against the descriptor's privilege flags.
///
/// Checks run guild-only, then owner, then admin; the first failure wins.
pub fn authorize(
    descriptor: &CommandDescriptor,
    event: &MessageEvent,
) -> Result<(), AuthorizationDenied> {
    if descriptor.is_guild_only() && !event.is_guild_message() {
        return Err(AuthorizationDenied::GuildOnly);
    }

    if descriptor.is_owner_only() && !event.author.is_owner {
        return Err(AuthorizationDenied::OwnerOnly);
    }

    // Admin privilege only exists inside a guild
    if descriptor.is_admin_only() && !(event.is_guild_message() && event.author.is_guild_admin) {
        return Err(AuthorizationDenied::AdminOnly);
    }

    Ok(())
}
