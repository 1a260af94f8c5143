//! Custom (user-defined) commands: records, the storage contract and the
//! per-dispatch snapshot used to resolve them.

use super::context::{GuildId, UserId};
use crate::db::DbError;
use async_trait::async_trait;
use std::fmt;
use tracing::warn;

/// Where a custom command fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandScope {
    Global,
    Guild(GuildId),
}

impl CommandScope {
    /// Stored snowflake value; `0` is the global sentinel.
    pub fn to_snowflake(self) -> i64 {
        match self {
            Self::Global => 0,
            Self::Guild(id) => id as i64,
        }
    }

    pub fn from_snowflake(value: i64) -> Self {
        if value == 0 {
            Self::Global
        } else {
            Self::Guild(value as GuildId)
        }
    }

    /// Whether a command with this scope fires for a message sent in `guild`.
    pub fn matches(self, guild: Option<GuildId>) -> bool {
        match self {
            Self::Global => true,
            Self::Guild(id) => guild == Some(id),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Guild(_) => "guild",
        }
    }
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Guild(id) => write!(f, "guild {}", id),
        }
    }
}

/// A stored custom command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCommandRecord {
    pub name: String,
    pub scope: CommandScope,
    /// Echoed verbatim when the command fires.
    pub text: String,
    pub owner_id: UserId,
}

impl CustomCommandRecord {
    pub fn new(
        name: impl Into<String>,
        scope: CommandScope,
        text: impl Into<String>,
        owner_id: UserId,
    ) -> Self {
        Self {
            name: name.into(),
            scope,
            text: text.into(),
            owner_id,
        }
    }
}

/// Storage contract for custom commands.
///
/// Implementations must keep a name from existing both globally and in a
/// guild: `save` refuses to insert a record that would break that.
#[async_trait]
pub trait CustomCommandStore: Send + Sync {
    async fn exists(&self, name: &str, scope: CommandScope) -> Result<bool, DbError>;

    async fn find(
        &self,
        name: &str,
        scope: CommandScope,
    ) -> Result<Option<CustomCommandRecord>, DbError>;

    async fn list_all(&self) -> Result<Vec<CustomCommandRecord>, DbError>;

    /// Insert a new record or replace the text of the existing `(name, scope)` row.
    async fn save(&self, record: &CustomCommandRecord) -> Result<(), DbError>;

    /// Remove a record. Returns false if nothing matched.
    async fn delete(&self, name: &str, scope: CommandScope) -> Result<bool, DbError>;
}

/// Custom commands as read once at the start of a dispatch.
#[derive(Debug, Clone, Default)]
pub struct CustomCommandSnapshot {
    records: Vec<CustomCommandRecord>,
}

impl CustomCommandSnapshot {
    pub fn new(records: Vec<CustomCommandRecord>) -> Self {
        Self { records }
    }

    /// Read every record from `store`. A failed read yields an empty snapshot.
    pub async fn fetch(store: &dyn CustomCommandStore) -> Self {
        match store.list_all().await {
            Ok(records) => Self::new(records),
            Err(e) => {
                warn!(error = %e, "Failed to load custom commands");
                Self::default()
            }
        }
    }

    /// First record named `name` whose scope matches `guild`.
    pub fn resolve(&self, name: &str, guild: Option<GuildId>) -> Option<&CustomCommandRecord> {
        self.records
            .iter()
            .find(|r| r.name == name && r.scope.matches(guild))
    }

    /// Records visible from `guild`, in storage order.
    pub fn visible(&self, guild: Option<GuildId>) -> impl Iterator<Item = &CustomCommandRecord> {
        self.records.iter().filter(move |r| r.scope.matches(guild))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CustomCommandSnapshot {
        CustomCommandSnapshot::new(vec![
            CustomCommandRecord::new("hello", CommandScope::Global, "hi", 1),
            CustomCommandRecord::new("rules", CommandScope::Guild(10), "be nice", 1),
            CustomCommandRecord::new("rules", CommandScope::Guild(20), "no spam", 2),
        ])
    }

    #[test]
    fn global_records_match_everywhere() {
        let snapshot = snapshot();
        for guild in [None, Some(10), Some(99)] {
            assert_eq!(snapshot.resolve("hello", guild).unwrap().text, "hi");
        }
    }

    #[test]
    fn guild_records_only_match_their_guild() {
        let snapshot = snapshot();
        assert_eq!(snapshot.resolve("rules", Some(10)).unwrap().text, "be nice");
        assert_eq!(snapshot.resolve("rules", Some(20)).unwrap().text, "no spam");
        assert!(snapshot.resolve("rules", Some(30)).is_none());
        assert!(snapshot.resolve("rules", None).is_none());
    }

    #[test]
    fn names_are_case_sensitive() {
        assert!(snapshot().resolve("Hello", None).is_none());
    }

    #[test]
    fn visible_filters_by_scope() {
        let snapshot = snapshot();
        let names: Vec<_> = snapshot.visible(Some(20)).map(|r| r.text.as_str()).collect();
        assert_eq!(names, vec!["hi", "no spam"]);
        assert_eq!(snapshot.visible(None).count(), 1);
    }

    #[test]
    fn snowflake_round_trip_uses_zero_sentinel() {
        assert_eq!(CommandScope::Global.to_snowflake(), 0);
        assert_eq!(CommandScope::from_snowflake(0), CommandScope::Global);
        assert_eq!(
            CommandScope::from_snowflake(CommandScope::Guild(42).to_snowflake()),
            CommandScope::Guild(42)
        );
    }
}
