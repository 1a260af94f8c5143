//! Custom command repository.
//!
//! A name may exist either once globally or once per guild, never both.

use super::DbError;
use crate::dispatch::{CommandScope, CustomCommandRecord};
use sqlx::SqlitePool;

type CommandRow = (String, i64, String, i64);

fn into_record((name, server, message, owner): CommandRow) -> CustomCommandRecord {
    CustomCommandRecord::new(name, CommandScope::from_snowflake(server), message, owner as u64)
}

/// Repository for custom command operations.
pub struct CustomCommandRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomCommandRepository<'a> {
    /// Create a new custom command repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Check whether `name` exists in exactly `scope`.
    pub async fn exists(&self, name: &str, scope: CommandScope) -> Result<bool, DbError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM custom_commands WHERE name = ? AND server_snowflake = ?",
        )
        .bind(name)
        .bind(scope.to_snowflake())
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Find a record by name and scope.
    pub async fn find(
        &self,
        name: &str,
        scope: CommandScope,
    ) -> Result<Option<CustomCommandRecord>, DbError> {
        let row = sqlx::query_as::<_, CommandRow>(
            r#"
            SELECT name, server_snowflake, message, owner_snowflake
            FROM custom_commands
            WHERE name = ? AND server_snowflake = ?
            "#,
        )
        .bind(name)
        .bind(scope.to_snowflake())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(into_record))
    }

    /// All records in insertion order.
    pub async fn list_all(&self) -> Result<Vec<CustomCommandRecord>, DbError> {
        let rows = sqlx::query_as::<_, CommandRow>(
            r#"
            SELECT name, server_snowflake, message, owner_snowflake
            FROM custom_commands
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(into_record).collect())
    }

    /// Insert a record, or replace the text of the existing `(name, scope)` row.
    ///
    /// Inserting a global name that some guild already uses, or a guild name
    /// that already exists globally, fails with [`DbError::ScopeConflict`].
    pub async fn save(&self, record: &CustomCommandRecord) -> Result<(), DbError> {
        let snowflake = record.scope.to_snowflake();
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM custom_commands WHERE name = ? AND server_snowflake = ?",
        )
        .bind(&record.name)
        .bind(snowflake)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(id) = existing {
            sqlx::query("UPDATE custom_commands SET message = ? WHERE id = ?")
                .bind(&record.text)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        } else {
            let conflict_sql = match record.scope {
                CommandScope::Global => {
                    "SELECT server_snowflake FROM custom_commands WHERE name = ? AND server_snowflake != 0 LIMIT 1"
                }
                CommandScope::Guild(_) => {
                    "SELECT server_snowflake FROM custom_commands WHERE name = ? AND server_snowflake = 0 LIMIT 1"
                }
            };

            let conflict: Option<i64> = sqlx::query_scalar(conflict_sql)
                .bind(&record.name)
                .fetch_optional(&mut *tx)
                .await?;

            if let Some(server) = conflict {
                return Err(DbError::ScopeConflict {
                    name: record.name.clone(),
                    existing: CommandScope::from_snowflake(server),
                });
            }

            sqlx::query(
                r#"
                INSERT INTO custom_commands (name, server_snowflake, owner_snowflake, message, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(&record.name)
            .bind(snowflake)
            .bind(record.owner_id as i64)
            .bind(&record.text)
            .bind(chrono::Utc::now().timestamp())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a record. Returns false if no row matched.
    pub async fn delete(&self, name: &str, scope: CommandScope) -> Result<bool, DbError> {
        let result =
            sqlx::query("DELETE FROM custom_commands WHERE name = ? AND server_snowflake = ?")
                .bind(name)
                .bind(scope.to_snowflake())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::{Database, DbError};
    use crate::dispatch::{CommandScope, CustomCommandRecord};

    async fn setup() -> Database {
        Database::new(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let db = setup().await;
        let repo = db.custom_commands();

        repo.save(&CustomCommandRecord::new("rules", CommandScope::Guild(7), "be nice", 99))
            .await
            .unwrap();

        let found = repo.find("rules", CommandScope::Guild(7)).await.unwrap().unwrap();
        assert_eq!(found.text, "be nice");
        assert_eq!(found.owner_id, 99);
        assert!(repo.find("rules", CommandScope::Guild(8)).await.unwrap().is_none());
        assert!(repo.find("rules", CommandScope::Global).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_existing_replaces_text() {
        let db = setup().await;
        let repo = db.custom_commands();

        repo.save(&CustomCommandRecord::new("rules", CommandScope::Guild(7), "old", 1))
            .await
            .unwrap();
        repo.save(&CustomCommandRecord::new("rules", CommandScope::Guild(7), "new", 2))
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].text, "new");
        // Owner of the original row is kept
        assert_eq!(all[0].owner_id, 1);
    }

    #[tokio::test]
    async fn test_guild_insert_refused_when_global_exists() {
        let db = setup().await;
        let repo = db.custom_commands();

        repo.save(&CustomCommandRecord::new("hello", CommandScope::Global, "hi", 1))
            .await
            .unwrap();

        let err = repo
            .save(&CustomCommandRecord::new("hello", CommandScope::Guild(5), "yo", 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::ScopeConflict { existing: CommandScope::Global, .. }
        ));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_global_insert_refused_when_guild_exists() {
        let db = setup().await;
        let repo = db.custom_commands();

        repo.save(&CustomCommandRecord::new("hello", CommandScope::Guild(5), "yo", 2))
            .await
            .unwrap();

        let err = repo
            .save(&CustomCommandRecord::new("hello", CommandScope::Global, "hi", 1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::ScopeConflict { existing: CommandScope::Guild(5), .. }
        ));
    }

    #[tokio::test]
    async fn test_same_name_in_two_guilds() {
        let db = setup().await;
        let repo = db.custom_commands();

        repo.save(&CustomCommandRecord::new("rules", CommandScope::Guild(1), "a", 1))
            .await
            .unwrap();
        repo.save(&CustomCommandRecord::new("rules", CommandScope::Guild(2), "b", 1))
            .await
            .unwrap();

        assert_eq!(repo.list_all().await.unwrap().len(), 2);
        let second = repo.find("rules", CommandScope::Guild(2)).await.unwrap().unwrap();
        assert_eq!(second.text, "b");
    }

    #[tokio::test]
    async fn test_delete() {
        let db = setup().await;
        let repo = db.custom_commands();

        repo.save(&CustomCommandRecord::new("hello", CommandScope::Global, "hi", 1))
            .await
            .unwrap();

        assert!(repo.delete("hello", CommandScope::Global).await.unwrap());
        assert!(!repo.delete("hello", CommandScope::Global).await.unwrap());
        assert!(!repo.exists("hello", CommandScope::Global).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let db = setup().await;
        let repo = db.custom_commands();

        for name in ["zeta", "alpha", "mid"] {
            repo.save(&CustomCommandRecord::new(name, CommandScope::Global, "x", 1))
                .await
                .unwrap();
        }

        let names: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }
}
