//! SQLite implementation of ConversationStore.
//!
//! One row per conversation. The message history lives in a single JSON
//! text column and is rewritten whole on every turn.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

use super::locks::ConversationLocks;
use crate::domain::conversation::{
    decode_history_lenient, encode_history, Conversation, ConversationSummary, Topic, Turn,
};
use crate::domain::foundation::{ConversationId, Timestamp};
use crate::ports::{ConversationStore, StoreError};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS conversations (
        id          TEXT PRIMARY KEY NOT NULL,
        topic       TEXT NOT NULL,
        messages    TEXT NOT NULL DEFAULT '[]',
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )
"#;

/// How long a writer waits for another connection's write to finish.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_conversations_updated_at ON conversations (updated_at)";

/// SQLite implementation of ConversationStore.
pub struct SqliteConversationStore {
    pool: SqlitePool,
    locks: ConversationLocks,
}

impl SqliteConversationStore {
    /// Opens the database at `url` and ensures the schema exists.
    ///
    /// `sqlite::memory:` databases are pinned to one connection that never
    /// expires, since each connection would otherwise see its own database.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);

        let (options, pool_options) = if url.contains(":memory:") {
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (options, pool_options)
        } else {
            // WAL lets readers proceed while one connection writes.
            let options = options.journal_mode(SqliteJournalMode::Wal);
            (options, SqlitePoolOptions::new().max_connections(max_connections.max(1)))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| StoreError::database(format!("Failed to connect: {}", e)))?;

        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, creating the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| StoreError::database(format!("Failed to acquire connection: {}", e)))?;
        create_schema(&mut conn).await?;
        drop(conn);

        Ok(Self {
            pool,
            locks: ConversationLocks::new(),
        })
    }

    /// Creates a store backed by a private in-memory database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:", 1).await
    }
}

async fn create_schema(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query(CREATE_TABLE)
        .execute(&mut *conn)
        .await
        .map_err(|e| StoreError::database(format!("Failed to create table: {}", e)))?;
    sqlx::query(CREATE_INDEX)
        .execute(&mut *conn)
        .await
        .map_err(|e| StoreError::database(format!("Failed to create index: {}", e)))?;
    Ok(())
}

fn row_to_conversation(row: &SqliteRow) -> Result<Conversation, StoreError> {
    let id = parse_id(row)?;
    let topic: String = row
        .try_get("topic")
        .map_err(|e| StoreError::Serialization(format!("Invalid topic: {}", e)))?;
    let messages: Option<String> = row.try_get("messages").unwrap_or(None);

    Ok(Conversation::reconstitute(
        id,
        Topic::from_stored(topic),
        decode_history_lenient(messages.as_deref()),
        parse_timestamp(row, "created_at")?,
        parse_timestamp(row, "updated_at")?,
    ))
}

fn row_to_summary(row: &SqliteRow) -> Result<ConversationSummary, StoreError> {
    Ok(ConversationSummary {
        id: parse_id(row)?,
        topic: row
            .try_get("topic")
            .map_err(|e| StoreError::Serialization(format!("Invalid topic: {}", e)))?,
        created_at: parse_timestamp(row, "created_at")?,
        updated_at: parse_timestamp(row, "updated_at")?,
    })
}

fn parse_id(row: &SqliteRow) -> Result<ConversationId, StoreError> {
    let raw: String = row
        .try_get("id")
        .map_err(|e| StoreError::Serialization(format!("Invalid id: {}", e)))?;
    raw.parse()
        .map_err(|e| StoreError::Serialization(format!("Invalid id '{}': {}", raw, e)))
}

fn parse_timestamp(row: &SqliteRow, column: &str) -> Result<Timestamp, StoreError> {
    let dt: DateTime<Utc> = row
        .try_get(column)
        .map_err(|e| StoreError::Serialization(format!("Invalid {}: {}", column, e)))?;
    Ok(Timestamp::from_datetime(dt))
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, topic, created_at, updated_at
            FROM conversations
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to list conversations: {}", e)))?;

        rows.iter().map(row_to_summary).collect()
    }

    async fn create_conversation(&self, topic: Topic) -> Result<Conversation, StoreError> {
        let conversation = Conversation::new(topic);
        let messages = encode_history(conversation.messages())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO conversations (id, topic, messages, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(conversation.id().to_string())
        .bind(conversation.topic().as_str())
        .bind(messages)
        .bind(*conversation.created_at().as_datetime())
        .bind(*conversation.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to insert conversation: {}", e)))?;

        tracing::debug!(conversation_id = %conversation.id(), "Conversation created");
        Ok(conversation)
    }

    async fn get_conversation(&self, id: ConversationId) -> Result<Conversation, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, topic, messages, created_at, updated_at
            FROM conversations
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to fetch conversation: {}", e)))?;

        match row {
            Some(row) => row_to_conversation(&row),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn append_turn(&self, id: ConversationId, turn: Turn) -> Result<Conversation, StoreError> {
        // Same-id writers are serialized here, so the history read below
        // cannot go stale before the single-statement write.
        let _guard = self.locks.acquire(id).await;

        let mut conversation = self.get_conversation(id).await?;
        conversation.record_turn(turn, Timestamp::now());
        let messages = encode_history(conversation.messages())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE conversations SET
                messages = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(messages)
        .bind(*conversation.updated_at().as_datetime())
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database(format!("Failed to update conversation: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        tracing::debug!(
            conversation_id = %id,
            message_count = conversation.messages().len(),
            "Turn appended"
        );
        Ok(conversation)
    }

    async fn reset_all(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            StoreError::database(format!("Failed to start transaction: {}", e))
        })?;

        sqlx::query("DROP TABLE IF EXISTS conversations")
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::database(format!("Failed to drop table: {}", e)))?;
        create_schema(&mut *tx).await?;

        tx.commit().await.map_err(|e| {
            StoreError::database(format!("Failed to commit transaction: {}", e))
        })?;

        tracing::warn!("All conversations deleted");
        Ok(())
    }
}
