//! PostgreSQL database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::SessionStore;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === Session Repository ===

    async fn get_session_cards(&self, session_id: Uuid) -> Result<Vec<DbSessionCard>> {
        let cards = sqlx::query_as::<_, DbSessionCard>(
            r#"
            SELECT session_id, card_id, position, script, translation, annotation, selected
            FROM session_cards
            WHERE session_id = $1
            ORDER BY position
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    /// Delete a session and its cards
    pub async fn delete_session(&self, session_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SessionStore for Database {
    async fn get(&self, session_id: Uuid) -> Result<Option<Session>> {
        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT created_at FROM sessions WHERE id = $1",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(created_at) = created_at else {
            return Ok(None);
        };

        let cards = self
            .get_session_cards(session_id)
            .await?
            .iter()
            .map(DbSessionCard::to_card)
            .collect();

        Ok(Some(Session {
            id: session_id,
            cards,
            created_at,
        }))
    }

    async fn put(&self, session_id: Uuid, cards: Vec<CardDraft>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sessions (id)
            VALUES ($1)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM session_cards WHERE session_id = $1")
            .bind(session_id)
            .execute(&mut *tx)
            .await?;

        for (position, card) in cards.iter().enumerate() {
            let row = DbSessionCard::from_card(session_id, position as i32, card);
            sqlx::query(
                r#"
                INSERT INTO session_cards
                    (session_id, card_id, position, script, translation, annotation, selected)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(row.session_id)
            .bind(row.card_id)
            .bind(row.position)
            .bind(&row.script)
            .bind(&row.translation)
            .bind(&row.annotation)
            .bind(row.selected)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn update(&self, session_id: Uuid, card_id: Uuid, patch: CardPatch) -> Result<CardDraft> {
        let row = sqlx::query_as::<_, DbSessionCard>(
            r#"
            UPDATE session_cards
            SET translation = COALESCE($3, translation),
                annotation = COALESCE($4, annotation),
                selected = COALESCE($5, selected)
            WHERE session_id = $1 AND card_id = $2
            RETURNING session_id, card_id, position, script, translation, annotation, selected
            "#,
        )
        .bind(session_id)
        .bind(card_id)
        .bind(patch.translation)
        .bind(patch.annotation)
        .bind(patch.selected)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Card {} in session {}", card_id, session_id))
        })?;

        Ok(row.to_card())
    }
}
