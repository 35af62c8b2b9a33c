use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;

use crate::{
    application::repos::{
        RepoError, SnippetQueryFilter, SnippetsRepo, SnippetsWriteRepo, UpsertSnippetParams,
        UpsertTranslationParams,
    },
    domain::entities::{SnippetRecord, TranslationRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

const DEFAULT_LIST_LIMIT: u32 = 100;
const MAX_LIST_LIMIT: u32 = 1000;

#[derive(sqlx::FromRow)]
struct SnippetRow {
    key: String,
    text: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<SnippetRow> for SnippetRecord {
    fn from(row: SnippetRow) -> Self {
        Self {
            key: row.key,
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TranslationRow {
    snippet_key: String,
    language: String,
    text: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<TranslationRow> for TranslationRecord {
    fn from(row: TranslationRow) -> Self {
        Self {
            snippet_key: row.snippet_key,
            language: row.language,
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SnippetsRepo for PostgresRepositories {
    async fn find_snippet(&self, key: &str) -> Result<Option<SnippetRecord>, RepoError> {
        let row = sqlx::query_as::<_, SnippetRow>(
            r#"
            SELECT key, text, created_at, updated_at
            FROM snippets
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SnippetRecord::from))
    }

    async fn list_translations(&self, key: &str) -> Result<Vec<TranslationRecord>, RepoError> {
        let rows = sqlx::query_as::<_, TranslationRow>(
            r#"
            SELECT snippet_key, language, text, created_at, updated_at
            FROM snippet_translations
            WHERE snippet_key = $1
            ORDER BY language ASC
            "#,
        )
        .bind(key)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TranslationRecord::from).collect())
    }

    async fn list_snippets(
        &self,
        filter: &SnippetQueryFilter,
    ) -> Result<Vec<SnippetRecord>, RepoError> {
        let mut qb =
            QueryBuilder::new("SELECT key, text, created_at, updated_at FROM snippets WHERE 1=1 ");

        if let Some(search) = filter.search.as_ref().and_then(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }) {
            let pattern = format!("%{}%", search);
            qb.push(" AND (key ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR text ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }

        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT);
        qb.push(" ORDER BY key ASC LIMIT ");
        qb.push_bind(i64::from(limit));

        let rows = qb
            .build_query_as::<SnippetRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SnippetRecord::from).collect())
    }
}

#[async_trait]
impl SnippetsWriteRepo for PostgresRepositories {
    async fn upsert_snippet(&self, params: UpsertSnippetParams) -> Result<SnippetRecord, RepoError> {
        let row = sqlx::query_as::<_, SnippetRow>(
            r#"
            INSERT INTO snippets (key, text)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE
            SET text = EXCLUDED.text, updated_at = now()
            RETURNING key, text, created_at, updated_at
            "#,
        )
        .bind(&params.key)
        .bind(&params.text)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_snippet(&self, key: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM snippets
            WHERE key = $1
            "#,
        )
        .bind(key)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert_translation(
        &self,
        params: UpsertTranslationParams,
    ) -> Result<TranslationRecord, RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        // Touching the parent locks it against a concurrent delete until commit.
        let parent = sqlx::query(
            r#"
            UPDATE snippets
            SET updated_at = now()
            WHERE key = $1
            "#,
        )
        .bind(&params.snippet_key)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        if parent.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        let row = sqlx::query_as::<_, TranslationRow>(
            r#"
            INSERT INTO snippet_translations (snippet_key, language, text)
            VALUES ($1, $2, $3)
            ON CONFLICT (snippet_key, language) DO UPDATE
            SET text = EXCLUDED.text, updated_at = now()
            RETURNING snippet_key, language, text, created_at, updated_at
            "#,
        )
        .bind(&params.snippet_key)
        .bind(&params.language)
        .bind(&params.text)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn delete_translation(&self, key: &str, language: &str) -> Result<bool, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM snippet_translations
            WHERE snippet_key = $1 AND language = $2
            "#,
        )
        .bind(key)
        .bind(language)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
