use async_trait::async_trait;
use sqlx::{self, PgPool};

use crate::{
    entities::tag::{Tag, TagArticleRow, TagWithCount},
    errors::AppError,
    repositories::sqlx_repo::SqlxTagRepo,
};

const TAG_WITH_COUNT_SELECT: &str = r#"
    SELECT t.id, t.name, t.created_at, t.updated_at, COUNT(at.article_id) AS article_count
    FROM tags t
    LEFT JOIN article_tags at ON at.tag_id = t.id"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Sync + Send {
    async fn list_tags(&self) -> Result<Vec<Tag>, AppError>;
    async fn list_tags_with_count(&self) -> Result<Vec<TagWithCount>, AppError>;
    async fn published_tag_rows(&self) -> Result<Vec<TagArticleRow>, AppError>;
    async fn find_tag_with_count(&self, id: i32) -> Result<Option<TagWithCount>, AppError>;
    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, AppError>;
    async fn insert_tag(&self, name: &str) -> Result<Tag, AppError>;
    async fn rename_tag(&self, id: i32, name: &str) -> Result<Tag, AppError>;
    async fn delete_tag(&self, id: i32) -> Result<bool, AppError>;
}

impl SqlxTagRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxTagRepo { pool }
    }
}

/// Every (tag, published article) pair. Tags without a published article yield nothing.
pub(super) async fn fetch_published_tag_rows(pool: &PgPool) -> Result<Vec<TagArticleRow>, AppError> {
    let rows = sqlx::query_as::<_, TagArticleRow>(
        r#"
        SELECT t.id AS tag_id, t.name AS tag_name, a.id AS article_id, a.title, a.slug, a.updated_at
        FROM tags t
        JOIN article_tags at ON at.tag_id = t.id
        JOIN articles a ON a.id = at.article_id
        WHERE a.is_draft = FALSE
        ORDER BY t.name ASC, a.updated_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn map_name_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.constraint() == Some("tags_name_key") {
            return AppError::Conflict("Tag name already exists".into());
        }
    }
    AppError::from(e)
}

#[async_trait]
impl TagRepository for SqlxTagRepo {
    async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT id, name, created_at, updated_at FROM tags ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn list_tags_with_count(&self) -> Result<Vec<TagWithCount>, AppError> {
        let tags = sqlx::query_as::<_, TagWithCount>(&format!(
            "{TAG_WITH_COUNT_SELECT} GROUP BY t.id ORDER BY t.name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }

    async fn published_tag_rows(&self) -> Result<Vec<TagArticleRow>, AppError> {
        fetch_published_tag_rows(&self.pool).await
    }

    async fn find_tag_with_count(&self, id: i32) -> Result<Option<TagWithCount>, AppError> {
        let tag = sqlx::query_as::<_, TagWithCount>(&format!(
            "{TAG_WITH_COUNT_SELECT} WHERE t.id = $1 GROUP BY t.id"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tag)
    }

    async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            "SELECT id, name, created_at, updated_at FROM tags WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tag)
    }

    async fn insert_tag(&self, name: &str) -> Result<Tag, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_name_conflict)?;

        Ok(tag)
    }

    async fn rename_tag(&self, id: i32, name: &str) -> Result<Tag, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags SET name = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_name_conflict)?;

        Ok(tag)
    }

    async fn delete_tag(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match AppError::from(e) {
                AppError::Conflict(_) => AppError::Conflict("Tag is still used by articles".into()),
                other => other,
            })?;

        Ok(result.rows_affected() > 0)
    }
}
