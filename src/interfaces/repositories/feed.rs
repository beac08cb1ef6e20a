use async_trait::async_trait;
use sqlx::{self, PgPool};

use crate::{
    entities::{
        article::{Article, ArticleRow, ArticleSummary},
        tag::TagArticleRow,
    },
    errors::AppError,
    repositories::{
        article::{with_tags, ARTICLE_SELECT},
        sqlx_repo::SqlxFeedRepo,
        tag::fetch_published_tag_rows,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedRepository: Sync + Send {
    /// Newest published articles by `updated_at`, with author and tags.
    async fn latest_published(&self, limit: i64) -> Result<Vec<Article>, AppError>;
    async fn published_summaries(&self) -> Result<Vec<ArticleSummary>, AppError>;
    async fn published_tag_rows(&self) -> Result<Vec<TagArticleRow>, AppError>;
}

impl SqlxFeedRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxFeedRepo { pool }
    }
}

#[async_trait]
impl FeedRepository for SqlxFeedRepo {
    async fn latest_published(&self, limit: i64) -> Result<Vec<Article>, AppError> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            "{ARTICLE_SELECT} WHERE a.is_draft = FALSE ORDER BY a.updated_at DESC, a.id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        with_tags(&self.pool, rows).await
    }

    async fn published_summaries(&self) -> Result<Vec<ArticleSummary>, AppError> {
        let articles = sqlx::query_as::<_, ArticleSummary>(
            r#"
            SELECT id, title, slug, updated_at
            FROM articles
            WHERE is_draft = FALSE
            ORDER BY updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(articles)
    }

    async fn published_tag_rows(&self) -> Result<Vec<TagArticleRow>, AppError> {
        fetch_published_tag_rows(&self.pool).await
    }
}
