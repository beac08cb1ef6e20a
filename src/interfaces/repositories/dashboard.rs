use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{self, PgPool};

use crate::{
    entities::{
        article::ArticleRow,
        dashboard::{ArticleStamp, Overview, RecentArticle, TopTag},
        friend::{Friend, FriendRow},
        project::{Project, ProjectRow},
        slide::Slide,
    },
    errors::AppError,
    repositories::{
        article::{with_tags, ARTICLE_SELECT},
        friend::{with_links, FRIEND_SELECT},
        project::{decode_rows, PROJECT_SELECT},
        slide::SLIDE_SELECT,
        sqlx_repo::SqlxDashboardRepo,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardRepository: Sync + Send {
    async fn overview(&self) -> Result<Overview, AppError>;
    async fn recent_articles(&self, limit: i64) -> Result<Vec<RecentArticle>, AppError>;
    async fn recent_projects(&self, limit: i64) -> Result<Vec<Project>, AppError>;
    async fn recent_slides(&self, limit: i64) -> Result<Vec<Slide>, AppError>;
    async fn recent_friends(&self, limit: i64) -> Result<Vec<Friend>, AppError>;
    async fn article_stamps_since(&self, since: DateTime<Utc>) -> Result<Vec<ArticleStamp>, AppError>;
    async fn project_creations_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, AppError>;
    async fn slide_creations_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, AppError>;
    async fn top_tags(&self, limit: i64) -> Result<Vec<TopTag>, AppError>;
}

impl SqlxDashboardRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxDashboardRepo { pool }
    }

    async fn creations_since(&self, table: &str, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, AppError> {
        let stamps = sqlx::query_scalar::<_, DateTime<Utc>>(&format!(
            "SELECT created_at FROM {table} WHERE created_at >= $1"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(stamps)
    }
}

#[async_trait]
impl DashboardRepository for SqlxDashboardRepo {
    async fn overview(&self) -> Result<Overview, AppError> {
        let overview = sqlx::query_as::<_, Overview>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM articles) AS total_articles,
                (SELECT COUNT(*) FROM articles WHERE is_draft = FALSE) AS published_articles,
                (SELECT COUNT(*) FROM articles WHERE is_draft = TRUE) AS draft_articles,
                (SELECT COUNT(*) FROM projects) AS total_projects,
                (SELECT COUNT(*) FROM slides) AS total_slides,
                (SELECT COUNT(*) FROM tags) AS total_tags,
                (SELECT COUNT(*) FROM users) AS total_users
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(overview)
    }

    async fn recent_articles(&self, limit: i64) -> Result<Vec<RecentArticle>, AppError> {
        let rows = sqlx::query_as::<_, ArticleRow>(&format!(
            "{ARTICLE_SELECT} ORDER BY a.created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let articles = with_tags(&self.pool, rows).await?;
        Ok(articles.into_iter().map(RecentArticle::from).collect())
    }

    async fn recent_projects(&self, limit: i64) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "{PROJECT_SELECT} ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        decode_rows(rows)
    }

    async fn recent_slides(&self, limit: i64) -> Result<Vec<Slide>, AppError> {
        let slides = sqlx::query_as::<_, Slide>(&format!(
            "{SLIDE_SELECT} ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(slides.into_iter().map(Slide::normalized).collect())
    }

    async fn recent_friends(&self, limit: i64) -> Result<Vec<Friend>, AppError> {
        let rows = sqlx::query_as::<_, FriendRow>(&format!(
            "{FRIEND_SELECT} ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        with_links(&self.pool, rows).await
    }

    async fn article_stamps_since(&self, since: DateTime<Utc>) -> Result<Vec<ArticleStamp>, AppError> {
        let stamps = sqlx::query_as::<_, ArticleStamp>(
            "SELECT created_at, is_draft FROM articles WHERE created_at >= $1",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(stamps)
    }

    async fn project_creations_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, AppError> {
        self.creations_since("projects", since).await
    }

    async fn slide_creations_since(&self, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>, AppError> {
        self.creations_since("slides", since).await
    }

    async fn top_tags(&self, limit: i64) -> Result<Vec<TopTag>, AppError> {
        let tags = sqlx::query_as::<_, TopTag>(
            r#"
            SELECT t.id, t.name, COUNT(at.article_id) AS article_count
            FROM tags t
            LEFT JOIN article_tags at ON at.tag_id = t.id
            GROUP BY t.id
            ORDER BY article_count DESC, t.name ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(tags)
    }
}
