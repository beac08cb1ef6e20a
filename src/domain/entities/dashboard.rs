use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{
    article::{Article, Author, TagRef},
    friend::Friend,
    project::Project,
    slide::Slide,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_articles: i64,
    pub published_articles: i64,
    pub draft_articles: i64,
    pub total_projects: i64,
    pub total_slides: i64,
    pub total_tags: i64,
    pub total_users: i64,
}

/// One `YYYY-MM` bucket of the rolling twelve-month histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    pub month: String,
    pub count: u32,
    pub published_count: u32,
    pub draft_count: u32,
}

/// One `YYYY-MM-DD` bucket of the seven-day activity trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: String,
    pub articles_created: u32,
    pub projects_created: u32,
    pub slides_created: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopTag {
    pub id: i32,
    pub name: String,
    pub article_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusDistribution {
    pub published: i64,
    pub draft: i64,
}

/// Creation time and draft flag of an article, all the histogram needs.
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct ArticleStamp {
    pub created_at: DateTime<Utc>,
    pub is_draft: bool,
}

/// Dashboard row for a recent article: metadata only, no body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentArticle {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub is_draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: Option<Author>,
    pub tags: Vec<TagRef>,
}

impl From<Article> for RecentArticle {
    fn from(article: Article) -> Self {
        RecentArticle {
            id: article.id,
            title: article.title,
            slug: article.slug,
            is_draft: article.is_draft,
            created_at: article.created_at,
            updated_at: article.updated_at,
            author: article.author,
            tags: article.tags,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overview: Overview,
    pub recent_articles: Vec<RecentArticle>,
    pub recent_projects: Vec<Project>,
    pub recent_slides: Vec<Slide>,
    pub recent_friends: Vec<Friend>,
    pub articles_by_month: Vec<MonthBucket>,
    pub top_tags: Vec<TopTag>,
    pub article_status_distribution: StatusDistribution,
    pub recent_activity_trend: Vec<DayBucket>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::entities::article::ArticleRow;

    #[test]
    fn recent_article_drops_the_body() {
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap();
        let article = Article::from_row(
            ArticleRow {
                id: 3,
                title: "Notes".into(),
                slug: "notes".into(),
                content: "a very long body".repeat(100),
                header_image: Some("https://img.example.com/a.png".into()),
                is_draft: true,
                author_id: "author-1".into(),
                author_name: Some("ichiyo".into()),
                author_email: None,
                created_at: at,
                updated_at: at,
            },
            vec![TagRef { id: 1, name: "rust".into() }],
        );

        let recent = RecentArticle::from(article);
        let json = serde_json::to_value(&recent).unwrap();

        assert_eq!(json["slug"], "notes");
        assert_eq!(json["isDraft"], true);
        assert_eq!(json["tags"][0]["name"], "rust");
        assert_eq!(json["author"]["name"], "ichiyo");
        assert!(json.get("content").is_none());
        assert!(json.get("headerImage").is_none());
    }
}
