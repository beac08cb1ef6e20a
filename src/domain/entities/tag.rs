use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::article::ArticleSummary;

const MAX_TAG_NAME_LENGTH: u64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TagWithCount {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub article_count: i64,
}

/// A published article under a tag, flattened as it comes out of the join.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagArticleRow {
    pub tag_id: i32,
    pub tag_name: String,
    pub article_id: i32,
    pub title: String,
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

/// Public tag view: only published articles, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagWithArticles {
    pub id: i32,
    pub name: String,
    pub articles: Vec<ArticleSummary>,
}

impl TagWithArticles {
    pub fn latest_update(&self) -> Option<DateTime<Utc>> {
        self.articles.iter().map(|a| a.updated_at).max()
    }

    /// Groups join rows into tags ordered by name. A tag with no published
    /// article produces no rows, so it never appears here.
    pub fn group(rows: Vec<TagArticleRow>) -> Vec<TagWithArticles> {
        let mut tags: Vec<TagWithArticles> = Vec::new();
        let mut index: HashMap<i32, usize> = HashMap::new();

        for row in rows {
            let summary = ArticleSummary {
                id: row.article_id,
                title: row.title,
                slug: row.slug,
                updated_at: row.updated_at,
            };
            match index.get(&row.tag_id).copied() {
                Some(at) => tags[at].articles.push(summary),
                None => {
                    index.insert(row.tag_id, tags.len());
                    tags.push(TagWithArticles {
                        id: row.tag_id,
                        name: row.tag_name,
                        articles: vec![summary],
                    });
                }
            }
        }

        tags.sort_by(|a, b| a.name.cmp(&b.name));
        for tag in &mut tags {
            tag.articles.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        }
        tags
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(length(min = 1, max = MAX_TAG_NAME_LENGTH, message = "Tag name must be between 1 and 50 characters"))]
    pub name: String,
}

impl TagRequest {
    pub fn trimmed(&self) -> TagRequest {
        TagRequest { name: self.name.trim().to_string() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedDeletion {
    pub id: i32,
    pub reason: String,
}

/// Outcome of a best-effort batch delete; one entry per requested id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchDeleteResult {
    pub deleted: Vec<i32>,
    pub failed: Vec<FailedDeletion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(tag_id: i32, tag_name: &str, article_id: i32, day: u32) -> TagArticleRow {
        TagArticleRow {
            tag_id,
            tag_name: tag_name.into(),
            article_id,
            title: format!("Article {article_id}"),
            slug: format!("article-{article_id}"),
            updated_at: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn groups_by_tag_sorted_by_name_with_newest_article_first() {
        let grouped = TagWithArticles::group(vec![
            row(2, "rust", 1, 1),
            row(1, "async", 1, 1),
            row(2, "rust", 2, 9),
        ]);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].name, "async");
        assert_eq!(grouped[1].name, "rust");
        assert_eq!(grouped[1].articles[0].id, 2);
        assert_eq!(
            grouped[1].latest_update(),
            Some(Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn interleaved_rows_land_in_their_own_tag() {
        let mut rows = Vec::new();
        for article_id in 1..=30 {
            let tag_id = article_id % 3 + 1;
            rows.push(row(tag_id, &format!("tag-{tag_id}"), article_id, (article_id % 28 + 1) as u32));
        }
        rows.reverse();

        let grouped = TagWithArticles::group(rows);

        assert_eq!(grouped.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), ["tag-1", "tag-2", "tag-3"]);
        for tag in &grouped {
            assert_eq!(tag.articles.len(), 10);
            assert!(tag.articles.iter().all(|a| a.id % 3 + 1 == tag.id));
            assert!(tag.articles.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
        }
    }

    #[test]
    fn request_trims_whitespace() {
        let request = TagRequest { name: "  rust \n".into() };
        assert_eq!(request.trimmed().name, "rust");
    }
}
