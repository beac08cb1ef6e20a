use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    entities::option_fields::OptionField,
    utils::{
        reading_time::{estimate_reading_time, truncate_preview},
        slug::generate_slug,
    },
};

// ───── Constants ──────────────────────────────────────────────────────
const MIN_TITLE_LENGTH: u64 = 1;
const MAX_TITLE_LENGTH: u64 = 200;
const MAX_SLUG_LENGTH: usize = 200;
const MAX_TAGS: usize = 20;


// ───── Database Models ───────────────────────────────────────────────

/// An `articles` row joined with its author's display fields.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub header_image: Option<String>,
    pub is_draft: bool,
    pub author_id: String,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One article/tag association, used to attach tags to a batch of articles.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleTagRow {
    pub article_id: i32,
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ArticleInsert {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub header_image: Option<String>,
    pub is_draft: bool,
    pub tag_ids: Vec<i32>,
}

/// Search/tag restriction applied to the public article listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishedFilter {
    pub search: Option<String>,
    pub tag: Option<String>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TagRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub header_image: Option<String>,
    pub is_draft: bool,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<TagRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
}

/// Minimal published-article view used by sitemaps and tag listings.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewArticleRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    pub content: String,

    #[validate(custom(function = "validate_url"))]
    pub header_image: Option<String>,

    pub is_draft: Option<bool>,

    #[validate(custom(function = "validate_tag_ids"))]
    pub tag_ids: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[validate(custom(function = "validate_optional_title"))]
    pub title: OptionField<String>,

    #[validate(custom(function = "validate_optional_slug"))]
    pub slug: OptionField<String>,

    #[validate(custom(function = "validate_required_content"))]
    pub content: OptionField<String>,

    #[validate(custom(function = "validate_optional_url_field"))]
    pub header_image: OptionField<String>,

    #[validate(custom(function = "validate_required_flag"))]
    pub is_draft: OptionField<bool>,

    #[validate(custom(function = "validate_optional_tag_ids"))]
    pub tag_ids: OptionField<Vec<i32>>,
}

// ───── Validation Helpers ───────────────────────────────────────────
pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Invalid URL format")),
    }
}

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(new_validation_error("slug_empty", "Slug cannot be empty"));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(new_validation_error("slug_too_long", "Slug is too long"));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(new_validation_error("title_blank", "Title cannot be blank"));
    }
    Ok(())
}

pub fn validate_tag_ids(ids: &[i32]) -> Result<(), ValidationError> {
    if ids.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "Too many tags provided"));
    }
    if ids.iter().any(|id| *id <= 0) {
        return Err(new_validation_error("invalid_tag_id", "Tag ids must be positive"));
    }
    Ok(())
}

pub fn validate_optional_title(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(title) => {
            if title.chars().count() as u64 > MAX_TITLE_LENGTH {
                return Err(new_validation_error("title_too_long", "Title is too long"));
            }
            validate_title(title)
        }
        OptionField::SetToNull => Err(not_nullable()),
        OptionField::Unchanged => Ok(()),
    }
}

pub fn validate_optional_slug(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(slug) => validate_slug(slug),
        OptionField::SetToNull => Err(not_nullable()),
        OptionField::Unchanged => Ok(()),
    }
}

pub fn validate_required_content(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToNull => Err(not_nullable()),
        _ => Ok(()),
    }
}

pub fn validate_required_flag(value: &OptionField<bool>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToNull => Err(not_nullable()),
        _ => Ok(()),
    }
}

pub fn validate_optional_url_field(value: &OptionField<String>) -> Result<(), ValidationError> {
    if let OptionField::SetToValue(url) = value {
        validate_url(url)?;
    }
    Ok(())
}

pub fn validate_optional_tag_ids(value: &OptionField<Vec<i32>>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(ids) => validate_tag_ids(ids),
        OptionField::SetToNull => Err(not_nullable()),
        OptionField::Unchanged => Ok(()),
    }
}

fn not_nullable() -> ValidationError {
    new_validation_error("not_nullable", "Field cannot be null")
}

pub(crate) fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewArticleRequest> for ArticleInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewArticleRequest) -> Result<Self, Self::Error> {
        value.validate()?;

        // Generate slug if not provided
        let slug = match value.slug {
            Some(s) => s,
            None => {
                let generated = generate_slug(&value.title);
                if generated.is_empty() {
                    let mut errors = ValidationErrors::new();
                    errors.add("slug", new_validation_error("slug_unrepresentable", "Could not derive a slug from the title; please provide one"));
                    return Err(errors);
                }
                generated
            }
        };

        let mut tag_ids = value.tag_ids.unwrap_or_default();
        tag_ids.sort_unstable();
        tag_ids.dedup();

        Ok(ArticleInsert {
            title: value.title.trim().to_string(),
            slug,
            content: value.content,
            header_image: value.header_image,
            is_draft: value.is_draft.unwrap_or(false),
            tag_ids,
        })
    }
}

impl Article {
    pub fn from_row(row: ArticleRow, tags: Vec<TagRef>) -> Self {
        let author = row.author_name.map(|name| Author {
            id: row.author_id.clone(),
            name,
            email: row.author_email,
        });

        Article {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content: row.content,
            header_image: row.header_image,
            is_draft: row.is_draft,
            author_id: row.author_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            tags,
            author,
            reading_time: None,
        }
    }

    /// Attach tags to each row, keeping row order. `tag_rows` may come in any order.
    pub fn assemble(rows: Vec<ArticleRow>, tag_rows: Vec<ArticleTagRow>) -> Vec<Article> {
        let mut tags_by_article: HashMap<i32, Vec<TagRef>> = HashMap::new();
        for row in tag_rows {
            tags_by_article
                .entry(row.article_id)
                .or_default()
                .push(TagRef { id: row.id, name: row.name });
        }

        rows.into_iter()
            .map(|row| {
                let mut tags = tags_by_article.remove(&row.id).unwrap_or_default();
                tags.sort_by(|a, b| a.name.cmp(&b.name));
                Article::from_row(row, tags)
            })
            .collect()
    }

    pub fn with_reading_time(mut self) -> Self {
        self.reading_time = Some(estimate_reading_time(&self.content));
        self
    }

    /// Reading time from the full body, then the body cut down to a preview.
    pub fn into_preview(self) -> Self {
        let mut article = self.with_reading_time();
        article.content = truncate_preview(&article.content);
        article
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(id: i32) -> ArticleRow {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        ArticleRow {
            id,
            title: format!("Post {id}"),
            slug: format!("post-{id}"),
            content: "x".repeat(1200),
            header_image: None,
            is_draft: false,
            author_id: "user-1".into(),
            author_name: Some("ichiyo".into()),
            author_email: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn request(title: &str, slug: Option<&str>) -> NewArticleRequest {
        NewArticleRequest {
            title: title.into(),
            slug: slug.map(String::from),
            content: "body".into(),
            header_image: None,
            is_draft: None,
            tag_ids: Some(vec![3, 1, 3]),
        }
    }

    #[test]
    fn insert_derives_slug_from_title() {
        let insert = ArticleInsert::try_from(request("你好 World", None)).unwrap();
        assert_eq!(insert.slug, "ni-hao-world");
        assert!(!insert.is_draft);
        assert_eq!(insert.tag_ids, vec![1, 3]);
    }

    #[test]
    fn insert_rejects_malformed_slug() {
        let err = ArticleInsert::try_from(request("Hello", Some("Bad Slug"))).unwrap_err();
        assert!(err.field_errors().contains_key("slug"));
    }

    #[test]
    fn insert_rejects_title_without_slug_material() {
        assert!(ArticleInsert::try_from(request("!!!", None)).is_err());
    }

    #[test]
    fn update_rejects_null_title_but_allows_null_header_image() {
        let patch: UpdateArticleRequest =
            serde_json::from_str(r#"{"headerImage": null}"#).unwrap();
        assert!(patch.validate().is_ok());

        let patch: UpdateArticleRequest = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(patch.validate().is_err());
    }

    #[test]
    fn assemble_keeps_row_order_and_groups_tags() {
        let articles = Article::assemble(
            vec![row(2), row(1)],
            vec![
                ArticleTagRow { article_id: 1, id: 10, name: "rust".into() },
                ArticleTagRow { article_id: 2, id: 11, name: "web".into() },
                ArticleTagRow { article_id: 1, id: 12, name: "async".into() },
            ],
        );

        assert_eq!(articles[0].id, 2);
        assert_eq!(articles[0].tags, vec![TagRef { id: 11, name: "web".into() }]);
        assert_eq!(
            articles[1].tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            vec!["async", "rust"]
        );
        assert_eq!(articles[1].author.as_ref().map(|a| a.name.as_str()), Some("ichiyo"));
    }

    #[test]
    fn preview_uses_full_content_for_reading_time() {
        let article = Article::from_row(row(1), vec![]).into_preview();
        assert_eq!(article.reading_time, Some(3));
        assert_eq!(article.content.len(), 503);
    }

    #[test]
    fn serializes_camel_case_fields() {
        let json = serde_json::to_value(Article::from_row(row(1), vec![]).with_reading_time()).unwrap();
        assert_eq!(json["isDraft"], false);
        assert_eq!(json["authorId"], "user-1");
        assert_eq!(json["readingTime"], 3);
        assert!(json.get("author_id").is_none());
    }
}
