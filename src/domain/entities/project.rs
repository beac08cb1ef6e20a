use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{
    article::{validate_url, new_validation_error},
    option_fields::OptionField,
};

/// `projects` row; `tags` holds a JSON-encoded string array.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub tags: String,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = serde_json::Error;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            id: row.id,
            name: row.name,
            description: row.description,
            tags: serde_json::from_str(&row.tags)?,
            image_url: row.image_url.filter(|s| !s.is_empty()),
            github_url: row.github_url.filter(|s| !s.is_empty()),
            live_url: row.live_url.filter(|s| !s.is_empty()),
            order: row.order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: String,

    #[validate(length(max = 20, message = "Too many tags provided"))]
    pub tags: Vec<String>,

    #[validate(custom(function = "validate_url"))]
    pub github_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub live_url: Option<String>,

    #[validate(custom(function = "validate_url"))]
    pub image_url: Option<String>,

    pub order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(custom(function = "validate_required_text"))]
    pub name: OptionField<String>,

    #[validate(custom(function = "validate_required_text"))]
    pub description: OptionField<String>,

    pub tags: OptionField<Vec<String>>,

    #[validate(custom(function = "validate_optional_url"))]
    pub github_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub live_url: OptionField<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub image_url: OptionField<String>,

    pub order: OptionField<i32>,
}

pub fn validate_required_text(value: &OptionField<String>) -> Result<(), validator::ValidationError> {
    match value {
        OptionField::SetToNull => Err(new_validation_error("not_nullable", "Field cannot be null")),
        _ => Ok(()),
    }
}

pub fn validate_optional_url(value: &OptionField<String>) -> Result<(), validator::ValidationError> {
    match value {
        OptionField::SetToValue(url) => validate_url(url),
        _ => Ok(()),
    }
}

/// Serializes the tag list into the JSON text stored in `projects.tags`.
pub fn encode_tags(tags: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(tags: &str) -> ProjectRow {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        ProjectRow {
            id: 1,
            name: "blog".into(),
            description: "personal blog".into(),
            tags: tags.into(),
            image_url: Some(String::new()),
            github_url: Some("https://github.com/x/blog".into()),
            live_url: None,
            order: 0,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn decodes_json_tags_and_blanks_empty_urls() {
        let project = Project::try_from(row(r#"["rust","actix"]"#)).unwrap();
        assert_eq!(project.tags, vec!["rust", "actix"]);
        assert_eq!(project.image_url, None);
        assert!(project.github_url.is_some());
    }

    #[test]
    fn rejects_corrupt_tag_column() {
        assert!(Project::try_from(row("rust,actix")).is_err());
    }

    #[test]
    fn tags_survive_encoding() {
        let tags = vec!["中文".to_string(), "a\"b".to_string()];
        let project = Project::try_from(row(&encode_tags(&tags).unwrap())).unwrap();
        assert_eq!(project.tags, tags);
    }
}
