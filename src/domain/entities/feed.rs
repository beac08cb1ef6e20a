use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::article::ArticleSummary;

/// A published article as listed by the sitemap JSON helper.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapArticle {
    pub title: String,
    pub slug: String,
    pub updated_at: DateTime<Utc>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SitemapTag {
    pub name: String,
    pub articles: Vec<ArticleSummary>,
    pub url: String,
}
