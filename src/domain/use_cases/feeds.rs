//! RSS 2.0, XML sitemap and robots.txt rendering over published content.
//!
//! Rendering is pure; [`FeedHandler`] only fetches the rows and stamps the clock.

use std::fmt::Write;

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

use crate::{
    entities::{
        article::{Article, ArticleSummary},
        feed::{SitemapArticle, SitemapTag},
        tag::TagWithArticles,
    },
    errors::AppError,
    repositories::feed::FeedRepository,
    settings::AppConfig,
    utils::markdown::{safe_markdown_to_html, strip_markdown},
};

pub const FEED_ITEM_LIMIT: usize = 20;

/// Static top-level pages: path, changefreq, priority.
const STATIC_PAGES: [(&str, &str, f32); 6] = [
    ("/", "daily", 1.0),
    ("/blog", "daily", 0.9),
    ("/about", "monthly", 0.7),
    ("/archive", "weekly", 0.7),
    ("/links", "weekly", 0.6),
    ("/tags", "weekly", 0.6),
];

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub site_origin: String,
    pub title: String,
    pub description: String,
    pub language: String,
    pub copyright_holder: String,
}

impl From<&AppConfig> for FeedSettings {
    fn from(config: &AppConfig) -> Self {
        FeedSettings {
            site_origin: config.site_origin(),
            title: config.feed_title.clone(),
            description: config.feed_description.clone(),
            language: config.feed_language.clone(),
            copyright_holder: config.feed_copyright_holder.clone(),
        }
    }
}

pub struct FeedHandler<R>
where
    R: FeedRepository,
{
    pub feed_repo: R,
    pub settings: FeedSettings,
}

impl<R> FeedHandler<R>
where
    R: FeedRepository,
{
    pub fn new(feed_repo: R, settings: FeedSettings) -> Self {
        FeedHandler { feed_repo, settings }
    }

    /// `base_url` is the origin the feed was requested from.
    pub async fn rss(&self, base_url: &str) -> Result<String, AppError> {
        let articles = self.feed_repo.latest_published(FEED_ITEM_LIMIT as i64).await?;
        Ok(render_rss(&self.settings, base_url, &articles, Utc::now()))
    }

    pub async fn sitemap(&self) -> Result<String, AppError> {
        let articles = self.feed_repo.published_summaries().await?;
        let tags = TagWithArticles::group(self.feed_repo.published_tag_rows().await?);
        Ok(render_sitemap(&self.settings.site_origin, &articles, &tags))
    }

    pub fn robots(&self) -> String {
        render_robots(&self.settings.site_origin)
    }

    pub async fn sitemap_articles(&self) -> Result<Vec<SitemapArticle>, AppError> {
        let origin = &self.settings.site_origin;
        let articles = self.feed_repo.published_summaries().await?;

        Ok(articles
            .into_iter()
            .map(|a| SitemapArticle {
                url: article_url(origin, &a.slug),
                title: a.title,
                slug: a.slug,
                updated_at: a.updated_at,
            })
            .collect())
    }

    pub async fn sitemap_tags(&self) -> Result<Vec<SitemapTag>, AppError> {
        let origin = &self.settings.site_origin;
        let tags = TagWithArticles::group(self.feed_repo.published_tag_rows().await?);

        Ok(tags
            .into_iter()
            .map(|t| SitemapTag {
                url: tag_url(origin, &t.name),
                name: t.name,
                articles: t.articles,
            })
            .collect())
    }
}

pub fn article_url(origin: &str, slug: &str) -> String {
    format!("{origin}/blog/{slug}")
}

pub fn tag_url(origin: &str, name: &str) -> String {
    format!("{origin}/tags/{}", urlencoding::encode(name))
}

/// Wraps text in CDATA. A literal `]]>` is split across two sections.
fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// RSS 2.0 document for the newest published articles, at most
/// [`FEED_ITEM_LIMIT`] items by descending `updated_at`.
pub fn render_rss(settings: &FeedSettings, base_url: &str, articles: &[Article], now: DateTime<Utc>) -> String {
    let base_url = base_url.trim_end_matches('/');
    let mut newest: Vec<&Article> = articles.iter().collect();
    newest.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    newest.truncate(FEED_ITEM_LIMIT);

    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    xml.push('\n');
    xml.push_str(concat!(
        r#"<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/" "#,
        r#"xmlns:content="http://purl.org/rss/1.0/modules/content/" "#,
        r#"xmlns:atom="http://www.w3.org/2005/Atom">"#,
    ));
    xml.push_str("\n<channel>\n");

    let _ = writeln!(xml, "<title>{}</title>", cdata(&settings.title));
    let _ = writeln!(xml, "<link>{}</link>", xml_escape(base_url));
    let _ = writeln!(xml, "<description>{}</description>", cdata(&settings.description));
    let _ = writeln!(xml, "<lastBuildDate>{}</lastBuildDate>", now.to_rfc2822());
    let _ = writeln!(xml, "<docs>https://validator.w3.org/feed/docs/rss2.html</docs>");
    let _ = writeln!(xml, "<generator>{}</generator>", xml_escape(&settings.copyright_holder));
    let _ = writeln!(xml, "<language>{}</language>", xml_escape(&settings.language));
    let _ = writeln!(
        xml,
        "<copyright>All rights reserved {}, {}</copyright>",
        now.year(),
        xml_escape(&settings.copyright_holder)
    );
    let _ = writeln!(
        xml,
        r#"<atom:link href="{}/api/rss" rel="self" type="application/rss+xml"/>"#,
        xml_escape(base_url)
    );

    for article in newest {
        let link = xml_escape(&article_url(base_url, &article.slug));

        xml.push_str("<item>\n");
        let _ = writeln!(xml, "<title>{}</title>", cdata(&article.title));
        let _ = writeln!(xml, "<link>{link}</link>");
        let _ = writeln!(xml, "<guid>{link}</guid>");
        let _ = writeln!(xml, "<pubDate>{}</pubDate>", article.updated_at.to_rfc2822());
        let _ = writeln!(xml, "<description>{}</description>", cdata(&strip_markdown(&article.content)));
        let _ = writeln!(
            xml,
            "<content:encoded>{}</content:encoded>",
            cdata(&safe_markdown_to_html(&article.content))
        );
        if let Some(author) = &article.author {
            let _ = writeln!(xml, "<dc:creator>{}</dc:creator>", cdata(&author.name));
        }
        if !article.tags.is_empty() {
            let names: Vec<&str> = article.tags.iter().map(|t| t.name.as_str()).collect();
            let _ = writeln!(xml, "<category>{}</category>", cdata(&names.join(", ")));
        }
        xml.push_str("</item>\n");
    }

    xml.push_str("</channel>\n</rss>");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&DateTime<Utc>>, changefreq: &str, priority: f32) {
    xml.push_str("<url>");
    let _ = write!(xml, "<loc>{}</loc>", xml_escape(loc));
    if let Some(at) = lastmod {
        let _ = write!(xml, "<lastmod>{}</lastmod>", iso_timestamp(at));
    }
    let _ = write!(xml, "<changefreq>{changefreq}</changefreq><priority>{priority:.1}</priority>");
    xml.push_str("</url>\n");
}

/// XML sitemap: static pages, then published articles, then tags that have
/// at least one published article.
pub fn render_sitemap(origin: &str, articles: &[ArticleSummary], tags: &[TagWithArticles]) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");

    for (path, changefreq, priority) in STATIC_PAGES {
        push_url(&mut xml, &format!("{origin}{path}"), None, changefreq, priority);
    }

    for article in articles {
        push_url(&mut xml, &article_url(origin, &article.slug), Some(&article.updated_at), "weekly", 0.8);
    }

    for tag in tags.iter().filter(|t| !t.articles.is_empty()) {
        let latest = tag.latest_update();
        push_url(&mut xml, &tag_url(origin, &tag.name), latest.as_ref(), "weekly", 0.6);
    }

    xml.push_str("</urlset>");
    xml
}

pub fn render_robots(origin: &str) -> String {
    [
        "User-agent: *".to_string(),
        "Allow: /".to_string(),
        "Disallow: /dashboard/*".to_string(),
        "Disallow: /auth/*".to_string(),
        String::new(),
        format!("Sitemap: {origin}/sitemap.xml"),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::tag::TagArticleRow,
        repositories::feed::MockFeedRepository,
    };
    use chrono::TimeZone;

    fn settings() -> FeedSettings {
        FeedSettings {
            site_origin: "https://i.in".into(),
            title: "Blog".into(),
            description: "notes".into(),
            language: "zh-cn".into(),
            copyright_holder: "i.in".into(),
        }
    }

    #[test]
    fn cdata_splits_terminator() {
        assert_eq!(cdata("a]]>b"), "<![CDATA[a]]]]><![CDATA[>b]]>");
    }

    #[test]
    fn robots_points_at_sitemap() {
        let robots = render_robots("https://i.in");
        assert!(robots.starts_with("User-agent: *\nAllow: /\n"));
        assert!(robots.contains("Disallow: /dashboard/*"));
        assert!(robots.ends_with("Sitemap: https://i.in/sitemap.xml"));
    }

    #[test]
    fn tag_urls_are_percent_encoded() {
        assert_eq!(tag_url("https://i.in", "c++ 笔记"), "https://i.in/tags/c%2B%2B%20%E7%AC%94%E8%AE%B0");
    }

    #[test]
    fn sitemap_skips_tags_without_articles() {
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 8, 30, 0).unwrap();
        let article = ArticleSummary { id: 1, title: "A".into(), slug: "a".into(), updated_at: at };
        let tags = vec![
            TagWithArticles { id: 1, name: "rust".into(), articles: vec![article.clone()] },
            TagWithArticles { id: 2, name: "empty".into(), articles: vec![] },
        ];

        let xml = render_sitemap("https://i.in", &[article], &tags);

        assert_eq!(xml.matches("<url>").count(), 6 + 1 + 1);
        assert!(xml.contains("<loc>https://i.in/blog/a</loc><lastmod>2025-02-01T08:30:00.000Z</lastmod><changefreq>weekly</changefreq><priority>0.8</priority>"));
        assert!(xml.contains("<loc>https://i.in/tags/rust</loc>"));
        assert!(!xml.contains("/tags/empty"));
        assert!(xml.contains("<loc>https://i.in/</loc><changefreq>daily</changefreq><priority>1.0</priority>"));
    }

    #[tokio::test]
    async fn json_helpers_attach_absolute_urls() {
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let mut repo = MockFeedRepository::new();
        repo.expect_published_summaries().returning(move || {
            Ok(vec![ArticleSummary { id: 1, title: "Hi".into(), slug: "hi".into(), updated_at: at }])
        });
        repo.expect_published_tag_rows().returning(move || {
            Ok(vec![TagArticleRow {
                tag_id: 4,
                tag_name: "日记".into(),
                article_id: 1,
                title: "Hi".into(),
                slug: "hi".into(),
                updated_at: at,
            }])
        });
        let handler = FeedHandler::new(repo, settings());

        let articles = handler.sitemap_articles().await.unwrap();
        assert_eq!(articles[0].url, "https://i.in/blog/hi");

        let tags = handler.sitemap_tags().await.unwrap();
        assert_eq!(tags[0].url, "https://i.in/tags/%E6%97%A5%E8%AE%B0");
        assert_eq!(tags[0].articles.len(), 1);
    }
}
