use blog_backend::{
    entities::article::{Article, ArticleRow, TagRef},
    use_cases::feeds::{render_rss, FeedSettings, FEED_ITEM_LIMIT},
};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn settings() -> FeedSettings {
    FeedSettings {
        site_origin: "https://blog.example.com".into(),
        title: "Test Blog".into(),
        description: "notes & more".into(),
        language: "en".into(),
        copyright_holder: "example.com".into(),
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

fn article(id: i32, title: &str, content: &str, tags: Vec<TagRef>) -> Article {
    let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Article::from_row(
        ArticleRow {
            id,
            title: title.into(),
            slug: format!("post-{id}"),
            content: content.into(),
            header_image: None,
            is_draft: false,
            author_id: "author-1".into(),
            author_name: Some("writer".into()),
            author_email: None,
            created_at: created,
            updated_at: created + Duration::hours(id as i64),
        },
        tags,
    )
}

#[test]
fn empty_feed_is_still_a_complete_channel() {
    let xml = render_rss(&settings(), "https://api.example.com", &[], now());

    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
    assert!(xml.contains(r#"<atom:link href="https://api.example.com/api/rss" rel="self" type="application/rss+xml"/>"#));
    assert!(xml.contains("<copyright>All rights reserved 2025, example.com</copyright>"));
    assert!(xml.contains("<language>en</language>"));
    assert!(!xml.contains("<item>"));
    assert!(xml.ends_with("</channel>\n</rss>"));
}

#[test]
fn feed_keeps_the_twenty_most_recently_updated() {
    let articles: Vec<Article> = (1..=25).map(|id| article(id, &format!("Post {id}"), "body", vec![])).collect();

    let xml = render_rss(&settings(), "https://api.example.com", &articles, now());

    assert_eq!(xml.matches("<item>").count(), FEED_ITEM_LIMIT);
    let first = xml.find("post-25</link>").unwrap();
    let second = xml.find("post-24</link>").unwrap();
    assert!(first < second);
    assert!(xml.contains("post-6</link>"));
    assert!(!xml.contains("post-5</link>"));
}

#[test]
fn item_text_is_wrapped_in_cdata() {
    let tags = vec![
        TagRef { id: 1, name: "rust".into() },
        TagRef { id: 2, name: "web".into() },
    ];
    let articles = vec![article(1, "A <b>bold</b> ]]> title", "# Heading\n\nSome **text**.", tags)];

    let xml = render_rss(&settings(), "https://api.example.com/", &articles, now());

    assert!(xml.contains("<title><![CDATA[A <b>bold</b> ]]]]><![CDATA[> title]]></title>"));
    assert!(xml.contains("<link>https://api.example.com/blog/post-1</link>"));
    assert!(xml.contains("<dc:creator><![CDATA[writer]]></dc:creator>"));
    assert!(xml.contains("<category><![CDATA[rust, web]]></category>"));
    assert!(xml.contains("<content:encoded><![CDATA[<h1>Heading</h1>"));
    assert!(xml.contains("<description><![CDATA[notes & more]]></description>"));
}
