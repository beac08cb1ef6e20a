use actix_web::{
    http::header::{CacheControl, CacheDirective, ContentType},
    web, HttpRequest, HttpResponse, Responder,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    errors::AppError,
    handlers::envelope::success,
    utils::slug::generate_slug,
    AppState,
};

const FEED_MAX_AGE: u32 = 3600;

fn rss_response(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/xml; charset=utf-8")
        .insert_header(CacheControl(vec![
            CacheDirective::Public,
            CacheDirective::MaxAge(FEED_MAX_AGE),
        ]))
        .body(body)
}

fn sitemap_response(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("application/xml").body(body)
}

/// The feed's self link follows the scheme and host the client used.
#[instrument(skip(req, state))]
pub async fn rss_feed(req: HttpRequest, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let base_url = {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    };

    let xml = state.feed_handler.rss(&base_url).await?;
    Ok(rss_response(xml))
}

#[instrument(skip(state))]
pub async fn sitemap_xml(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let xml = state.feed_handler.sitemap().await?;
    Ok(sitemap_response(xml))
}

#[instrument(skip(state))]
pub async fn robots_txt(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .body(state.feed_handler.robots())
}

#[instrument(skip(state))]
pub async fn sitemap_articles(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(success(state.feed_handler.sitemap_articles().await?))
}

#[instrument(skip(state))]
pub async fn sitemap_tags(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(success(state.feed_handler.sitemap_tags().await?))
}

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub title: Option<String>,
}

/// Previews the slug an article with this title would get.
#[instrument]
pub async fn slug_preview(query: web::Query<SlugQuery>) -> Result<impl Responder, AppError> {
    let title = query
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::invalid("title", "title is required"))?;

    Ok(success(serde_json::json!({ "slug": generate_slug(title) })))
}

#[cfg(test)]
mod tests {
    use actix_web::http::header;

    use super::*;

    #[test]
    fn rss_is_cached_for_an_hour() {
        let resp = rss_response("<rss/>".into());
        let headers = resp.headers();

        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/xml; charset=utf-8");
        assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "public, max-age=3600");
    }

    #[test]
    fn sitemap_is_plain_xml_without_caching() {
        let resp = sitemap_response("<urlset/>".into());
        let headers = resp.headers();

        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/xml");
        assert!(headers.get(header::CACHE_CONTROL).is_none());
    }
}
