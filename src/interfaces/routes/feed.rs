use actix_web::web;

use crate::handlers::feeds;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/rss", web::get().to(feeds::rss_feed))
        .route("/slug", web::get().to(feeds::slug_preview))
        .service(
            web::scope("/sitemap")
                .route("/articles", web::get().to(feeds::sitemap_articles))
                .route("/tags", web::get().to(feeds::sitemap_tags))
        );
}
