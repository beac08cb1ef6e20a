use actix_web::web;

use crate::handlers::articles;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/articles")
            .service(
                web::resource("")
                    .route(web::get().to(articles::list_articles))
                    .route(web::post().to(articles::create_article))
            )
            .service(
                web::resource("/slug/{slug}")
                    .route(web::get().to(articles::get_article_by_slug))
            )
            .service(
                web::resource("/tag/{tag_name}")
                    .route(web::get().to(articles::list_articles_by_tag))
            )
            .service(
                web::resource("/{article_id}")
                    .route(web::get().to(articles::get_article))
                    .route(web::put().to(articles::update_article))
                    .route(web::delete().to(articles::delete_article))
            )
    );
}
