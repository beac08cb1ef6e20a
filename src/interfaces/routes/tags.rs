use actix_web::web;

use crate::handlers::tags;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tags")
            .service(
                web::resource("")
                    .route(web::get().to(tags::list_tags))
                    .route(web::post().to(tags::create_tag))
            )
            .service(
                web::resource("/names")
                    .route(web::get().to(tags::list_tag_names))
            )
            .service(
                web::resource("/batch-delete")
                    .route(web::post().to(tags::batch_delete_tags))
            )
            .service(
                web::resource("/{tag_id}")
                    .route(web::get().to(tags::get_tag))
                    .route(web::put().to(tags::update_tag))
                    .route(web::delete().to(tags::delete_tag))
            )
    );
}
