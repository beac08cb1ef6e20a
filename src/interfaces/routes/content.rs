use actix_web::web;

use crate::handlers::{friends, projects, slides};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .service(
                web::resource("")
                    .route(web::get().to(projects::list_projects))
                    .route(web::post().to(projects::create_project))
            )
            .service(
                web::resource("/{project_id}")
                    .route(web::get().to(projects::get_project))
                    .route(web::put().to(projects::update_project))
                    .route(web::delete().to(projects::delete_project))
            )
    );

    cfg.service(
        web::scope("/slides")
            .service(
                web::resource("")
                    .route(web::get().to(slides::list_slides))
                    .route(web::post().to(slides::create_slide))
            )
            .service(
                web::resource("/{slide_id}")
                    .route(web::get().to(slides::get_slide))
                    .route(web::put().to(slides::update_slide))
                    .route(web::delete().to(slides::delete_slide))
            )
    );

    cfg.service(
        web::scope("/friends")
            .service(
                web::resource("")
                    .route(web::get().to(friends::list_friends))
                    .route(web::post().to(friends::create_friend))
            )
            .service(
                web::resource("/{friend_id}")
                    .route(web::get().to(friends::get_friend))
                    .route(web::put().to(friends::update_friend))
                    .route(web::delete().to(friends::delete_friend))
            )
    );
}
