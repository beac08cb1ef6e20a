use actix_web::web;

use crate::handlers::{feeds, home::home, system::health_check};

mod articles;
mod content;
mod dashboard;
mod feed;
mod json_error;
mod tags;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.route("/sitemap.xml", web::get().to(feeds::sitemap_xml));
    cfg.route("/robots.txt", web::get().to(feeds::robots_txt));

    cfg.service(
        web::scope("/api")
            .configure(articles::config_routes)
            .configure(tags::config_routes)
            .configure(content::config_routes)
            .configure(dashboard::config_routes)
            .configure(feed::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
