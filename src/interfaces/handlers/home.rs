use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Blog content API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "feeds": ["/api/rss", "/sitemap.xml", "/robots.txt"]
    }))
}
