use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// `{"success": true, "data": ...}` wrapper shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn success<T: Serialize>(data: T) -> HttpResponse {
    respond(StatusCode::OK, data)
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    respond(StatusCode::CREATED, data)
}

/// Body for successful deletes: `{"success": true}`.
pub fn deleted() -> HttpResponse {
    HttpResponse::Ok().json(Envelope::<()> { success: true, data: None })
}

fn respond<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(status).json(Envelope { success: true, data: Some(data) })
}
