use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error,
};

use crate::errors::AppError;

/// Routes extractor failures through the same `{success:false}` envelope as
/// every other client error.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| json_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| query_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _req| path_error(err)));
}

fn json_error(err: JsonPayloadError) -> Error {
    tracing::debug!(error = %err, "Rejected JSON body");
    AppError::invalid("body", format!("JSON payload error: {err}")).into()
}

fn query_error(err: QueryPayloadError) -> Error {
    AppError::invalid("query", format!("Query string error: {err}")).into()
}

fn path_error(err: PathError) -> Error {
    AppError::invalid("path", format!("Path parameter error: {err}")).into()
}
