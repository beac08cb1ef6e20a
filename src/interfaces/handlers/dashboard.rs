use actix_web::{web, Responder};
use tracing::instrument;

use crate::{errors::AppError, handlers::envelope::success, use_cases::extractors::AuthClaims, AppState};

#[instrument(skip(claims, state))]
pub async fn dashboard_stats(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    tracing::debug!(user_id = %claims.user_id(), "Computing dashboard stats");
    let stats = state.dashboard_handler.compute_stats().await?;
    Ok(success(stats))
}
