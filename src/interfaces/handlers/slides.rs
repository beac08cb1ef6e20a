use actix_web::{web, Responder};
use tracing::instrument;

use crate::{
    entities::slide::{NewSlideRequest, UpdateSlideRequest},
    errors::AppError,
    handlers::envelope::{created, deleted, success},
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_slides(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(success(state.slide_handler.list().await?))
}

#[instrument(skip(state))]
pub async fn get_slide(
    slide_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    Ok(success(state.slide_handler.get(slide_id.into_inner()).await?))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_slide(
    _claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewSlideRequest>,
) -> Result<impl Responder, AppError> {
    let slide = state.slide_handler.create(&data).await?;
    tracing::info!(slide_id = slide.id, "Slide created");
    Ok(created(slide))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_slide(
    _claims: AuthClaims,
    slide_id: web::Path<i32>,
    state: web::Data<AppState>,
    data: web::Json<UpdateSlideRequest>,
) -> Result<impl Responder, AppError> {
    let slide = state.slide_handler.update(slide_id.into_inner(), &data).await?;
    Ok(success(slide))
}

#[instrument(skip(_claims, state))]
pub async fn delete_slide(
    _claims: AuthClaims,
    slide_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.slide_handler.delete(slide_id.into_inner()).await?;
    Ok(deleted())
}
