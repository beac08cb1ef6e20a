use actix_web::{web, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::tag::{BatchDeleteRequest, TagRequest},
    errors::AppError,
    handlers::envelope::{created, deleted, success},
    use_cases::extractors::AuthClaims,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct TagListQuery {
    pub public: Option<String>,
}

/// Public view with nested published articles, or the counted admin view.
#[instrument(skip(claims, state))]
pub async fn list_tags(
    claims: Option<AuthClaims>,
    state: web::Data<AppState>,
    query: web::Query<TagListQuery>,
) -> Result<impl Responder, AppError> {
    let tag_handler = &state.tag_handler;

    if query.public.as_deref() == Some("true") {
        return Ok(success(tag_handler.list_with_articles().await?));
    }

    claims.ok_or(AppError::UnauthorizedAccess)?;
    Ok(success(tag_handler.list_with_counts().await?))
}

#[instrument(skip(state))]
pub async fn list_tag_names(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(success(state.tag_handler.list().await?))
}

#[instrument(skip(state))]
pub async fn get_tag(
    tag_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    Ok(success(state.tag_handler.get(tag_id.into_inner()).await?))
}

#[instrument(skip(_claims, state))]
pub async fn create_tag(
    _claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<TagRequest>,
) -> Result<impl Responder, AppError> {
    let tag = state.tag_handler.create(&data).await?;
    Ok(created(tag))
}

#[instrument(skip(_claims, state))]
pub async fn update_tag(
    _claims: AuthClaims,
    tag_id: web::Path<i32>,
    state: web::Data<AppState>,
    data: web::Json<TagRequest>,
) -> Result<impl Responder, AppError> {
    let tag = state.tag_handler.rename(tag_id.into_inner(), &data).await?;
    Ok(success(tag))
}

#[instrument(skip(_claims, state))]
pub async fn delete_tag(
    _claims: AuthClaims,
    tag_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.tag_handler.delete(tag_id.into_inner()).await?;
    Ok(deleted())
}

/// Best effort: the response lists what was deleted and why the rest was not.
#[instrument(skip(_claims, state))]
pub async fn batch_delete_tags(
    _claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<BatchDeleteRequest>,
) -> Result<impl Responder, AppError> {
    let result = state.tag_handler.delete_batch(&data.ids).await;
    Ok(success(result))
}
