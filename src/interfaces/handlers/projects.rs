use actix_web::{web, Responder};
use tracing::instrument;

use crate::{
    entities::project::{NewProjectRequest, UpdateProjectRequest},
    errors::AppError,
    handlers::envelope::{created, deleted, success},
    use_cases::extractors::AuthClaims,
    AppState,
};

/// Ordered by `order`, then id.
#[instrument(skip(state))]
pub async fn list_projects(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(success(state.project_handler.list().await?))
}

#[instrument(skip(state))]
pub async fn get_project(
    project_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    Ok(success(state.project_handler.get(project_id.into_inner()).await?))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_project(
    _claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.create(&data).await?;
    tracing::info!(project_id = project.id, "Project created");
    Ok(created(project))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_project(
    _claims: AuthClaims,
    project_id: web::Path<i32>,
    state: web::Data<AppState>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state.project_handler.update(project_id.into_inner(), &data).await?;
    Ok(success(project))
}

#[instrument(skip(_claims, state))]
pub async fn delete_project(
    _claims: AuthClaims,
    project_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.project_handler.delete(project_id.into_inner()).await?;
    Ok(deleted())
}
