use actix_web::{web, Responder};
use tracing::instrument;

use crate::{
    entities::friend::{NewFriendRequest, UpdateFriendRequest},
    errors::AppError,
    handlers::envelope::{created, deleted, success},
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn list_friends(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(success(state.friend_handler.list().await?))
}

#[instrument(skip(state))]
pub async fn get_friend(
    friend_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    Ok(success(state.friend_handler.get(friend_id.into_inner()).await?))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_friend(
    _claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewFriendRequest>,
) -> Result<impl Responder, AppError> {
    let friend = state.friend_handler.create(&data).await?;
    tracing::info!(friend_id = friend.id, "Friend created");
    Ok(created(friend))
}

/// A `socialLinks` array replaces every existing link; omitting it keeps them.
#[instrument(skip(_claims, state, data))]
pub async fn update_friend(
    _claims: AuthClaims,
    friend_id: web::Path<i32>,
    state: web::Data<AppState>,
    data: web::Json<UpdateFriendRequest>,
) -> Result<impl Responder, AppError> {
    let friend = state.friend_handler.update(friend_id.into_inner(), &data).await?;
    Ok(success(friend))
}

#[instrument(skip(_claims, state))]
pub async fn delete_friend(
    _claims: AuthClaims,
    friend_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.friend_handler.delete(friend_id.into_inner()).await?;
    Ok(deleted())
}
