use actix_web::{web, Responder};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    entities::{
        article::{NewArticleRequest, UpdateArticleRequest},
        pagination::{PageParams, PageQuery},
    },
    errors::AppError,
    handlers::envelope::{created, deleted, success},
    use_cases::extractors::AuthClaims,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct ArticleListQuery {
    pub public: Option<String>,
    pub q: Option<String>,
    pub preview: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ArticleListQuery {
    fn is_public(&self) -> bool {
        self.public.as_deref() == Some("true")
    }

    fn is_preview(&self) -> bool {
        self.preview.as_deref() == Some("true")
    }

    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page.clone(),
            limit: self.limit.clone(),
        }
    }
}

/// `?public=true` lists published articles page by page; otherwise the
/// caller's own articles, drafts included.
#[instrument(skip(claims, state, query))]
pub async fn list_articles(
    claims: Option<AuthClaims>,
    state: web::Data<AppState>,
    query: web::Query<ArticleListQuery>,
) -> Result<impl Responder, AppError> {
    let article_handler = &state.article_handler;

    if query.is_public() {
        let params = PageParams::try_from(&query.page_query())?;
        let page = article_handler
            .list_published(query.q.as_deref(), query.is_preview(), params)
            .await?;
        return Ok(success(page));
    }

    let claims = claims.ok_or(AppError::UnauthorizedAccess)?;
    let articles = article_handler
        .list_by_author(claims.user_id(), query.q.as_deref())
        .await?;
    Ok(success(articles))
}

#[instrument(skip(state))]
pub async fn get_article_by_slug(
    slug: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let article = state.article_handler.get_by_slug(&slug).await?;
    Ok(success(article))
}

#[instrument(skip(state, query))]
pub async fn list_articles_by_tag(
    tag_name: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<impl Responder, AppError> {
    let params = PageParams::try_from(&*query)?;
    let page = state.article_handler.list_by_tag(&tag_name, params).await?;
    Ok(success(page))
}

#[instrument(skip(_claims, state))]
pub async fn get_article(
    _claims: AuthClaims,
    article_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let article = state.article_handler.get(article_id.into_inner()).await?;
    Ok(success(article))
}

#[instrument(skip(claims, state, data))]
pub async fn create_article(
    claims: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewArticleRequest>,
) -> Result<impl Responder, AppError> {
    let article = state
        .article_handler
        .create(data.into_inner(), claims.user_id())
        .await?;

    tracing::info!(article_id = article.id, slug = %article.slug, "Article created");
    Ok(created(article))
}

#[instrument(skip(claims, state, data))]
pub async fn update_article(
    claims: AuthClaims,
    article_id: web::Path<i32>,
    state: web::Data<AppState>,
    data: web::Json<UpdateArticleRequest>,
) -> Result<impl Responder, AppError> {
    let article = state
        .article_handler
        .update(article_id.into_inner(), &data, claims.user_id())
        .await?;
    Ok(success(article))
}

#[instrument(skip(claims, state))]
pub async fn delete_article(
    claims: AuthClaims,
    article_id: web::Path<i32>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state
        .article_handler
        .delete(article_id.into_inner(), claims.user_id())
        .await?;
    Ok(deleted())
}
