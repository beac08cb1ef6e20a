use validator::Validate;

use crate::{
    entities::{
        article::{Article, ArticleInsert, NewArticleRequest, PublishedFilter, UpdateArticleRequest},
        pagination::{PageParams, Paginated},
    },
    errors::AppError,
    repositories::article::ArticleRepository,
};

pub struct ArticleHandler<R>
where
    R: ArticleRepository,
{
    pub article_repo: R,
}

fn not_found() -> AppError {
    AppError::NotFound("Article not found".into())
}

/// Blank search terms behave as if none were given.
fn normalize_search(search: Option<&str>) -> Option<String> {
    search.filter(|s| !s.is_empty()).map(str::to_string)
}

impl<R> ArticleHandler<R>
where
    R: ArticleRepository,
{
    pub fn new(article_repo: R) -> Self {
        ArticleHandler { article_repo }
    }

    /// Every article owned by `author_id`, drafts included. Not paginated.
    pub async fn list_by_author(&self, author_id: &str, search: Option<&str>) -> Result<Vec<Article>, AppError> {
        self.article_repo
            .list_by_author(author_id, normalize_search(search))
            .await
    }

    /// One page of published articles, newest update first.
    pub async fn list_published(
        &self,
        search: Option<&str>,
        preview: bool,
        params: PageParams,
    ) -> Result<Paginated<Article>, AppError> {
        let filter = PublishedFilter {
            search: normalize_search(search),
            tag: None,
        };
        self.page(&filter, preview, params).await
    }

    /// Same contract as [`Self::list_published`], restricted to an exact tag name.
    pub async fn list_by_tag(&self, tag_name: &str, params: PageParams) -> Result<Paginated<Article>, AppError> {
        let filter = PublishedFilter {
            search: None,
            tag: Some(tag_name.to_string()),
        };
        self.page(&filter, true, params).await
    }

    async fn page(
        &self,
        filter: &PublishedFilter,
        preview: bool,
        params: PageParams,
    ) -> Result<Paginated<Article>, AppError> {
        let total = self.article_repo.count_published(filter).await?;
        let articles = if total == 0 {
            Vec::new()
        } else {
            self.article_repo
                .list_published(filter, params.offset(), params.limit as i64)
                .await?
        };

        let articles = if preview {
            articles.into_iter().map(Article::into_preview).collect()
        } else {
            articles
        };

        Ok(Paginated::new(articles, total, params))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Article, AppError> {
        self.article_repo
            .find_published_by_slug(slug)
            .await?
            .map(Article::with_reading_time)
            .ok_or_else(not_found)
    }

    pub async fn get(&self, id: i32) -> Result<Article, AppError> {
        self.article_repo.find_by_id(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, request: NewArticleRequest, author_id: &str) -> Result<Article, AppError> {
        let insert = ArticleInsert::try_from(request)?;
        self.article_repo.create(&insert, author_id).await
    }

    /// Applies `patch` when `author_id` owns the article. Anyone else sees Not-Found.
    pub async fn update(&self, id: i32, patch: &UpdateArticleRequest, author_id: &str) -> Result<Article, AppError> {
        patch.validate()?;

        self.article_repo
            .update(id, author_id, patch)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, id: i32, author_id: &str) -> Result<(), AppError> {
        match self.article_repo.delete(id, author_id).await? {
            true => Ok(()),
            false => Err(not_found()),
        }
    }
}
