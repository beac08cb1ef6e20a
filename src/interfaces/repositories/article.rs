use async_trait::async_trait;
use sqlx::{self, PgPool, Postgres, QueryBuilder, Transaction};

use crate::{
    entities::{
        article::{Article, ArticleInsert, ArticleRow, ArticleTagRow, PublishedFilter, UpdateArticleRequest},
        option_fields::OptionField,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxArticleRepo,
};

/// Article columns plus the author's display fields.
pub(super) const ARTICLE_SELECT: &str = r#"
    SELECT a.id, a.title, a.slug, a.content, a.header_image, a.is_draft, a.author_id,
           u.name AS author_name, u.email AS author_email, a.created_at, a.updated_at
    FROM articles a
    LEFT JOIN users u ON u.id = a.author_id"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Sync + Send {
    async fn list_by_author(&self, author_id: &str, search: Option<String>) -> Result<Vec<Article>, AppError>;
    async fn list_published(&self, filter: &PublishedFilter, offset: i64, limit: i64) -> Result<Vec<Article>, AppError>;
    async fn count_published(&self, filter: &PublishedFilter) -> Result<i64, AppError>;
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Article>, AppError>;
    async fn create(&self, article: &ArticleInsert, author_id: &str) -> Result<Article, AppError>;
    async fn update(&self, id: i32, author_id: &str, patch: &UpdateArticleRequest) -> Result<Option<Article>, AppError>;
    async fn delete(&self, id: i32, author_id: &str) -> Result<bool, AppError>;
}

impl SqlxArticleRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxArticleRepo { pool }
    }
}

/// Loads the tags of every row in one round trip and assembles the articles.
pub(super) async fn with_tags(pool: &PgPool, rows: Vec<ArticleRow>) -> Result<Vec<Article>, AppError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let tag_rows = sqlx::query_as::<_, ArticleTagRow>(
        r#"
        SELECT at.article_id, t.id, t.name
        FROM article_tags at
        JOIN tags t ON t.id = at.tag_id
        WHERE at.article_id = ANY($1)
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(Article::assemble(rows, tag_rows))
}

fn push_published_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PublishedFilter) {
    builder.push(" WHERE a.is_draft = FALSE");

    if let Some(search) = &filter.search {
        push_search(builder, search);
    }

    if let Some(tag) = &filter.tag {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM article_tags at JOIN tags t ON t.id = at.tag_id \
                 WHERE at.article_id = a.id AND t.name = ",
            )
            .push_bind(tag.clone())
            .push(")");
    }
}

/// Substring match on content, title or slug. Case follows the column collation.
fn push_search(builder: &mut QueryBuilder<'_, Postgres>, search: &str) {
    builder
        .push(" AND (strpos(a.content, ")
        .push_bind(search.to_string())
        .push(") > 0 OR strpos(a.title, ")
        .push_bind(search.to_string())
        .push(") > 0 OR strpos(a.slug, ")
        .push_bind(search.to_string())
        .push(") > 0)");
}

async fn replace_tags(tx: &mut Transaction<'_, Postgres>, article_id: i32, tag_ids: &[i32]) -> Result<(), AppError> {
    sqlx::query("DELETE FROM article_tags WHERE article_id = $1")
        .bind(article_id)
        .execute(&mut **tx)
        .await?;

    if tag_ids.is_empty() {
        return Ok(());
    }

    let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO article_tags (article_id, tag_id) ");
    builder.push_values(tag_ids, |mut row, tag_id| {
        row.push_bind(article_id).push_bind(*tag_id);
    });
    builder.build().execute(&mut **tx).await.map_err(map_write_error)?;

    Ok(())
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("articles_slug_key") => return AppError::Conflict("Slug already exists".into()),
            Some("article_tags_tag_id_fkey") => return AppError::invalid("tagIds", "Unknown tag id"),
            _ => {}
        }
    }
    AppError::from(e)
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepo {
    async fn list_by_author(&self, author_id: &str, search: Option<String>) -> Result<Vec<Article>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(ARTICLE_SELECT);
        builder.push(" WHERE a.author_id = ").push_bind(author_id.to_string());
        if let Some(search) = &search {
            push_search(&mut builder, search);
        }
        builder.push(" ORDER BY a.updated_at DESC, a.id DESC");

        let rows = builder.build_query_as::<ArticleRow>().fetch_all(&self.pool).await?;
        with_tags(&self.pool, rows).await
    }

    async fn list_published(&self, filter: &PublishedFilter, offset: i64, limit: i64) -> Result<Vec<Article>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(ARTICLE_SELECT);
        push_published_filter(&mut builder, filter);
        builder.push(" ORDER BY a.updated_at DESC, a.id DESC");
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(offset);

        let rows = builder.build_query_as::<ArticleRow>().fetch_all(&self.pool).await?;
        with_tags(&self.pool, rows).await
    }

    async fn count_published(&self, filter: &PublishedFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM articles a");
        push_published_filter(&mut builder, filter);

        let total = builder.build_query_scalar::<i64>().fetch_one(&self.pool).await?;
        Ok(total)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Article>, AppError> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!(
            "{ARTICLE_SELECT} WHERE a.slug = $1 AND a.is_draft = FALSE"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(with_tags(&self.pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Article>, AppError> {
        let row = sqlx::query_as::<_, ArticleRow>(&format!("{ARTICLE_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(with_tags(&self.pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(&self, article: &ArticleInsert, author_id: &str) -> Result<Article, AppError> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO articles (title, slug, content, header_image, is_draft, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.content)
        .bind(&article.header_image)
        .bind(article.is_draft)
        .bind(author_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        replace_tags(&mut tx, id, &article.tag_ids).await?;
        tx.commit().await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Article not found".into()))
    }

    async fn update(&self, id: i32, author_id: &str, patch: &UpdateArticleRequest) -> Result<Option<Article>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE articles SET updated_at = NOW()");
        if let Some(title) = patch.title.flatten_str() {
            builder.push(", title = ").push_bind(title.trim().to_string());
        }
        if let Some(slug) = patch.slug.flatten_str() {
            builder.push(", slug = ").push_bind(slug.to_string());
        }
        if let Some(content) = patch.content.flatten_str() {
            builder.push(", content = ").push_bind(content.to_string());
        }
        match &patch.header_image {
            OptionField::SetToValue(url) => {
                builder.push(", header_image = ").push_bind(url.clone());
            }
            OptionField::SetToNull => {
                builder.push(", header_image = NULL");
            }
            OptionField::Unchanged => {}
        }
        if let Some(is_draft) = patch.is_draft.value_ref() {
            builder.push(", is_draft = ").push_bind(*is_draft);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" AND author_id = ").push_bind(author_id.to_string());
        builder.push(" RETURNING id");

        let updated = builder
            .build_query_scalar::<i32>()
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_write_error)?;

        if updated.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        if let Some(tag_ids) = patch.tag_ids.value_ref() {
            let mut tag_ids = tag_ids.clone();
            tag_ids.sort_unstable();
            tag_ids.dedup();
            replace_tags(&mut tx, id, &tag_ids).await?;
        }
        tx.commit().await?;

        self.find_by_id(id).await
    }

    async fn delete(&self, id: i32, author_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
