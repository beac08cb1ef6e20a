use async_trait::async_trait;
use sqlx::{self, PgPool, Postgres, QueryBuilder};

use crate::{
    entities::{
        option_fields::OptionField,
        slide::{NewSlideRequest, Slide, UpdateSlideRequest},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxSlideRepo,
};

pub(super) const SLIDE_SELECT: &str = r#"
    SELECT id, title, src, button, link, new_tab, "order", created_at, updated_at
    FROM slides"#;

const SLIDE_RETURNING: &str =
    r#" RETURNING id, title, src, button, link, new_tab, "order", created_at, updated_at"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlideRepository: Sync + Send {
    async fn list_slides(&self) -> Result<Vec<Slide>, AppError>;
    async fn find_slide(&self, id: i32) -> Result<Option<Slide>, AppError>;
    async fn insert_slide(&self, slide: &NewSlideRequest) -> Result<Slide, AppError>;
    async fn update_slide(&self, id: i32, patch: &UpdateSlideRequest) -> Result<Option<Slide>, AppError>;
    async fn delete_slide(&self, id: i32) -> Result<bool, AppError>;
}

impl SqlxSlideRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxSlideRepo { pool }
    }
}

#[async_trait]
impl SlideRepository for SqlxSlideRepo {
    async fn list_slides(&self) -> Result<Vec<Slide>, AppError> {
        let slides = sqlx::query_as::<_, Slide>(&format!(r#"{SLIDE_SELECT} ORDER BY "order" ASC, id ASC"#))
            .fetch_all(&self.pool)
            .await?;

        Ok(slides.into_iter().map(Slide::normalized).collect())
    }

    async fn find_slide(&self, id: i32) -> Result<Option<Slide>, AppError> {
        let slide = sqlx::query_as::<_, Slide>(&format!("{SLIDE_SELECT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(slide.map(Slide::normalized))
    }

    async fn insert_slide(&self, slide: &NewSlideRequest) -> Result<Slide, AppError> {
        let created = sqlx::query_as::<_, Slide>(&format!(
            r#"INSERT INTO slides (title, src, button, link, new_tab, "order")
               VALUES ($1, $2, $3, $4, $5, $6){SLIDE_RETURNING}"#
        ))
        .bind(&slide.title)
        .bind(&slide.src)
        .bind(&slide.button)
        .bind(&slide.link)
        .bind(slide.new_tab.unwrap_or(false))
        .bind(slide.order.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        Ok(created.normalized())
    }

    async fn update_slide(&self, id: i32, patch: &UpdateSlideRequest) -> Result<Option<Slide>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE slides SET updated_at = NOW()");
        if let Some(title) = patch.title.flatten_str() {
            builder.push(", title = ").push_bind(title.to_string());
        }
        if let Some(src) = patch.src.flatten_str() {
            builder.push(", src = ").push_bind(src.to_string());
        }
        for (column, value) in [("button", &patch.button), ("link", &patch.link)] {
            match value {
                OptionField::SetToValue(v) => {
                    builder.push(format!(", {column} = ")).push_bind(v.clone());
                }
                OptionField::SetToNull => {
                    builder.push(format!(", {column} = NULL"));
                }
                OptionField::Unchanged => {}
            }
        }
        if let Some(new_tab) = patch.new_tab.value_ref() {
            builder.push(", new_tab = ").push_bind(*new_tab);
        }
        if let Some(order) = patch.order.value_ref() {
            builder.push(r#", "order" = "#).push_bind(*order);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(SLIDE_RETURNING);

        let slide = builder
            .build_query_as::<Slide>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(slide.map(Slide::normalized))
    }

    async fn delete_slide(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM slides WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
