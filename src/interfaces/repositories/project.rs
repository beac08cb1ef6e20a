use async_trait::async_trait;
use sqlx::{self, PgPool, Postgres, QueryBuilder};

use crate::{
    entities::{
        option_fields::OptionField,
        project::{encode_tags, NewProjectRequest, Project, ProjectRow, UpdateProjectRequest},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

pub(super) const PROJECT_SELECT: &str = r#"
    SELECT id, name, description, tags, image_url, github_url, live_url, "order", created_at, updated_at
    FROM projects"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Sync + Send {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;
    async fn find_project(&self, id: i32) -> Result<Option<Project>, AppError>;
    async fn insert_project(&self, project: &NewProjectRequest) -> Result<Project, AppError>;
    async fn update_project(&self, id: i32, patch: &UpdateProjectRequest) -> Result<Option<Project>, AppError>;
    async fn delete_project(&self, id: i32) -> Result<bool, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }
}

pub(super) fn decode_rows(rows: Vec<ProjectRow>) -> Result<Vec<Project>, AppError> {
    rows.into_iter()
        .map(|row| Project::try_from(row).map_err(AppError::from))
        .collect()
}

fn push_nullable(builder: &mut QueryBuilder<'_, Postgres>, column: &str, value: &OptionField<String>) {
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

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"{PROJECT_SELECT} ORDER BY "order" ASC, id ASC"#
        ))
        .fetch_all(&self.pool)
        .await?;

        decode_rows(rows)
    }

    async fn find_project(&self, id: i32) -> Result<Option<Project>, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!("{PROJECT_SELECT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Project::try_from).transpose().map_err(AppError::from)
    }

    async fn insert_project(&self, project: &NewProjectRequest) -> Result<Project, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects (name, description, tags, image_url, github_url, live_url, "order")
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, tags, image_url, github_url, live_url, "order", created_at, updated_at
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(encode_tags(&project.tags)?)
        .bind(&project.image_url)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(project.order.unwrap_or(0))
        .fetch_one(&self.pool)
        .await?;

        Ok(Project::try_from(row)?)
    }

    async fn update_project(&self, id: i32, patch: &UpdateProjectRequest) -> Result<Option<Project>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE projects SET updated_at = NOW()");
        if let Some(name) = patch.name.flatten_str() {
            builder.push(", name = ").push_bind(name.to_string());
        }
        if let Some(description) = patch.description.flatten_str() {
            builder.push(", description = ").push_bind(description.to_string());
        }
        match &patch.tags {
            OptionField::SetToValue(tags) => {
                builder.push(", tags = ").push_bind(encode_tags(tags)?);
            }
            OptionField::SetToNull => {
                builder.push(", tags = '[]'");
            }
            OptionField::Unchanged => {}
        }
        push_nullable(&mut builder, "image_url", &patch.image_url);
        push_nullable(&mut builder, "github_url", &patch.github_url);
        push_nullable(&mut builder, "live_url", &patch.live_url);
        if let Some(order) = patch.order.value_ref() {
            builder.push(r#", "order" = "#).push_bind(*order);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(
            r#" RETURNING id, name, description, tags, image_url, github_url, live_url, "order", created_at, updated_at"#,
        );

        let row = builder
            .build_query_as::<ProjectRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(Project::try_from).transpose().map_err(AppError::from)
    }

    async fn delete_project(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
