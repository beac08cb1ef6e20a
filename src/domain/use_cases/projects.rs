use validator::Validate;

use crate::{
    entities::project::{NewProjectRequest, Project, UpdateProjectRequest},
    errors::AppError,
    repositories::project::ProjectRepository,
};

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

fn not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ProjectHandler { project_repo }
    }

    /// Ordered by `order`, ties in insertion order.
    pub async fn list(&self) -> Result<Vec<Project>, AppError> {
        self.project_repo.list_projects().await
    }

    pub async fn get(&self, id: i32) -> Result<Project, AppError> {
        self.project_repo.find_project(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, request: &NewProjectRequest) -> Result<Project, AppError> {
        request.validate()?;
        self.project_repo.insert_project(request).await
    }

    pub async fn update(&self, id: i32, patch: &UpdateProjectRequest) -> Result<Project, AppError> {
        patch.validate()?;
        self.project_repo
            .update_project(id, patch)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        match self.project_repo.delete_project(id).await? {
            true => Ok(()),
            false => Err(not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::project::MockProjectRepository;

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_project().returning(|_| Ok(None));
        repo.expect_delete_project().returning(|_| Ok(false));
        repo.expect_update_project().returning(|_, _| Ok(None));
        let handler = ProjectHandler::new(repo);

        assert!(matches!(handler.get(1).await, Err(AppError::NotFound(_))));
        assert!(matches!(handler.delete(1).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            handler.update(1, &UpdateProjectRequest::default()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_rejects_non_http_links() {
        let mut repo = MockProjectRepository::new();
        repo.expect_insert_project().never();

        let request: NewProjectRequest = serde_json::from_value(serde_json::json!({
            "name": "blog",
            "description": "a blog",
            "tags": ["rust"],
            "githubUrl": "ftp://example.com/repo"
        }))
        .unwrap();

        let err = ProjectHandler::new(repo).create(&request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn null_name_in_patch_is_rejected() {
        let mut repo = MockProjectRepository::new();
        repo.expect_update_project().never();

        let patch: UpdateProjectRequest = serde_json::from_str(r#"{"name": null}"#).unwrap();
        let err = ProjectHandler::new(repo).update(1, &patch).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
