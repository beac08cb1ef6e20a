use validator::Validate;

use crate::{
    entities::slide::{NewSlideRequest, Slide, UpdateSlideRequest},
    errors::AppError,
    repositories::slide::SlideRepository,
};

pub struct SlideHandler<R>
where
    R: SlideRepository,
{
    pub slide_repo: R,
}

fn not_found() -> AppError {
    AppError::NotFound("Slide not found".into())
}

impl<R> SlideHandler<R>
where
    R: SlideRepository,
{
    pub fn new(slide_repo: R) -> Self {
        SlideHandler { slide_repo }
    }

    pub async fn list(&self) -> Result<Vec<Slide>, AppError> {
        self.slide_repo.list_slides().await
    }

    pub async fn get(&self, id: i32) -> Result<Slide, AppError> {
        self.slide_repo.find_slide(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, request: &NewSlideRequest) -> Result<Slide, AppError> {
        request.validate()?;
        self.slide_repo.insert_slide(request).await
    }

    pub async fn update(&self, id: i32, patch: &UpdateSlideRequest) -> Result<Slide, AppError> {
        patch.validate()?;
        self.slide_repo.update_slide(id, patch).await?.ok_or_else(not_found)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        match self.slide_repo.delete_slide(id).await? {
            true => Ok(()),
            false => Err(not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::slide::MockSlideRepository;

    #[tokio::test]
    async fn blank_src_never_reaches_storage() {
        let mut repo = MockSlideRepository::new();
        repo.expect_insert_slide().never();

        let request: NewSlideRequest =
            serde_json::from_str(r#"{"title": "Hero", "src": ""}"#).unwrap();
        let err = SlideHandler::new(repo).create(&request).await.unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn delete_reports_missing_slide() {
        let mut repo = MockSlideRepository::new();
        repo.expect_delete_slide().with(mockall::predicate::eq(3)).returning(|_| Ok(false));

        let err = SlideHandler::new(repo).delete(3).await.unwrap_err();
        assert_eq!(err.to_string(), "Slide not found");
    }
}
