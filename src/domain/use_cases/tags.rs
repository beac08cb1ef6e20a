use validator::Validate;

use crate::{
    entities::tag::{BatchDeleteResult, FailedDeletion, Tag, TagRequest, TagWithArticles, TagWithCount},
    errors::AppError,
    repositories::tag::TagRepository,
};

pub struct TagHandler<R>
where
    R: TagRepository,
{
    pub tag_repo: R,
}

fn not_found() -> AppError {
    AppError::NotFound("Tag not found".into())
}

fn duplicate(name: &str) -> AppError {
    AppError::Conflict(format!("Tag with name \"{name}\" already exists"))
}

impl<R> TagHandler<R>
where
    R: TagRepository,
{
    pub fn new(tag_repo: R) -> Self {
        TagHandler { tag_repo }
    }

    pub async fn list(&self) -> Result<Vec<Tag>, AppError> {
        self.tag_repo.list_tags().await
    }

    /// All tags by name with their article count, drafts included.
    pub async fn list_with_counts(&self) -> Result<Vec<TagWithCount>, AppError> {
        self.tag_repo.list_tags_with_count().await
    }

    /// Tags that have at least one published article, each with those articles.
    pub async fn list_with_articles(&self) -> Result<Vec<TagWithArticles>, AppError> {
        let rows = self.tag_repo.published_tag_rows().await?;
        Ok(TagWithArticles::group(rows))
    }

    pub async fn get(&self, id: i32) -> Result<TagWithCount, AppError> {
        self.tag_repo.find_tag_with_count(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, request: &TagRequest) -> Result<Tag, AppError> {
        let request = request.trimmed();
        request.validate()?;

        if self.tag_repo.find_tag_by_name(&request.name).await?.is_some() {
            return Err(duplicate(&request.name));
        }

        self.tag_repo.insert_tag(&request.name).await
    }

    pub async fn rename(&self, id: i32, request: &TagRequest) -> Result<Tag, AppError> {
        let request = request.trimmed();
        request.validate()?;

        let current = self.get(id).await?;
        if current.name != request.name {
            if let Some(existing) = self.tag_repo.find_tag_by_name(&request.name).await? {
                if existing.id != id {
                    return Err(duplicate(&request.name));
                }
            }
        }

        self.tag_repo.rename_tag(id, &request.name).await
    }

    /// Refuses to delete a tag that any article, draft or not, still references.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let tag = self.get(id).await?;
        if tag.article_count > 0 {
            return Err(AppError::Conflict(format!(
                "Tag \"{}\" is used by {} article(s) and cannot be deleted",
                tag.name, tag.article_count
            )));
        }

        match self.tag_repo.delete_tag(id).await? {
            true => Ok(()),
            false => Err(not_found()),
        }
    }

    /// Deletes each id independently; one failure never stops the rest.
    pub async fn delete_batch(&self, ids: &[i32]) -> BatchDeleteResult {
        let mut result = BatchDeleteResult::default();

        for &id in ids {
            match self.delete(id).await {
                Ok(()) => result.deleted.push(id),
                Err(e) => {
                    tracing::warn!(tag_id = id, error = %e, "Tag deletion skipped");
                    result.failed.push(FailedDeletion { id, reason: e.to_string() });
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entities::tag::TagArticleRow, repositories::tag::MockTagRepository};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::*;

    fn tag(id: i32, name: &str) -> Tag {
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        Tag { id, name: name.into(), created_at: at, updated_at: at }
    }

    fn counted(id: i32, name: &str, article_count: i64) -> TagWithCount {
        let at = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        TagWithCount { id, name: name.into(), created_at: at, updated_at: at, article_count }
    }

    #[tokio::test]
    async fn create_rejects_existing_name() {
        let mut repo = MockTagRepository::new();
        repo.expect_find_tag_by_name()
            .with(eq("rust"))
            .returning(|_| Ok(Some(tag(1, "rust"))));
        repo.expect_insert_tag().never();

        let err = TagHandler::new(repo)
            .create(&TagRequest { name: " rust ".into() })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "Tag with name \"rust\" already exists");
    }

    #[tokio::test]
    async fn create_persists_trimmed_name() {
        let mut repo = MockTagRepository::new();
        repo.expect_find_tag_by_name().returning(|_| Ok(None));
        repo.expect_insert_tag()
            .with(eq("async"))
            .returning(|name| Ok(tag(3, name)));

        let created = TagHandler::new(repo)
            .create(&TagRequest { name: "  async\t".into() })
            .await
            .unwrap();

        assert_eq!(created.name, "async");
    }

    #[tokio::test]
    async fn blank_name_is_a_validation_error() {
        let repo = MockTagRepository::new();
        let err = TagHandler::new(repo)
            .create(&TagRequest { name: "   ".into() })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn rename_checks_existence_then_collisions() {
        let mut repo = MockTagRepository::new();
        repo.expect_find_tag_with_count().with(eq(9)).returning(|_| Ok(None));
        let err = TagHandler::new(repo)
            .rename(9, &TagRequest { name: "web".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let mut repo = MockTagRepository::new();
        repo.expect_find_tag_with_count().returning(|id| Ok(Some(counted(id, "web", 0))));
        repo.expect_find_tag_by_name().returning(|_| Ok(Some(tag(2, "rust"))));
        repo.expect_rename_tag().never();
        let err = TagHandler::new(repo)
            .rename(1, &TagRequest { name: "rust".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn rename_to_same_name_skips_collision_check() {
        let mut repo = MockTagRepository::new();
        repo.expect_find_tag_with_count().returning(|id| Ok(Some(counted(id, "web", 4))));
        repo.expect_find_tag_by_name().never();
        repo.expect_rename_tag().returning(|id, name| Ok(tag(id, name)));

        let renamed = TagHandler::new(repo)
            .rename(1, &TagRequest { name: "web ".into() })
            .await
            .unwrap();
        assert_eq!(renamed.name, "web");
    }

    #[tokio::test]
    async fn delete_refuses_tag_in_use() {
        let mut repo = MockTagRepository::new();
        repo.expect_find_tag_with_count().returning(|id| Ok(Some(counted(id, "rust", 3))));
        repo.expect_delete_tag().never();

        let err = TagHandler::new(repo).delete(1).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn delete_unused_tag_succeeds() {
        let mut repo = MockTagRepository::new();
        repo.expect_find_tag_with_count().returning(|id| Ok(Some(counted(id, "old", 0))));
        repo.expect_delete_tag().with(eq(4)).times(1).returning(|_| Ok(true));

        TagHandler::new(repo).delete(4).await.unwrap();
    }

    #[tokio::test]
    async fn batch_delete_reports_partial_success() {
        let mut repo = MockTagRepository::new();
        repo.expect_find_tag_with_count().returning(|id| {
            let count = if id == 2 { 1 } else { 0 };
            Ok(Some(counted(id, &format!("tag-{id}"), count)))
        });
        repo.expect_delete_tag().returning(|_| Ok(true));

        let result = TagHandler::new(repo).delete_batch(&[1, 2, 3]).await;

        assert_eq!(result.deleted, vec![1, 3]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].id, 2);
        assert!(result.failed[0].reason.contains("cannot be deleted"));
    }

    #[tokio::test]
    async fn public_view_hides_drafts_while_counts_include_them() {
        let at = |day| Utc.with_ymd_and_hms(2025, 6, day, 0, 0, 0).unwrap();
        let mut repo = MockTagRepository::new();
        repo.expect_list_tags_with_count()
            .returning(|| Ok(vec![counted(1, "rust", 3)]));
        repo.expect_published_tag_rows().returning(move || {
            Ok(vec![
                TagArticleRow {
                    tag_id: 1,
                    tag_name: "rust".into(),
                    article_id: 10,
                    title: "Ownership".into(),
                    slug: "ownership".into(),
                    updated_at: at(2),
                },
                TagArticleRow {
                    tag_id: 1,
                    tag_name: "rust".into(),
                    article_id: 11,
                    title: "Lifetimes".into(),
                    slug: "lifetimes".into(),
                    updated_at: at(5),
                },
            ])
        });
        let handler = TagHandler::new(repo);

        let counts = handler.list_with_counts().await.unwrap();
        assert_eq!(counts[0].article_count, 3);

        let public = handler.list_with_articles().await.unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].articles.len(), 2);
        assert_eq!(public[0].latest_update(), Some(at(5)));
    }
}
