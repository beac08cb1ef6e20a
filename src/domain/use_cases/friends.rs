use validator::Validate;

use crate::{
    entities::friend::{Friend, NewFriendRequest, UpdateFriendRequest},
    errors::AppError,
    repositories::friend::FriendRepository,
};

pub struct FriendHandler<R>
where
    R: FriendRepository,
{
    pub friend_repo: R,
}

fn not_found() -> AppError {
    AppError::NotFound("Friend not found".into())
}

impl<R> FriendHandler<R>
where
    R: FriendRepository,
{
    pub fn new(friend_repo: R) -> Self {
        FriendHandler { friend_repo }
    }

    /// Pinned friends first, then by `order`, newest first among equals.
    pub async fn list(&self) -> Result<Vec<Friend>, AppError> {
        self.friend_repo.list_friends().await
    }

    pub async fn get(&self, id: i32) -> Result<Friend, AppError> {
        self.friend_repo.find_friend(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, request: &NewFriendRequest) -> Result<Friend, AppError> {
        request.validate()?;
        self.friend_repo.insert_friend(request).await
    }

    /// Supplying `socialLinks` replaces the whole list.
    pub async fn update(&self, id: i32, patch: &UpdateFriendRequest) -> Result<Friend, AppError> {
        patch.validate()?;
        self.friend_repo.update_friend(id, patch).await?.ok_or_else(not_found)
    }

    /// Removes the friend together with its social links.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        match self.friend_repo.delete_friend(id).await? {
            true => Ok(()),
            false => Err(not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::friend::MockFriendRepository;

    #[tokio::test]
    async fn nested_links_are_validated() {
        let mut repo = MockFriendRepository::new();
        repo.expect_insert_friend().never();

        let request: NewFriendRequest = serde_json::from_value(serde_json::json!({
            "name": "Alice",
            "image": "https://img/alice.png",
            "description": "",
            "socialLinks": [{ "name": "", "link": "https://x", "iconLight": "a", "iconDark": "b" }]
        }))
        .unwrap();

        let err = FriendHandler::new(repo).create(&request).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn deleting_unknown_friend_is_not_found() {
        let mut repo = MockFriendRepository::new();
        repo.expect_delete_friend().returning(|_| Ok(false));

        let err = FriendHandler::new(repo).delete(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
