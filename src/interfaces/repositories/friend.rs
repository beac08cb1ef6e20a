use async_trait::async_trait;
use sqlx::{self, PgPool, Postgres, QueryBuilder, Transaction};

use crate::{
    entities::friend::{Friend, FriendRow, NewFriendRequest, SocialLink, SocialLinkInput, UpdateFriendRequest},
    errors::AppError,
    repositories::sqlx_repo::SqlxFriendRepo,
};

pub(super) const FRIEND_SELECT: &str = r#"
    SELECT id, name, image, description, pinned, "order", created_at, updated_at
    FROM friends"#;

const FRIEND_RETURNING: &str =
    r#" RETURNING id, name, image, description, pinned, "order", created_at, updated_at"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FriendRepository: Sync + Send {
    async fn list_friends(&self) -> Result<Vec<Friend>, AppError>;
    async fn find_friend(&self, id: i32) -> Result<Option<Friend>, AppError>;
    async fn insert_friend(&self, friend: &NewFriendRequest) -> Result<Friend, AppError>;
    async fn update_friend(&self, id: i32, patch: &UpdateFriendRequest) -> Result<Option<Friend>, AppError>;
    async fn delete_friend(&self, id: i32) -> Result<bool, AppError>;
}

impl SqlxFriendRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxFriendRepo { pool }
    }
}

/// Attaches social links to the given friend rows with a single query.
pub(super) async fn with_links(pool: &PgPool, rows: Vec<FriendRow>) -> Result<Vec<Friend>, AppError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let links = sqlx::query_as::<_, SocialLink>(
        r#"
        SELECT id, friend_id, name, link, icon_light, icon_dark
        FROM social_links
        WHERE friend_id = ANY($1)
        ORDER BY id ASC
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    Ok(Friend::assemble(rows, links))
}

async fn insert_links(
    tx: &mut Transaction<'_, Postgres>,
    friend_id: i32,
    links: &[SocialLinkInput],
) -> Result<(), AppError> {
    if links.is_empty() {
        return Ok(());
    }

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO social_links (friend_id, name, link, icon_light, icon_dark) ",
    );
    builder.push_values(links, |mut row, link| {
        row.push_bind(friend_id)
            .push_bind(link.name.clone())
            .push_bind(link.link.clone())
            .push_bind(link.icon_light.clone())
            .push_bind(link.icon_dark.clone());
    });
    builder.build().execute(&mut **tx).await?;

    Ok(())
}

#[async_trait]
impl FriendRepository for SqlxFriendRepo {
    async fn list_friends(&self) -> Result<Vec<Friend>, AppError> {
        let rows = sqlx::query_as::<_, FriendRow>(&format!(
            r#"{FRIEND_SELECT} ORDER BY pinned DESC, "order" ASC, created_at DESC"#
        ))
        .fetch_all(&self.pool)
        .await?;

        with_links(&self.pool, rows).await
    }

    async fn find_friend(&self, id: i32) -> Result<Option<Friend>, AppError> {
        let row = sqlx::query_as::<_, FriendRow>(&format!("{FRIEND_SELECT} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(with_links(&self.pool, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn insert_friend(&self, friend: &NewFriendRequest) -> Result<Friend, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, FriendRow>(&format!(
            r#"INSERT INTO friends (name, image, description, pinned, "order")
               VALUES ($1, $2, $3, $4, $5){FRIEND_RETURNING}"#
        ))
        .bind(&friend.name)
        .bind(&friend.image)
        .bind(&friend.description)
        .bind(friend.pinned.unwrap_or(false))
        .bind(friend.order.unwrap_or(0))
        .fetch_one(&mut *tx)
        .await?;

        insert_links(&mut tx, row.id, &friend.social_links).await?;
        tx.commit().await?;

        with_links(&self.pool, vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound("Friend not found".into()))
    }

    async fn update_friend(&self, id: i32, patch: &UpdateFriendRequest) -> Result<Option<Friend>, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE friends SET updated_at = NOW()");
        if let Some(name) = patch.name.flatten_str() {
            builder.push(", name = ").push_bind(name.to_string());
        }
        if let Some(image) = patch.image.flatten_str() {
            builder.push(", image = ").push_bind(image.to_string());
        }
        if let Some(description) = patch.description.flatten_str() {
            builder.push(", description = ").push_bind(description.to_string());
        }
        if let Some(pinned) = patch.pinned.value_ref() {
            builder.push(", pinned = ").push_bind(*pinned);
        }
        if let Some(order) = patch.order.value_ref() {
            builder.push(r#", "order" = "#).push_bind(*order);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(FRIEND_RETURNING);

        let Some(row) = builder
            .build_query_as::<FriendRow>()
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(links) = &patch.social_links {
            sqlx::query("DELETE FROM social_links WHERE friend_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_links(&mut tx, id, links).await?;
        }
        tx.commit().await?;

        Ok(with_links(&self.pool, vec![row]).await?.pop())
    }

    async fn delete_friend(&self, id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM social_links WHERE friend_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM friends WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
