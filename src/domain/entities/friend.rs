use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{option_fields::OptionField, project::validate_required_text};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FriendRow {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub description: String,
    pub pinned: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: i32,
    #[serde(skip)]
    pub friend_id: i32,
    pub name: String,
    pub link: String,
    pub icon_light: String,
    pub icon_dark: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub description: String,
    pub pinned: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub social_links: Vec<SocialLink>,
}

impl Friend {
    /// Pairs each friend with its links, preserving friend order and link id order.
    pub fn assemble(rows: Vec<FriendRow>, links: Vec<SocialLink>) -> Vec<Friend> {
        let mut links_by_friend: HashMap<i32, Vec<SocialLink>> = HashMap::new();
        for link in links {
            links_by_friend.entry(link.friend_id).or_default().push(link);
        }

        rows.into_iter()
            .map(|row| {
                let mut social_links = links_by_friend.remove(&row.id).unwrap_or_default();
                social_links.sort_by_key(|l| l.id);
                Friend {
                    id: row.id,
                    name: row.name,
                    image: row.image,
                    description: row.description,
                    pinned: row.pinned,
                    order: row.order,
                    created_at: row.created_at,
                    updated_at: row.updated_at,
                    social_links,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinkInput {
    /// Accepted for client convenience; links are always recreated.
    pub id: Option<i32>,
    #[validate(length(min = 1, max = 40))]
    pub name: String,
    #[validate(length(min = 1))]
    pub link: String,
    pub icon_light: String,
    pub icon_dark: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewFriendRequest {
    #[validate(length(min = 1, max = 80))]
    pub name: String,

    pub image: String,

    #[validate(length(max = 500))]
    pub description: String,

    pub pinned: Option<bool>,

    pub order: Option<i32>,

    #[validate(nested)]
    #[serde(default)]
    pub social_links: Vec<SocialLinkInput>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateFriendRequest {
    #[validate(custom(function = "validate_required_text"))]
    pub name: OptionField<String>,

    #[validate(custom(function = "validate_required_text"))]
    pub image: OptionField<String>,

    #[validate(custom(function = "validate_required_text"))]
    pub description: OptionField<String>,

    pub pinned: OptionField<bool>,

    pub order: OptionField<i32>,

    /// When present, replaces the friend's links wholesale.
    #[validate(nested)]
    pub social_links: Option<Vec<SocialLinkInput>>,
}
