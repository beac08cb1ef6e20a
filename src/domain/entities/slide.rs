use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{
    option_fields::OptionField,
    project::{validate_optional_url, validate_required_text},
};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: i32,
    pub title: String,
    pub src: String,
    pub button: Option<String>,
    pub link: Option<String>,
    pub new_tab: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSlideRequest {
    #[validate(length(min = 1, max = 120))]
    pub title: String,

    #[validate(length(min = 1, message = "Image source is required"))]
    pub src: String,

    #[validate(length(max = 40))]
    pub button: Option<String>,

    pub link: Option<String>,

    pub new_tab: Option<bool>,

    pub order: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateSlideRequest {
    #[validate(custom(function = "validate_required_text"))]
    pub title: OptionField<String>,

    #[validate(custom(function = "validate_required_text"))]
    pub src: OptionField<String>,

    pub button: OptionField<String>,

    #[validate(custom(function = "validate_optional_url"))]
    pub link: OptionField<String>,

    pub new_tab: OptionField<bool>,

    pub order: OptionField<i32>,
}

impl Slide {
    /// Empty optional strings are stored by some clients; expose them as absent.
    pub fn normalized(mut self) -> Self {
        self.button = self.button.filter(|s| !s.is_empty());
        self.link = self.link.filter(|s| !s.is_empty());
        self
    }
}
