use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::PaginationParams;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 255))]
    pub title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub title_en: Option<String>,
    pub excerpt: Option<String>,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub title_kk: Option<String>,
    pub title_en: Option<String>,
    pub excerpt: Option<String>,
    #[validate(length(min = 1))]
    pub content: Option<String>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    pub is_published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct NewsFilter {
    /// Staff only: include unpublished drafts.
    #[serde(default)]
    pub include_drafts: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl NewsFilter {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}
