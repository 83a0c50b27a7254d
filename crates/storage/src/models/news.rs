use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub news_id: Uuid,
    pub slug: String,
    pub title: String,
    pub title_kk: Option<String>,
    pub title_en: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: chrono::NaiveDateTime,
}
