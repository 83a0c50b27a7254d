use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AgeCategory, BowType, Gender};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "document_section", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentSection {
    Statute,
    Rules,
    Antidoping,
    Calendar,
    Ratings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "staff_department", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StaffDepartment {
    Leadership,
    Coaching,
    Committee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "media_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Video,
}

/// Published result sheet of a tournament division.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Protocol {
    pub protocol_id: Uuid,
    pub tournament_category_id: Option<Uuid>,
    pub title: String,
    pub title_kk: Option<String>,
    pub title_en: Option<String>,
    pub event_date: NaiveDate,
    pub location: String,
    pub location_kk: Option<String>,
    pub location_en: Option<String>,
    pub file_url: Option<String>,
    pub year: i32,
    pub sort_order: i32,
    pub is_published: bool,
    pub created_at: chrono::NaiveDateTime,
}

/// A protocol joined with the division and tournament it belongs to.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolEntry {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub protocol: Protocol,
    pub tournament_id: Option<Uuid>,
    pub tournament_title: Option<String>,
    pub category: Option<AgeCategory>,
    pub gender: Option<Gender>,
    pub bow_type: Option<BowType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub document_id: Uuid,
    pub title: String,
    pub title_kk: Option<String>,
    pub title_en: Option<String>,
    pub section: DocumentSection,
    pub file_url: String,
    pub file_type: Option<String>,
    pub file_size: Option<i32>,
    pub year: Option<i32>,
    pub sort_order: i32,
    pub is_published: bool,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub staff_member_id: Uuid,
    pub name: String,
    pub name_kk: Option<String>,
    pub name_en: Option<String>,
    pub role: String,
    pub role_title: String,
    pub role_title_kk: Option<String>,
    pub role_title_en: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    pub department: StaffDepartment,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub partner_id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub website_url: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

/// Home page carousel entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub slide_id: Uuid,
    pub title: String,
    pub title_kk: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub gallery_item_id: Uuid,
    pub title: String,
    pub title_kk: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    pub media_type: MediaType,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub album_name: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub sort_order: i32,
    pub is_published: bool,
    pub created_at: chrono::NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&DocumentSection::Antidoping).unwrap(),
            "\"antidoping\""
        );
        assert_eq!(
            serde_json::from_str::<StaffDepartment>("\"committee\"").unwrap(),
            StaffDepartment::Committee
        );
        assert!(serde_json::from_str::<MediaType>("\"audio\"").is_err());
    }
}
