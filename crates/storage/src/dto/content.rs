use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::common::PaginationParams;
use crate::models::{DocumentSection, MediaType, StaffDepartment};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 255))]
    pub title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub title_en: Option<String>,
    pub section: DocumentSection,
    #[validate(length(min = 1, max = 500, message = "File URL is required"))]
    pub file_url: String,
    #[validate(length(max = 50))]
    pub file_type: Option<String>,
    #[validate(range(min = 0))]
    pub file_size: Option<i32>,
    pub year: Option<i32>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 255))]
    pub title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub title_en: Option<String>,
    pub section: Option<DocumentSection>,
    #[validate(length(min = 1, max = 500))]
    pub file_url: Option<String>,
    #[validate(length(max = 50))]
    pub file_type: Option<String>,
    #[validate(range(min = 0))]
    pub file_size: Option<i32>,
    pub year: Option<i32>,
    pub sort_order: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    pub section: Option<DocumentSection>,
    pub year: Option<i32>,
    /// Staff only: include unpublished documents.
    #[serde(default)]
    pub include_unpublished: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffMemberRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub name_kk: Option<String>,
    #[validate(length(max = 255))]
    pub name_en: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Role is required"))]
    pub role: String,
    #[validate(length(min = 1, max = 255, message = "Role title is required"))]
    pub role_title: String,
    #[validate(length(max = 255))]
    pub role_title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub role_title_en: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    pub department: StaffDepartment,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaffMemberRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub name_kk: Option<String>,
    pub name_en: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub role: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub role_title: Option<String>,
    pub role_title_kk: Option<String>,
    pub role_title_en: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    pub department: Option<StaffDepartment>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StaffFilter {
    pub department: Option<StaffDepartment>,
    /// Staff only: include inactive entries.
    #[serde(default)]
    pub include_inactive: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartnerRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub logo_url: Option<String>,
    #[validate(length(max = 500))]
    pub website_url: Option<String>,
    #[validate(length(max = 500))]
    pub instagram_url: Option<String>,
    #[validate(length(max = 500))]
    pub facebook_url: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePartnerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub logo_url: Option<String>,
    #[validate(length(max = 500))]
    pub website_url: Option<String>,
    #[validate(length(max = 500))]
    pub instagram_url: Option<String>,
    #[validate(length(max = 500))]
    pub facebook_url: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlideRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 255))]
    pub title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    #[validate(length(min = 1, max = 500, message = "Image URL is required"))]
    pub image_url: String,
    #[validate(length(max = 500))]
    pub link_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSlideRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub title_kk: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub image_url: Option<String>,
    #[validate(length(max = 500))]
    pub link_url: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGalleryItemRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 255))]
    pub title_kk: Option<String>,
    #[validate(length(max = 255))]
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    pub media_type: MediaType,
    #[validate(length(min = 1, max = 500, message = "URL is required"))]
    pub url: String,
    #[validate(length(max = 500))]
    pub thumbnail_url: Option<String>,
    #[validate(length(max = 255))]
    pub album_name: Option<String>,
    pub event_date: Option<NaiveDate>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGalleryItemRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub title_kk: Option<String>,
    pub title_en: Option<String>,
    pub description: Option<String>,
    pub description_kk: Option<String>,
    pub description_en: Option<String>,
    pub media_type: Option<MediaType>,
    #[validate(length(min = 1, max = 500))]
    pub url: Option<String>,
    #[validate(length(max = 500))]
    pub thumbnail_url: Option<String>,
    #[validate(length(max = 255))]
    pub album_name: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub sort_order: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct GalleryFilter {
    pub media_type: Option<MediaType>,
    pub album: Option<String>,
    /// Staff only: include unpublished items.
    #[serde(default)]
    pub include_unpublished: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Listing params shared by partners and slides, which only toggle on activity.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    /// Staff only: include inactive entries.
    #[serde(default)]
    pub include_inactive: bool,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

macro_rules! paginated_filter {
    ($($filter:ty),+) => {
        $(
            impl $filter {
                pub fn pagination(&self) -> PaginationParams {
                    PaginationParams {
                        page: self.page,
                        limit: self.limit,
                    }
                }
            }
        )+
    };
}

paginated_filter!(DocumentFilter, StaffFilter, GalleryFilter, ActiveFilter);

fn default_true() -> bool {
    true
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_defaults_to_published() {
        let req: CreateDocumentRequest = serde_json::from_value(serde_json::json!({
            "title": "Устав",
            "section": "statute",
            "fileUrl": "/files/statute.pdf"
        }))
        .unwrap();

        assert!(req.is_published);
        assert_eq!(req.sort_order, 0);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_gallery_item_requires_url() {
        let req: CreateGalleryItemRequest = serde_json::from_value(serde_json::json!({
            "title": "Финал",
            "mediaType": "video",
            "url": ""
        }))
        .unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_staff_department_is_a_closed_set() {
        let parsed = serde_json::from_value::<CreateStaffMemberRequest>(serde_json::json!({
            "name": "Иванов",
            "role": "president",
            "roleTitle": "Президент",
            "department": "marketing"
        }));

        assert!(parsed.is_err());
    }
}
