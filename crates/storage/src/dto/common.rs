use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PaginationParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be >= 1".to_string());
        }
        if self.limit < 1 || self.limit > 100 {
            return Err("limit must be between 1 and 100".to_string());
        }
        Ok(())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(page: u32, limit: u32, total_items: i64) -> Self {
        let total_pages = ((total_items as f64) / (limit.max(1) as f64)).ceil() as u32;
        Self {
            page,
            limit,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total_items: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(params.page, params.limit, total_items),
        }
    }
}

/// Generic acknowledgement body for mutations that return no entity.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_pages() {
        let params = PaginationParams { page: 3, limit: 20 };
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), 20);

        let meta = PaginationMeta::new(1, 20, 41);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(PaginationMeta::new(1, 10, 0).total_pages, 0);
    }

    #[test]
    fn test_limit_bounds() {
        assert!(PaginationParams { page: 1, limit: 100 }.validate().is_ok());
        assert!(PaginationParams { page: 1, limit: 101 }.validate().is_err());
        assert!(PaginationParams { page: 0, limit: 10 }.validate().is_err());
        assert!(PaginationParams { page: 1, limit: 0 }.validate().is_err());
    }
}
