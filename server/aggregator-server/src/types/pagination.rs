//! Paging and sorting query parameters shared by the list endpoints

use crate::error::ApiResponse;
use database_layer::{ListParams, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Page size used by `/clients` and `/labs` when the caller sends none
pub const DIRECTORY_PAGE_SIZE: u32 = 500;

/// `?page=&pageSize=&sortBy=&sortOrder=`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl PaginationParams {
    /// Page number, defaulting to 1
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size; absent or zero falls back to `default_size`
    pub fn page_size(&self, default_size: u32) -> u32 {
        match self.page_size {
            Some(size) if size > 0 => size.min(MAX_PAGE_SIZE),
            _ => default_size,
        }
    }

    pub fn to_list_params(&self, default_size: u32) -> ListParams {
        ListParams {
            page: self.page(),
            page_size: self.page_size(default_size),
            sort_by: self
                .sort_by
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            sort_order: self
                .sort_order
                .as_deref()
                .map(|order| SortOrder::parse(order.trim()))
                .unwrap_or_default(),
        }
    }

    pub fn to_default_list_params(&self) -> ListParams {
        self.to_list_params(DEFAULT_PAGE_SIZE)
    }
}

/// Paging block echoed next to list data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub count: usize,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

impl PageInfo {
    pub fn new(count: usize, params: &ListParams, total: i64) -> Self {
        Self {
            count,
            page: params.page,
            page_size: params.page_size,
            total,
        }
    }
}

impl<T> ApiResponse<T> {
    /// Add `count`, `page`, `pageSize` and `total` next to `data`
    pub fn with_page(self, page: PageInfo) -> Self {
        self.extra("count", page.count)
            .extra("page", page.page)
            .extra("pageSize", page.page_size)
            .extra("total", page.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> PaginationParams {
        let uri: axum::http::Uri = format!("/x?{}", query).parse().unwrap();
        axum::extract::Query::<PaginationParams>::try_from_uri(&uri)
            .unwrap()
            .0
    }

    #[test]
    fn test_defaults() {
        let params = parse("").to_default_list_params();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(params.sort_by, "");
        assert_eq!(params.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_directory_default_page_size() {
        assert_eq!(parse("").to_list_params(DIRECTORY_PAGE_SIZE).page_size, 500);
        assert_eq!(parse("pageSize=0").to_list_params(DIRECTORY_PAGE_SIZE).page_size, 500);
        assert_eq!(parse("pageSize=25").to_list_params(DIRECTORY_PAGE_SIZE).page_size, 25);
    }

    #[test]
    fn test_explicit_values() {
        let params = parse("page=3&pageSize=50&sortBy=createdOn&sortOrder=DESC").to_default_list_params();
        assert_eq!(params.page, 3);
        assert_eq!(params.page_size, 50);
        assert_eq!(params.sort_by, "createdOn");
        assert_eq!(params.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_page_zero_and_oversized() {
        let params = parse("page=0&pageSize=100000").to_default_list_params();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_info_shape() {
        let params = parse("page=2&pageSize=10").to_default_list_params();
        let json = serde_json::to_value(PageInfo::new(3, &params, 13)).unwrap();
        assert_eq!(json, serde_json::json!({"count": 3, "page": 2, "pageSize": 10, "total": 13}));
    }

    #[test]
    fn test_page_fields_flattened_into_envelope() {
        let params = parse("page=2&pageSize=10").to_default_list_params();
        let response = ApiResponse::ok(vec![1, 2, 3]).with_page(PageInfo::new(3, &params, 13));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["total"], 13);
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }
}
