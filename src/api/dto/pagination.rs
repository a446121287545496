//! Pagination query parameters.

use serde::Deserialize;
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};

use crate::error::AppError;

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl PaginationParams {
    /// Validates the parameters and applies defaults.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `per_page`: 10
    ///
    /// # Returns
    ///
    /// `(page, per_page)`, both at least 1.
    pub fn resolve(&self) -> Result<(u32, u32), AppError> {
        let page = self.page.unwrap_or(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);

        if page == 0 {
            return Err(AppError::bad_request(
                "page must be greater than 0",
                json!({ "page": page }),
            ));
        }

        if !(1..=MAX_PER_PAGE).contains(&per_page) {
            return Err(AppError::bad_request(
                format!("per_page must be between 1 and {MAX_PER_PAGE}"),
                json!({ "per_page": per_page }),
            ));
        }

        Ok((page, per_page))
    }
}
