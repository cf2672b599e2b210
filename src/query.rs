use serde::Deserialize;

use crate::error::AppError;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

/// `?limit=&offset=` window shared by the list endpoints.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Page {
    /// Returns `(limit, offset)`, capped at `MAX_LIMIT`.
    pub fn bounds(&self) -> Result<(i64, i64), AppError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let offset = self.offset.unwrap_or(0);

        if limit < 1 {
            return Err(AppError::BadRequest("limit must be at least 1".to_string()));
        }
        if offset < 0 {
            return Err(AppError::BadRequest("offset cannot be negative".to_string()));
        }

        Ok((limit.min(MAX_LIMIT), offset))
    }
}
