//! HTTP route handlers.

pub mod assignments;
pub mod campaigns;
pub mod donations;
pub mod health;
pub mod shifts;
pub mod users;
pub mod webhooks;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Cursor pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Decodes the cursor and clamps the page size.
    pub fn resolve(&self) -> Result<(Option<(DateTime<Utc>, i64)>, i64), ApiError> {
        let cursor = self
            .cursor
            .as_deref()
            .map(shared::pagination::decode_cursor)
            .transpose()?;
        Ok((cursor, shared::pagination::clamp_page_size(self.limit)))
    }
}

/// A page of results with an opaque continuation cursor.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Builds a page, emitting a cursor only when the page is full.
    pub fn new(items: Vec<T>, limit: i64, cursor_of: impl Fn(&T) -> (DateTime<Utc>, i64)) -> Self {
        let next_cursor = if items.len() as i64 == limit {
            items
                .last()
                .map(|item| {
                    let (created_at, id) = cursor_of(item);
                    shared::pagination::encode_cursor(created_at, id)
                })
        } else {
            None
        };
        Self { items, next_cursor }
    }
}
