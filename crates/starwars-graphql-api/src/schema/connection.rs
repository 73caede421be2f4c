//! # Cursor Pagination
//!
//! Relay-style connection over an in-memory list. Cursors are the decimal
//! offset of an item in the full list.

use async_graphql::SimpleObject;

use super::objects::Character;
use super::scalars::PaginationAmount;
use crate::error::{ApiError, ApiResult};

/// Page size limits, shared through schema data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingOptions {
    pub default_page_size: i32,
    pub max_page_size: i32,
}

impl Default for PagingOptions {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 50,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct CharacterEdge {
    pub cursor: String,
    pub node: Character,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct CharacterConnection {
    pub edges: Vec<CharacterEdge>,
    pub page_info: PageInfo,
    pub total_count: i32,
}

fn decode_cursor(cursor: &str) -> ApiResult<usize> {
    cursor
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("invalid cursor '{cursor}'")))
}

/// Slice `items` into one page
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] for a malformed cursor or a page size
/// above the configured maximum.
pub fn paginate(
    items: Vec<Character>,
    first: Option<PaginationAmount>,
    after: Option<&str>,
    options: PagingOptions,
) -> ApiResult<CharacterConnection> {
    let limit = first.map_or(options.default_page_size, PaginationAmount::get);
    if limit > options.max_page_size {
        return Err(ApiError::InvalidInput(format!(
            "page size {limit} exceeds the maximum of {}",
            options.max_page_size
        )));
    }
    let limit = usize::try_from(limit.max(1)).unwrap_or(1);

    let start = match after {
        None => 0,
        Some(cursor) => decode_cursor(cursor)?.saturating_add(1),
    };

    let total = items.len();
    let edges: Vec<CharacterEdge> = items
        .into_iter()
        .enumerate()
        .skip(start)
        .take(limit)
        .map(|(offset, node)| CharacterEdge {
            cursor: offset.to_string(),
            node,
        })
        .collect();

    let page_info = PageInfo {
        has_next_page: start.saturating_add(limit) < total,
        has_previous_page: start > 0,
        start_cursor: edges.first().map(|e| e.cursor.clone()),
        end_cursor: edges.last().map(|e| e.cursor.clone()),
    };

    Ok(CharacterConnection {
        edges,
        page_info,
        total_count: i32::try_from(total).unwrap_or(i32::MAX),
    })
}
