//! Pagination types shared by every connection query.

use serde::{Deserialize, Serialize};

/// Relay-style pagination info.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether more pages follow.
    pub has_next_page: bool,
    /// Cursor of the last node in this page.
    pub end_cursor: Option<String>,
}

/// A page of nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    /// Pagination info.
    pub page_info: PageInfo,
    /// Nodes in this page.
    pub nodes: Vec<T>,
}

impl<T> Connection<T> {
    /// Cursor to request the next page with, if there is one.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        if self.page_info.has_next_page {
            self.page_info.end_cursor.as_deref()
        } else {
            None
        }
    }
}
