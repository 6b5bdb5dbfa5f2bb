//! Shopify Admin API client.
//!
//! # Security
//!
//! The Admin API access token can read products, inventory levels and
//! orders for the whole store. It is held in a `SecretString` and never logged.
//!
//! # Architecture
//!
//! - Request/response envelopes from `graphql_client`, sent with `reqwest`
//! - Direct API calls to Shopify (no local product sync); results are cached
//!   per shop by the inventory service
//! - Cursor pagination handled inside the client
//!
//! # Example
//!
//! ```rust,ignore
//! use stocksense_admin::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify);
//!
//! let variants = client.fetch_variants().await?;
//! let sold = client.fetch_sales_since(since).await?;
//! ```

mod admin;
pub mod types;

pub use admin::AdminClient;
pub use admin::{orders_search_query, queries};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<String>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone, Copy)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i32,
    /// Column number (1-indexed).
    pub column: i32,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(error: graphql_client::Error) -> Self {
        Self {
            message: error.message,
            locations: error
                .locations
                .unwrap_or_default()
                .into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: l.line,
                    column: l.column,
                })
                .collect(),
            path: error
                .path
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field 'sku' doesn't exist".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Throttled".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field 'sku' doesn't exist; Throttled"
        );
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(2);
        assert_eq!(err.to_string(), "Rate limited, retry after 2 seconds");
    }

    #[test]
    fn test_unauthorized_error() {
        let err = ShopifyError::Unauthorized("Invalid token".to_string());
        assert_eq!(err.to_string(), "Unauthorized: Invalid token");
    }

    #[test]
    fn test_converts_graphql_client_error() {
        let raw: graphql_client::Error = serde_json::from_value(serde_json::json!({
            "message": "Access denied for orders field.",
            "locations": [{ "line": 2, "column": 3 }],
            "path": ["orders", 0]
        }))
        .unwrap();

        let converted = GraphQLError::from(raw);
        assert_eq!(converted.message, "Access denied for orders field.");
        assert_eq!(converted.locations.len(), 1);
        assert_eq!(converted.locations.first().map(|l| l.line), Some(2));
        assert_eq!(converted.path, vec!["orders".to_string(), "0".to_string()]);
    }
}
