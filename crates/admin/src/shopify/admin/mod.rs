//! Shopify Admin API GraphQL client.
//!
//! Authenticates with a custom-app Admin API access token sent in the
//! `X-Shopify-Access-Token` header.

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;

use crate::config::ShopifyAdminConfig;

use super::{GraphQLError, ShopifyError};

mod inventory;
mod orders;
pub mod queries;

pub use orders::orders_search_query;

/// Upper bound on pages followed for a single connection.
///
/// 200 pages of 250 variants is 50k SKUs; a shop larger than that would
/// need bulk operations instead of paginated queries.
pub(crate) const MAX_PAGES: usize = 200;

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    store: String,
    api_version: String,
    access_token: SecretString,
}

impl AdminClient {
    /// Create a new Admin API client.
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(AdminClientInner {
                client,
                store: config.store.clone(),
                api_version: config.api_version.clone(),
                access_token: config.access_token.clone(),
            }),
        }
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    /// GraphQL endpoint for the configured store and API version.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.inner.store, self.inner.api_version
        )
    }

    /// Execute a GraphQL query and decode its `data` payload.
    ///
    /// # Errors
    ///
    /// - `RateLimited` on HTTP 429, carrying the `Retry-After` seconds
    /// - `Unauthorized` on HTTP 401
    /// - `GraphQL` when the response carries errors or no data
    /// - `Http` for transport failures and undecodable bodies
    #[instrument(skip(self, body), fields(operation = body.operation_name))]
    pub(crate) async fn execute<V, T>(&self, body: &QueryBody<V>) -> Result<T, ShopifyError>
    where
        V: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(self.endpoint())
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<f64>().ok())
                .map_or(60, retry_after_secs);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ShopifyError::Unauthorized(
                "Invalid or revoked access token".to_string(),
            ));
        }

        let response = response.error_for_status()?;
        let graphql_response: Response<T> = response.json().await?;
        into_data(graphql_response)
    }
}

/// Split a GraphQL envelope into data or errors.
fn into_data<T>(response: Response<T>) -> Result<T, ShopifyError> {
    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        let converted: Vec<GraphQLError> = errors.into_iter().map(GraphQLError::from).collect();
        return Err(ShopifyError::GraphQL(converted));
    }

    response.data.ok_or_else(|| {
        ShopifyError::GraphQL(vec![GraphQLError {
            message: "No data in response".to_string(),
            locations: vec![],
            path: vec![],
        }])
    })
}

/// Shopify sends fractional `Retry-After` values; round up to whole seconds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn retry_after_secs(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.ceil() as u64
    } else {
        1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decode(value: serde_json::Value) -> Response<serde_json::Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_data_is_returned() {
        let response = decode(serde_json::json!({ "data": { "shop": { "name": "Demo" } } }));
        let data = into_data(response).unwrap();
        assert_eq!(data["shop"]["name"], "Demo");
    }

    #[test]
    fn test_errors_take_precedence_over_data() {
        let response = decode(serde_json::json!({
            "data": { "orders": null },
            "errors": [{ "message": "Access denied for orders field." }]
        }));
        let err = into_data(response).unwrap_err();
        assert!(matches!(err, ShopifyError::GraphQL(ref e) if e.len() == 1));
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Access denied for orders field."
        );
    }

    #[test]
    fn test_missing_data_is_an_error() {
        let response = decode(serde_json::json!({ "errors": [] }));
        let err = into_data(response).unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: No data in response");
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_secs(2.0), 2);
        assert_eq!(retry_after_secs(1.5), 2);
        assert_eq!(retry_after_secs(0.0), 1);
        assert_eq!(retry_after_secs(f64::NAN), 1);
    }

    #[test]
    fn test_endpoint_uses_store_and_version() {
        let config = ShopifyAdminConfig {
            store: "demo.myshopify.com".to_string(),
            api_version: "2026-01".to_string(),
            access_token: SecretString::from("shpat_test"),
        };
        let client = AdminClient::new(&config);
        assert_eq!(
            client.endpoint(),
            "https://demo.myshopify.com/admin/api/2026-01/graphql.json"
        );
        assert_eq!(client.store(), "demo.myshopify.com");
    }
}
