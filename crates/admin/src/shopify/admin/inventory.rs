//! Product variant fetching.

use tracing::instrument;

use super::{AdminClient, MAX_PAGES, queries};
use crate::shopify::{ShopifyError, VariantNode, VariantsData};

impl AdminClient {
    /// Fetch every product variant in the store.
    ///
    /// Follows cursors until the last page (or [`MAX_PAGES`]).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self), fields(store = %self.store()))]
    pub async fn fetch_variants(&self) -> Result<Vec<VariantNode>, ShopifyError> {
        let mut variants = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 0..MAX_PAGES {
            let data: VariantsData = self.execute(&queries::product_variants(cursor)).await?;
            let connection = data.product_variants;
            cursor = connection.next_cursor().map(str::to_string);
            variants.extend(connection.nodes);

            if cursor.is_none() {
                tracing::debug!(pages = page + 1, count = variants.len(), "Fetched variants");
                return Ok(variants);
            }
        }

        tracing::warn!(
            max_pages = MAX_PAGES,
            count = variants.len(),
            "Variant pagination limit reached; results truncated"
        );
        Ok(variants)
    }
}
