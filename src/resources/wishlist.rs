use serde_json::json;
use tracing::info;

use crate::api::Api;
use crate::error::Result;
use crate::models::{Property, WishlistEntry};

#[derive(Clone)]
pub struct WishlistApi {
    api: Api,
}

impl WishlistApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<WishlistEntry>> {
        self.api.list("/tenant/wishlist", "wishlist").await
    }

    pub async fn add(&self, property_id: &str) -> Result<()> {
        self.api
            .post("/tenant/wishlist", &json!({ "propertyId": property_id }))
            .await
            .map_err(|err| err.or_fallback("Failed to add to wishlist"))?;
        info!(%property_id, "added to wishlist");
        Ok(())
    }

    /// Removal is keyed by the property id, not the wishlist entry id.
    pub async fn remove(&self, property_id: &str) -> Result<()> {
        self.api
            .delete(format!("/tenant/wishlist/{property_id}"))
            .await
            .map_err(|err| err.or_fallback("Failed to remove from wishlist"))?;
        info!(%property_id, "removed from wishlist");
        Ok(())
    }

    /// Flips the listing's wishlist flag and returns the new state.
    pub async fn toggle(&self, property: &Property) -> Result<bool> {
        if property.is_wishlisted {
            self.remove(&property.id).await?;
            Ok(false)
        } else {
            self.add(&property.id).await?;
            Ok(true)
        }
    }
}
