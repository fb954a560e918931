use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::api::{envelope, Api};
use crate::error::{ClientError, Result};
use crate::models::Review;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub property_id: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Clone)]
pub struct ReviewsApi {
    api: Api,
}

impl ReviewsApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn add(&self, review: &NewReview) -> Result<Option<Review>> {
        if !(1..=5).contains(&review.rating) {
            return Err(ClientError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        let body = self
            .api
            .post("/tenant/reviews", review)
            .await
            .map_err(|err| err.or_fallback("Failed to submit review"))?;
        info!(property_id = %review.property_id, rating = review.rating, "review added");
        envelope::item_from(body, "review")
    }

    pub async fn mine(&self) -> Result<Vec<Review>> {
        self.api.list("/tenant/reviews/my", "reviews").await
    }

    pub async fn for_property(&self, property_id: &str) -> Result<Vec<Review>> {
        self.api
            .list(format!("/tenant/reviews/property/{property_id}"), "reviews")
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(format!("/tenant/reviews/{id}")).await?;
        info!(review_id = %id, "review deleted");
        Ok(())
    }

    pub async fn owner_reviews(&self) -> Result<Vec<Review>> {
        self.api.list("/dashboard/owner/reviews", "reviews").await
    }

    /// Rating aggregates, passed through as the backend shapes them.
    pub async fn owner_summary(&self) -> Result<Value> {
        self.api.get("/dashboard/owner/reviews/summary").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn ratings_outside_one_to_five_are_refused() {
        let reviews = ReviewsApi::new(Api::new(Arc::new(MockTransport::new())));
        for rating in [0, 6] {
            let err = reviews
                .add(&NewReview {
                    property_id: "p1".into(),
                    rating,
                    comment: None,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, ClientError::Validation(_)));
        }
    }
}
