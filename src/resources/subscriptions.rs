use serde_json::json;
use tracing::info;

use crate::api::{envelope, Api};
use crate::error::Result;
use crate::models::{Plan, Subscription};

#[derive(Clone)]
pub struct SubscriptionsApi {
    api: Api,
}

impl SubscriptionsApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    pub async fn tenant_plans(&self) -> Result<Vec<Plan>> {
        self.api.list("/tenant/subscriptions/plans", "plans").await
    }

    /// `None` when the tenant has never subscribed.
    pub async fn tenant_current(&self) -> Result<Option<Subscription>> {
        self.api
            .maybe_item("/tenant/subscriptions/me", "subscription")
            .await
    }

    pub async fn purchase(&self, plan_id: &str) -> Result<Option<Subscription>> {
        let body = self
            .api
            .post("/tenant/subscriptions/purchase", &json!({ "planId": plan_id }))
            .await
            .map_err(|err| err.or_fallback("Subscription purchase failed"))?;
        info!(%plan_id, "subscription purchased");
        envelope::item_from(body, "subscription")
    }

    pub async fn cancel(&self) -> Result<()> {
        self.api
            .put_empty("/tenant/subscriptions/cancel")
            .await
            .map_err(|err| err.or_fallback("Failed to cancel subscription"))?;
        info!("subscription cancelled");
        Ok(())
    }

    pub async fn plans(&self) -> Result<Vec<Plan>> {
        self.api.list("/subscriptions/plans", "plans").await
    }

    pub async fn owner_subscribe(&self, plan_id: &str) -> Result<Option<Subscription>> {
        let body = self
            .api
            .post("/subscriptions", &json!({ "planId": plan_id }))
            .await
            .map_err(|err| err.or_fallback("Subscription failed"))?;
        info!(%plan_id, "owner subscribed");
        envelope::item_from(body, "subscription")
    }

    pub async fn owner_active(&self) -> Result<Option<Subscription>> {
        self.api
            .maybe_item("/subscriptions/active", "subscription")
            .await
    }

    pub async fn owner_history(&self) -> Result<Vec<Subscription>> {
        self.api
            .list("/subscriptions/history", "subscriptions")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, MockTransport};
    use crate::models::SubscriptionStatus;
    use std::sync::Arc;

    #[tokio::test]
    async fn no_subscription_is_not_an_error() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .returning(|_| Ok(ApiResponse::ok(json!({ "subscription": null }))));
        let current = SubscriptionsApi::new(Api::new(Arc::new(mock)))
            .tenant_current()
            .await
            .unwrap();
        assert!(current.is_none());
    }

    #[tokio::test]
    async fn purchase_returns_the_new_subscription() {
        let mut mock = MockTransport::new();
        mock.expect_execute()
            .withf(|req| req.json_body().unwrap()["planId"] == "gold")
            .returning(|_| {
                Ok(ApiResponse::ok(json!({
                    "subscription": { "_id": "s1", "planId": "gold", "status": "active" }
                })))
            });
        let subscription = SubscriptionsApi::new(Api::new(Arc::new(mock)))
            .purchase("gold")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(subscription.status, SubscriptionStatus::Active);
    }
}
