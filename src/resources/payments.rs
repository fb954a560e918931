use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::api::{envelope, Api};
use crate::error::{ClientError, Result};
use crate::models::{Payment, PaymentMethod, PaymentStatus};
use crate::workflow::payment::PaymentGateway;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInitiation {
    pub booking_id: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
}

/// Terminal status reported back to the backend after processing
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub provider_transaction_id: String,
    pub status: PaymentStatus,
}

#[derive(Clone)]
pub struct PaymentsApi {
    api: Api,
}

impl PaymentsApi {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Phase one: the server allocates a payment id.
    pub async fn initiate(&self, initiation: &PaymentInitiation) -> Result<String> {
        let body = self
            .api
            .post("/tenant/payments/initiate", initiation)
            .await
            .map_err(|err| err.or_fallback("Payment initiation failed"))?;
        let payment_id = payment_id_of(&body)?;
        info!(
            booking_id = %initiation.booking_id,
            %payment_id,
            amount = initiation.amount,
            "payment initiated"
        );
        Ok(payment_id)
    }

    /// Phase two: report the processor's transaction id and terminal status.
    pub async fn confirm(&self, confirmation: &PaymentConfirmation) -> Result<Option<Payment>> {
        let body = self
            .api
            .post("/tenant/payments/confirm", confirmation)
            .await
            .map_err(|err| err.or_fallback("Payment confirmation failed"))?;
        info!(
            payment_id = %confirmation.payment_id,
            status = ?confirmation.status,
            "payment confirmed"
        );
        envelope::item_from(body, "payment")
    }

    pub async fn mine(&self) -> Result<Vec<Payment>> {
        self.api.list("/tenant/payments", "payments").await
    }

    pub async fn request_refund(&self, id: &str) -> Result<()> {
        self.api
            .post_empty(format!("/tenant/payments/{id}/refund"))
            .await
            .map_err(|err| err.or_fallback("Refund request failed"))?;
        info!(payment_id = %id, "refund requested");
        Ok(())
    }

    pub async fn owner_payments(&self) -> Result<Vec<Payment>> {
        self.api.list("/dashboard/owner/payments", "payments").await
    }
}

/// `{ payment: { id | _id } }`, `{ paymentId }` or the same under `data`.
fn payment_id_of(body: &Value) -> Result<String> {
    let root = body.get("data").filter(|d| d.is_object()).unwrap_or(body);
    root.get("payment")
        .and_then(|payment| payment.get("id").or_else(|| payment.get("_id")))
        .or_else(|| root.get("paymentId"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::Decode("initiate response has no payment id".into()))
}

#[async_trait]
impl PaymentGateway for PaymentsApi {
    async fn initiate(&self, initiation: &PaymentInitiation) -> Result<String> {
        PaymentsApi::initiate(self, initiation).await
    }

    async fn confirm(&self, confirmation: &PaymentConfirmation) -> Result<Option<Payment>> {
        PaymentsApi::confirm(self, confirmation).await
    }
}
