//! Two-phase payment: initiate on the server, process, then confirm the outcome.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use crate::error::{ClientError, Result};
use crate::models::{Booking, Payment, PaymentMethod, PaymentStatus};
use crate::resources::{PaymentConfirmation, PaymentInitiation};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate(&self, initiation: &PaymentInitiation) -> Result<String>;
    async fn confirm(&self, confirmation: &PaymentConfirmation) -> Result<Option<Payment>>;
}

/// What a payment processor reports for one charge
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorReceipt {
    pub provider_transaction_id: String,
    pub status: PaymentStatus,
}

/// The party that actually moves money and vouches for the result.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn process(&self, payment_id: &str, amount: f64) -> Result<ProcessorReceipt>;
}

/// Stand-in processor: no money moves. It waits, then reports success with a
/// fabricated `UPI_TXN_<unix millis>` reference.
#[derive(Debug, Clone)]
pub struct SimulatedUpiProcessor {
    delay: Duration,
}

impl SimulatedUpiProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedUpiProcessor {
    async fn process(&self, payment_id: &str, amount: f64) -> Result<ProcessorReceipt> {
        warn!(%payment_id, amount, "simulated UPI processor, no funds are captured");
        tokio::time::sleep(self.delay).await;
        Ok(ProcessorReceipt {
            provider_transaction_id: format!("UPI_TXN_{}", Utc::now().timestamp_millis()),
            status: PaymentStatus::Success,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Succeeded {
        payment_id: String,
        payment: Option<Payment>,
    },
    Failed {
        payment_id: String,
        status: PaymentStatus,
    },
}

pub struct PaymentWorkflow<G, P> {
    gateway: G,
    processor: P,
}

impl<G: PaymentGateway, P: PaymentProcessor> PaymentWorkflow<G, P> {
    pub fn new(gateway: G, processor: P) -> Self {
        Self { gateway, processor }
    }

    /// Pays the booking's full amount and reports the processor's verdict to the server.
    ///
    /// `refresh` runs once the outcome is confirmed, whether it succeeded or not.
    pub async fn pay<R, Fut>(
        &self,
        booking: &Booking,
        method: PaymentMethod,
        refresh: R,
    ) -> Result<PaymentOutcome>
    where
        R: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        if booking.is_paid() {
            return Err(ClientError::Validation(
                "This booking is already paid".to_string(),
            ));
        }

        let initiation = PaymentInitiation {
            booking_id: booking.id.clone(),
            amount: booking.total_amount,
            payment_method: method,
        };
        let payment_id = self.gateway.initiate(&initiation).await?;

        let receipt = self
            .processor
            .process(&payment_id, booking.total_amount)
            .await?;
        let status = match receipt.status {
            PaymentStatus::Success => PaymentStatus::Success,
            other => {
                warn!(%payment_id, ?other, "processor did not report success");
                PaymentStatus::Failed
            }
        };

        let confirmation = PaymentConfirmation {
            payment_id: payment_id.clone(),
            provider_transaction_id: receipt.provider_transaction_id,
            status,
        };
        let payment = self.gateway.confirm(&confirmation).await?;

        if let Err(err) = refresh().await {
            warn!(error = %err, "refresh after payment failed");
        }

        if status == PaymentStatus::Success {
            info!(booking_id = %booking.id, %payment_id, "payment succeeded");
            Ok(PaymentOutcome::Succeeded {
                payment_id,
                payment,
            })
        } else {
            Ok(PaymentOutcome::Failed { payment_id, status })
        }
    }
}
