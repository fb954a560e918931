use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{datetime, Booking, Ref, User};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Success,
    Failed,
    Refunded,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "UPI")]
    Upi,
    Card,
    NetBanking,
    Cash,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, rename = "bookingId", alias = "booking")]
    pub booking: Option<Ref<Booking>>,
    #[serde(default, rename = "userId", alias = "payer", alias = "tenantId")]
    pub payer: Option<Ref<User>>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub provider_transaction_id: Option<String>,
    #[serde(default, deserialize_with = "datetime::optional")]
    pub payment_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_successful_upi_payment() {
        let payment: Payment = serde_json::from_value(json!({
            "_id": "pay1",
            "bookingId": "b1",
            "amount": 3000,
            "paymentMethod": "UPI",
            "status": "success",
            "providerTransactionId": "UPI_TXN_1700000000000",
            "paymentDate": "2024-01-02T12:00:00Z"
        }))
        .unwrap();
        assert_eq!(payment.status, PaymentStatus::Success);
        assert_eq!(payment.payment_method, Some(PaymentMethod::Upi));
        assert_eq!(payment.booking.unwrap().id(), "b1");
    }

    #[test]
    fn upi_serializes_in_upper_case() {
        assert_eq!(serde_json::to_value(PaymentMethod::Upi).unwrap(), json!("UPI"));
    }
}
