//! Date selection, availability check and booking creation for one listing.

use std::future::Future;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::models::{Booking, Property};
use crate::resources::{AvailabilityQuery, NewBooking};

/// The two calls the workflow needs from the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn check_availability(&self, query: &AvailabilityQuery) -> Result<bool>;
    async fn create_booking(&self, booking: &NewBooking) -> Result<Option<Booking>>;
}

/// Checks a requested stay against `today` without touching the network.
pub fn validate_dates(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let (Some(start), Some(end)) = (start, end) else {
        return Err(ClientError::Validation(
            "Please select both start and end dates".to_string(),
        ));
    };
    if start < today {
        return Err(ClientError::Validation(
            "Start date cannot be in the past".to_string(),
        ));
    }
    if end <= start {
        return Err(ClientError::Validation(
            "End date must be after start date".to_string(),
        ));
    }
    Ok((start, end))
}

/// Whole days billed for a span; any started day counts.
pub fn billable_days(span: Duration) -> i64 {
    const DAY: i64 = 86_400;
    let seconds = span.num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + DAY - 1) / DAY
}

pub fn total_amount(start: NaiveDate, end: NaiveDate, price_per_day: f64) -> f64 {
    billable_days(end - start) as f64 * price_per_day
}

/// Price shown before the tenant commits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub days: i64,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingState {
    Idle,
    DatesSelected {
        start: NaiveDate,
        end: NaiveDate,
    },
    AvailabilityChecked {
        start: NaiveDate,
        end: NaiveDate,
        available: bool,
    },
    Booking {
        start: NaiveDate,
        end: NaiveDate,
    },
    Booked(Option<Booking>),
    /// Creation failed after a positive check; the same range may be retried.
    Failed {
        start: NaiveDate,
        end: NaiveDate,
        message: String,
    },
}

impl BookingState {
    fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            BookingState::DatesSelected { start, end }
            | BookingState::AvailabilityChecked { start, end, .. }
            | BookingState::Booking { start, end }
            | BookingState::Failed { start, end, .. } => Some((start, end)),
            BookingState::Idle | BookingState::Booked(_) => None,
        }
    }
}

/// Drives one booking attempt for a single listing.
pub struct BookingWorkflow<G> {
    gateway: G,
    property_id: String,
    price_per_day: f64,
    state: BookingState,
}

impl<G: BookingGateway> BookingWorkflow<G> {
    pub fn new(gateway: G, property_id: impl Into<String>, price_per_day: f64) -> Self {
        Self {
            gateway,
            property_id: property_id.into(),
            price_per_day,
            state: BookingState::Idle,
        }
    }

    pub fn for_property(gateway: G, property: &Property) -> Self {
        Self::new(gateway, property.id.clone(), property.price)
    }

    pub fn state(&self) -> &BookingState {
        &self.state
    }

    /// Sets the range and discards any earlier availability result.
    pub fn select_dates(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Quote> {
        let (start, end) = match validate_dates(start, end, today) {
            Ok(range) => range,
            Err(err) => {
                self.state = BookingState::Idle;
                return Err(err);
            }
        };
        debug!(%start, %end, "booking dates selected");
        self.state = BookingState::DatesSelected { start, end };
        Ok(self.quote_for(start, end))
    }

    pub fn quote(&self) -> Option<Quote> {
        self.state
            .range()
            .map(|(start, end)| self.quote_for(start, end))
    }

    fn quote_for(&self, start: NaiveDate, end: NaiveDate) -> Quote {
        Quote {
            days: billable_days(end - start),
            total_amount: total_amount(start, end, self.price_per_day),
        }
    }

    pub async fn check_availability(&mut self) -> Result<bool> {
        let (start, end) = self.state.range().ok_or_else(|| {
            ClientError::Validation("Please select both start and end dates".to_string())
        })?;

        let query = AvailabilityQuery {
            property_id: self.property_id.clone(),
            booking_start_date: start,
            booking_end_date: end,
        };
        // A failed re-check must not leave an earlier positive result in place.
        self.state = BookingState::DatesSelected { start, end };
        let available = self.gateway.check_availability(&query).await?;
        info!(property_id = %self.property_id, %start, %end, available, "availability checked");
        self.state = BookingState::AvailabilityChecked {
            start,
            end,
            available,
        };
        Ok(available)
    }

    /// Creates the booking, then runs `refresh` so callers reload their lists.
    ///
    /// Only allowed after a positive check for the current range.
    pub async fn confirm<R, Fut>(&mut self, refresh: R) -> Result<Option<Booking>>
    where
        R: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let (start, end) = match self.state {
            BookingState::AvailabilityChecked {
                start,
                end,
                available: true,
            }
            | BookingState::Failed { start, end, .. } => (start, end),
            BookingState::AvailabilityChecked {
                available: false, ..
            } => {
                return Err(ClientError::BookingNotAllowed(
                    "Property is not available for the selected dates".to_string(),
                ))
            }
            _ => {
                return Err(ClientError::BookingNotAllowed(
                    "Check availability before booking".to_string(),
                ))
            }
        };

        let booking = NewBooking {
            property_id: self.property_id.clone(),
            booking_start_date: start,
            booking_end_date: end,
            total_amount: total_amount(start, end, self.price_per_day),
        };
        self.state = BookingState::Booking { start, end };

        match self.gateway.create_booking(&booking).await {
            Ok(created) => {
                self.state = BookingState::Booked(created.clone());
                if let Err(err) = refresh().await {
                    warn!(error = %err, "refresh after booking failed");
                }
                Ok(created)
            }
            Err(err) => {
                let err = err.or_fallback("Booking failed");
                warn!(property_id = %self.property_id, error = %err, "booking failed");
                self.state = BookingState::Failed {
                    start,
                    end,
                    message: err.user_message(),
                };
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn today() -> NaiveDate {
        date("2024-01-01")
    }

    async fn no_refresh() -> Result<()> {
        Ok(())
    }

    #[test]
    fn rejects_bad_ranges_with_form_messages() {
        let cases = [
            (None, Some(date("2024-01-04")), "Please select both start and end dates"),
            (Some(date("2023-12-31")), Some(date("2024-01-04")), "Start date cannot be in the past"),
            (Some(date("2024-01-04")), Some(date("2024-01-04")), "End date must be after start date"),
            (Some(date("2024-01-05")), Some(date("2024-01-04")), "End date must be after start date"),
        ];
        for (start, end, message) in cases {
            let err = validate_dates(start, end, today()).unwrap_err();
            assert_eq!(err.user_message(), message);
        }
        assert!(validate_dates(Some(today()), Some(date("2024-01-02")), today()).is_ok());
    }

    #[test]
    fn three_nights_at_one_thousand() {
        assert_eq!(total_amount(date("2024-01-01"), date("2024-01-04"), 1000.0), 3000.0);
    }

    #[test]
    fn partial_days_round_up() {
        assert_eq!(billable_days(Duration::hours(25)), 2);
        assert_eq!(billable_days(Duration::days(2)), 2);
        assert_eq!(billable_days(Duration::zero()), 0);
    }

    #[tokio::test]
    async fn invalid_dates_never_reach_the_gateway() {
        let mut workflow = BookingWorkflow::new(MockBookingGateway::new(), "p1", 1000.0);
        assert!(workflow
            .select_dates(Some(date("2023-06-01")), Some(date("2023-06-03")), today())
            .is_err());
        assert_eq!(workflow.state(), &BookingState::Idle);
        assert!(workflow.check_availability().await.is_err());
    }

    #[tokio::test]
    async fn confirm_requires_a_positive_check() {
        let mut gateway = MockBookingGateway::new();
        gateway.expect_check_availability().returning(|_| Ok(false));
        gateway.expect_create_booking().never();

        let mut workflow = BookingWorkflow::new(gateway, "p1", 1000.0);
        workflow
            .select_dates(Some(date("2024-01-01")), Some(date("2024-01-04")), today())
            .unwrap();
        assert!(matches!(
            workflow.confirm(no_refresh).await,
            Err(ClientError::BookingNotAllowed(_))
        ));

        assert!(!workflow.check_availability().await.unwrap());
        assert!(matches!(
            workflow.confirm(no_refresh).await,
            Err(ClientError::BookingNotAllowed(_))
        ));
    }

    #[tokio::test]
    async fn failed_recheck_withdraws_earlier_availability() {
        let mut seq = mockall::Sequence::new();
        let mut gateway = MockBookingGateway::new();
        gateway
            .expect_check_availability()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(true));
        gateway
            .expect_check_availability()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(ClientError::from_status(
                    reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    None,
                ))
            });
        gateway.expect_create_booking().never();

        let mut workflow = BookingWorkflow::new(gateway, "p1", 1000.0);
        workflow
            .select_dates(Some(date("2024-01-01")), Some(date("2024-01-04")), today())
            .unwrap();
        assert!(workflow.check_availability().await.unwrap());
        assert!(workflow.check_availability().await.is_err());

        assert!(matches!(
            workflow.state(),
            BookingState::DatesSelected { .. }
        ));
        assert!(matches!(
            workflow.confirm(no_refresh).await,
            Err(ClientError::BookingNotAllowed(_))
        ));
    }

    #[tokio::test]
    async fn changing_dates_requires_a_new_check() {
        let mut gateway = MockBookingGateway::new();
        gateway.expect_check_availability().times(1).returning(|_| Ok(true));
        gateway.expect_create_booking().never();

        let mut workflow = BookingWorkflow::new(gateway, "p1", 1000.0);
        workflow
            .select_dates(Some(date("2024-01-01")), Some(date("2024-01-04")), today())
            .unwrap();
        assert!(workflow.check_availability().await.unwrap());

        let quote = workflow
            .select_dates(Some(date("2024-01-01")), Some(date("2024-01-06")), today())
            .unwrap();
        assert_eq!(quote.total_amount, 5000.0);
        assert!(matches!(
            workflow.state(),
            BookingState::DatesSelected { .. }
        ));
        assert!(matches!(
            workflow.confirm(no_refresh).await,
            Err(ClientError::BookingNotAllowed(_))
        ));
    }

    #[tokio::test]
    async fn successful_booking_sends_the_quote_and_refreshes() {
        let mut gateway = MockBookingGateway::new();
        gateway.expect_check_availability().returning(|_| Ok(true));
        gateway
            .expect_create_booking()
            .withf(|booking| {
                booking.property_id == "p1"
                    && booking.total_amount == 3000.0
                    && booking.booking_start_date == date("2024-01-01")
            })
            .times(1)
            .returning(|_| {
                Ok(Some(
                    serde_json::from_value(serde_json::json!({
                        "_id": "b1",
                        "totalAmount": 3000,
                        "status": "pending"
                    }))
                    .unwrap(),
                ))
            });

        let refreshed = Arc::new(AtomicUsize::new(0));
        let counter = refreshed.clone();

        let mut workflow = BookingWorkflow::new(gateway, "p1", 1000.0);
        workflow
            .select_dates(Some(date("2024-01-01")), Some(date("2024-01-04")), today())
            .unwrap();
        workflow.check_availability().await.unwrap();
        let booking = workflow
            .confirm(|| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(booking.id, "b1");
        assert_eq!(refreshed.load(Ordering::SeqCst), 1);
        assert!(matches!(workflow.state(), BookingState::Booked(Some(_))));
    }

    #[tokio::test]
    async fn server_rejection_leaves_a_retryable_failure() {
        let mut gateway = MockBookingGateway::new();
        gateway.expect_check_availability().returning(|_| Ok(true));
        gateway.expect_create_booking().times(1).returning(|_| {
            Err(ClientError::from_status(
                reqwest::StatusCode::CONFLICT,
                Some("Property already booked for these dates".into()),
            ))
        });

        let mut workflow = BookingWorkflow::new(gateway, "p1", 1000.0);
        workflow
            .select_dates(Some(date("2024-01-01")), Some(date("2024-01-04")), today())
            .unwrap();
        workflow.check_availability().await.unwrap();
        let err = workflow.confirm(no_refresh).await.unwrap_err();

        assert_eq!(err.user_message(), "Property already booked for these dates");
        assert!(matches!(
            workflow.state(),
            BookingState::Failed { message, .. } if message == "Property already booked for these dates"
        ));
    }
}
