//! Concurrent loads behind each dashboard's landing view.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::dashboard::filters::{BookingStats, VisitStats};
use crate::dashboard::revenue::{self, RevenueReport};
use crate::error::Result;
use crate::models::{Booking, Payment, Visit};
use crate::resources::Resources;

/// Tenant landing page. Sections that fail to load come back empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TenantHome {
    pub summary: Option<Value>,
    pub bookings: Vec<Booking>,
    pub visits: Vec<Visit>,
}

fn settle<T: Default>(section: &str, result: Result<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!(section, error = %err, "dashboard section failed to load");
        T::default()
    })
}

pub async fn tenant_home(resources: &Resources) -> TenantHome {
    let (summary, bookings, visits) = tokio::join!(
        resources.dashboards.tenant_summary(),
        resources.bookings.mine(),
        resources.visits.mine(),
    );
    TenantHome {
        summary: settle("summary", summary.map(Some)),
        bookings: settle("bookings", bookings),
        visits: settle("visits", visits),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerAnalytics {
    pub bookings: Vec<Booking>,
    pub payments: Vec<Payment>,
    pub visits: Vec<Visit>,
    pub revenue: RevenueReport,
    pub booking_stats: BookingStats,
    pub visit_stats: VisitStats,
}

/// Owner analytics need every source; the first failure aborts the load.
pub async fn owner_analytics(
    resources: &Resources,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<OwnerAnalytics> {
    let (bookings, payments, visits) = tokio::try_join!(
        resources.bookings.owner_bookings(),
        resources.payments.owner_payments(),
        resources.visits.owner_visits(),
    )?;

    let revenue = revenue::summarize(&payments, from, to);
    info!(
        bookings = bookings.len(),
        payments = payments.len(),
        visits = visits.len(),
        revenue = revenue.total,
        "owner analytics loaded"
    );
    Ok(OwnerAnalytics {
        booking_stats: BookingStats::of(&bookings),
        visit_stats: VisitStats::of(&visits),
        bookings,
        payments,
        visits,
        revenue,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub summary: Value,
    pub bookings_trend: Value,
    pub revenue_trend: Value,
    pub property_status: Value,
    pub top_owners: Value,
}

pub async fn admin_overview(resources: &Resources) -> Result<AdminOverview> {
    let dashboards = &resources.dashboards;
    let (summary, bookings_trend, revenue_trend, property_status, top_owners) = tokio::try_join!(
        dashboards.admin_summary(),
        dashboards.admin_bookings_trend(),
        dashboards.admin_revenue_trend(),
        dashboards.admin_property_status(),
        dashboards.admin_top_owners(),
    )?;
    Ok(AdminOverview {
        summary,
        bookings_trend,
        revenue_trend,
        property_status,
        top_owners,
    })
}
