pub mod filters;
pub mod loaders;
pub mod revenue;

pub use filters::{
    AmountSort, BookingQuery, BookingStats, ListState, PropertyQuery, UserQuery, VisitQuery,
    VisitStats,
};
pub use loaders::{admin_overview, owner_analytics, tenant_home, AdminOverview, OwnerAnalytics, TenantHome};
pub use revenue::{DailyRevenue, RevenueReport};
