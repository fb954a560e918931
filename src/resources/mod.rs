//! One typed wrapper per backend resource. Every wrapper shares the same [`Api`] handle.

pub mod auth;
pub mod bookings;
pub mod dashboards;
pub mod moderation;
pub mod notifications;
pub mod payments;
pub mod properties;
pub mod reviews;
pub mod subscriptions;
pub mod users;
pub mod visits;
pub mod wishlist;

pub use auth::{AuthApi, Credentials, Registration, RoleOption};
pub use bookings::{AdminBookingQuery, AvailabilityQuery, BookingsApi, NewBooking};
pub use dashboards::DashboardsApi;
pub use moderation::ModerationApi;
pub use notifications::{Announcement, NotificationsApi};
pub use payments::{PaymentConfirmation, PaymentInitiation, PaymentsApi};
pub use properties::{AdminPropertyQuery, BrowseQuery, FilterOptions, PropertiesApi, PropertyDraft};
pub use reviews::{NewReview, ReviewsApi};
pub use subscriptions::SubscriptionsApi;
pub use users::{AdminUserQuery, PasswordChange, ProfileApi, ProfileUpdate, UsersApi};
pub use visits::{NewVisit, VisitsApi};
pub use wishlist::WishlistApi;

use crate::api::Api;
use crate::session::SessionHandle;

/// Every resource wrapper, built once from a shared transport and session.
#[derive(Clone)]
pub struct Resources {
    pub auth: AuthApi,
    pub bookings: BookingsApi,
    pub dashboards: DashboardsApi,
    pub moderation: ModerationApi,
    pub notifications: NotificationsApi,
    pub payments: PaymentsApi,
    pub profile: ProfileApi,
    pub properties: PropertiesApi,
    pub reviews: ReviewsApi,
    pub subscriptions: SubscriptionsApi,
    pub users: UsersApi,
    pub visits: VisitsApi,
    pub wishlist: WishlistApi,
}

impl Resources {
    pub fn new(api: Api, session: SessionHandle) -> Self {
        Self {
            auth: AuthApi::new(api.clone(), session),
            bookings: BookingsApi::new(api.clone()),
            dashboards: DashboardsApi::new(api.clone()),
            moderation: ModerationApi::new(api.clone()),
            notifications: NotificationsApi::new(api.clone()),
            payments: PaymentsApi::new(api.clone()),
            profile: ProfileApi::new(api.clone()),
            properties: PropertiesApi::new(api.clone()),
            reviews: ReviewsApi::new(api.clone()),
            subscriptions: SubscriptionsApi::new(api.clone()),
            users: UsersApi::new(api.clone()),
            visits: VisitsApi::new(api.clone()),
            wishlist: WishlistApi::new(api),
        }
    }
}
