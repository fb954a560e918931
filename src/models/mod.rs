//! Typed views of the backend's documents.
//!
//! The backend is authoritative for every shape here, so decoding is lenient:
//! ids arrive as `_id` or `id`, references arrive either as a bare id or as a
//! populated document, and unknown status strings decode to an `Other` variant.

mod bookings;
mod engagement;
mod moderation;
mod payments;
mod properties;
mod subscriptions;
mod users;
mod visits;

pub mod datetime;

pub use bookings::{Booking, BookingStatus};
pub use engagement::{Notification, Review, WishlistEntry};
pub use moderation::{ModerationStatus, Report, SupportTicket};
pub use payments::{Payment, PaymentMethod, PaymentStatus};
pub use properties::{Amenity, ApprovalStatus, Location, Property, PropertyImage, PropertyStatus};
pub use subscriptions::{Plan, Subscription, SubscriptionStatus};
pub use users::{Role, User};
pub use visits::{Visit, VisitStatus};

use serde::{Deserialize, Serialize};

/// Anything the backend stores under an id.
pub trait Identified {
    fn id(&self) -> &str;
}

/// A reference to another document, either unpopulated (the id) or populated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Populated(T),
}

impl<T: Identified> Ref<T> {
    pub fn id(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Populated(doc) => doc.id(),
        }
    }
}

impl<T> Ref<T> {
    /// The populated document, if the backend sent one.
    pub fn populated(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Populated(doc) => Some(doc),
        }
    }
}

macro_rules! impl_identified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_identified!(
    User,
    Property,
    Location,
    Amenity,
    Booking,
    Payment,
    Visit,
    Plan,
    Subscription,
    WishlistEntry,
    Notification,
    Review,
    Report,
    SupportTicket,
);
