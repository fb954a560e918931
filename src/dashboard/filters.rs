//! Client-side search, filter, sort and counts over lists already fetched.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{
    ApprovalStatus, Booking, BookingStatus, Identified, Property, User, Visit, VisitStatus,
};

fn matches_text(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|text| text.to_lowercase().contains(needle))
}

fn normalise(search: &str) -> String {
    search.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmountSort {
    /// Server order
    #[default]
    None,
    LowToHigh,
    HighToLow,
}

/// Owner booking table controls. `status: None` means "all".
#[derive(Debug, Clone, Default)]
pub struct BookingQuery {
    pub search: String,
    pub status: Option<BookingStatus>,
    pub sort: AmountSort,
}

impl BookingQuery {
    pub fn apply(&self, bookings: &[Booking]) -> Vec<Booking> {
        let needle = normalise(&self.search);
        let mut selected: Vec<Booking> = bookings
            .iter()
            .filter(|booking| {
                needle.is_empty()
                    || matches_text(booking.property_title(), &needle)
                    || matches_text(booking.tenant_name(), &needle)
            })
            .filter(|booking| self.status.map_or(true, |status| booking.status == status))
            .cloned()
            .collect();

        match self.sort {
            AmountSort::None => {}
            AmountSort::LowToHigh => {
                selected.sort_by(|a, b| a.total_amount.total_cmp(&b.total_amount))
            }
            AmountSort::HighToLow => {
                selected.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount))
            }
        }
        selected
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookingStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub cancelled: usize,
}

impl BookingStats {
    pub fn of(bookings: &[Booking]) -> Self {
        let count = |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count();
        Self {
            total: bookings.len(),
            pending: count(BookingStatus::Pending),
            confirmed: count(BookingStatus::Confirmed),
            cancelled: count(BookingStatus::Cancelled),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VisitQuery {
    pub status: Option<VisitStatus>,
}

impl VisitQuery {
    pub fn apply(&self, visits: &[Visit]) -> Vec<Visit> {
        visits
            .iter()
            .filter(|visit| self.status.map_or(true, |status| visit.status == status))
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VisitStats {
    pub scheduled: usize,
    pub completed: usize,
    pub cancelled: usize,
}

impl VisitStats {
    pub fn of(visits: &[Visit]) -> Self {
        let count = |status: VisitStatus| visits.iter().filter(|v| v.status == status).count();
        Self {
            scheduled: count(VisitStatus::Scheduled),
            completed: count(VisitStatus::Completed),
            cancelled: count(VisitStatus::Cancelled),
        }
    }
}

/// Search on title or city, optional approval filter.
#[derive(Debug, Clone, Default)]
pub struct PropertyQuery {
    pub search: String,
    pub approval: Option<ApprovalStatus>,
}

impl PropertyQuery {
    pub fn apply(&self, properties: &[Property]) -> Vec<Property> {
        let needle = normalise(&self.search);
        properties
            .iter()
            .filter(|property| {
                needle.is_empty()
                    || matches_text(Some(&property.title), &needle)
                    || matches_text(property.city(), &needle)
            })
            .filter(|property| {
                self.approval
                    .map_or(true, |approval| property.approval_status == approval)
            })
            .cloned()
            .collect()
    }
}

/// Search on name or email, optional blocked filter.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub search: String,
    pub blocked: Option<bool>,
}

impl UserQuery {
    pub fn apply(&self, users: &[User]) -> Vec<User> {
        let needle = normalise(&self.search);
        users
            .iter()
            .filter(|user| {
                needle.is_empty()
                    || matches_text(Some(&user.full_name), &needle)
                    || matches_text(Some(&user.email), &needle)
            })
            .filter(|user| self.blocked.map_or(true, |blocked| user.is_blocked == blocked))
            .cloned()
            .collect()
    }
}

/// A list view's contents. Every fetch replaces the list wholesale.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    items: Vec<T>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> ListState<T> {
    /// Swaps in a fresh server list, dropping repeated ids.
    pub fn replace(&mut self, fresh: Vec<T>) {
        let mut seen = HashSet::new();
        self.items = fresh
            .into_iter()
            .filter(|item| seen.insert(item.id().to_string()))
            .collect();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bookings() -> Vec<Booking> {
        serde_json::from_value(json!([
            {
                "_id": "b1", "status": "pending", "totalAmount": 5000,
                "propertyId": { "_id": "p1", "title": "Sea Breeze Apartment" },
                "tenantId": { "_id": "t1", "fullName": "Kiran Shah" }
            },
            {
                "_id": "b2", "status": "confirmed", "totalAmount": 1200,
                "propertyId": { "_id": "p2", "title": "Hill Top Cottage" },
                "tenantId": { "_id": "t2", "fullName": "Nisha Rao" }
            },
            {
                "_id": "b3", "status": "cancelled", "totalAmount": 3000,
                "propertyId": "p3",
                "tenantId": { "_id": "t1", "fullName": "Kiran Shah" }
            }
        ]))
        .unwrap()
    }

    fn ids<T: Identified>(items: &[T]) -> Vec<&str> {
        items.iter().map(Identified::id).collect()
    }

    #[test]
    fn search_matches_title_or_tenant_case_insensitively() {
        let query = BookingQuery {
            search: "  kiran ".into(),
            ..BookingQuery::default()
        };
        assert_eq!(ids(&query.apply(&bookings())), vec!["b1", "b3"]);

        let query = BookingQuery {
            search: "COTTAGE".into(),
            ..BookingQuery::default()
        };
        assert_eq!(ids(&query.apply(&bookings())), vec!["b2"]);
    }

    #[test]
    fn status_filter_and_amount_sort_compose() {
        let query = BookingQuery {
            search: String::new(),
            status: None,
            sort: AmountSort::HighToLow,
        };
        assert_eq!(ids(&query.apply(&bookings())), vec!["b1", "b3", "b2"]);

        let query = BookingQuery {
            status: Some(BookingStatus::Confirmed),
            sort: AmountSort::LowToHigh,
            ..BookingQuery::default()
        };
        assert_eq!(ids(&query.apply(&bookings())), vec!["b2"]);
    }

    #[test]
    fn booking_stats_count_each_status() {
        assert_eq!(
            BookingStats::of(&bookings()),
            BookingStats {
                total: 3,
                pending: 1,
                confirmed: 1,
                cancelled: 1
            }
        );
    }

    #[test]
    fn visit_filter_and_stats() {
        let visits: Vec<Visit> = serde_json::from_value(json!([
            { "_id": "v1", "status": "scheduled" },
            { "_id": "v2", "status": "completed" },
            { "_id": "v3", "status": "scheduled" }
        ]))
        .unwrap();
        let query = VisitQuery {
            status: Some(VisitStatus::Scheduled),
        };
        assert_eq!(ids(&query.apply(&visits)), vec!["v1", "v3"]);
        assert_eq!(
            VisitStats::of(&visits),
            VisitStats {
                scheduled: 2,
                completed: 1,
                cancelled: 0
            }
        );
    }

    #[test]
    fn users_filter_on_blocked_and_email() {
        let users: Vec<User> = serde_json::from_value(json!([
            { "_id": "u1", "fullName": "Dev", "email": "dev@rent.in", "isBlocked": true },
            { "_id": "u2", "fullName": "Ira", "email": "ira@rent.in" }
        ]))
        .unwrap();
        let query = UserQuery {
            search: "rent.in".into(),
            blocked: Some(false),
        };
        assert_eq!(ids(&query.apply(&users)), vec!["u2"]);
    }

    #[test]
    fn properties_search_city_too() {
        let properties: Vec<Property> = serde_json::from_value(json!([
            { "_id": "p1", "title": "Garden Flat", "locationId": { "_id": "l1", "city": "Vadodara" }, "approvalStatus": "approved" },
            { "_id": "p2", "title": "Vadodara Heights", "approvalStatus": "pending" },
            { "_id": "p3", "title": "Metro Studio", "approvalStatus": "approved" }
        ]))
        .unwrap();
        let query = PropertyQuery {
            search: "vadodara".into(),
            approval: Some(ApprovalStatus::Approved),
        };
        assert_eq!(ids(&query.apply(&properties)), vec!["p1"]);
    }

    #[test]
    fn refetch_replaces_the_list_without_duplicates() {
        let mut state = ListState::default();
        state.replace(bookings());
        assert_eq!(state.len(), 3);

        let fresh: Vec<Booking> = serde_json::from_value(json!([
            { "_id": "b2", "status": "confirmed" },
            { "_id": "b2", "status": "confirmed" },
            { "_id": "b4", "status": "pending" }
        ]))
        .unwrap();
        state.replace(fresh);

        assert_eq!(ids(state.items()), vec!["b2", "b4"]);
        assert!(state.find("b1").is_none());
    }
}
