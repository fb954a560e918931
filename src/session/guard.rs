//! Route table and role-based route guarding.

use std::fmt;

use tracing::debug;

use crate::models::Role;
use crate::session::handle::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Listings,
    About,
    Contact,
    Login,
    Register,
    ForgotPassword,
    AdminLogin,
    AdminDashboard,
    OwnerDashboard,
    TenantDashboard,
    NotFound(String),
}

impl Route {
    /// Dashboard sub-paths (`/dashboard/owner/bookings`) resolve to their dashboard.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        match normalized {
            "/" => Route::Home,
            "/listings" => Route::Listings,
            "/about" => Route::About,
            "/contact" => Route::Contact,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/forgot-password" => Route::ForgotPassword,
            "/admin/login" => Route::AdminLogin,
            other if within(other, "/dashboard/admin") => Route::AdminDashboard,
            other if within(other, "/dashboard/owner") => Route::OwnerDashboard,
            other if within(other, "/dashboard/tenant") => Route::TenantDashboard,
            other => Route::NotFound(other.to_string()),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::Listings => "/listings",
            Route::About => "/about",
            Route::Contact => "/contact",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::ForgotPassword => "/forgot-password",
            Route::AdminLogin => "/admin/login",
            Route::AdminDashboard => "/dashboard/admin",
            Route::OwnerDashboard => "/dashboard/owner",
            Route::TenantDashboard => "/dashboard/tenant",
            Route::NotFound(path) => path,
        }
    }

    /// `None` for public routes.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::AdminDashboard => Some(&[Role::Admin]),
            Route::OwnerDashboard => Some(&[Role::Owner]),
            Route::TenantDashboard => Some(&[Role::Tenant]),
            _ => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        self.allowed_roles().is_some()
    }

    /// Landing route after login.
    pub fn dashboard_for(role: Role) -> Route {
        match role {
            Role::Admin => Route::AdminDashboard,
            Role::Owner => Route::OwnerDashboard,
            Role::Tenant => Route::TenantDashboard,
        }
    }
}

fn within(path: &str, prefix: &str) -> bool {
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Decides whether `session` may enter `route`.
///
/// Missing session → `/login`. Role outside the allow-list → that role's own
/// dashboard, or `/` when the account has no recognised role.
pub fn check(route: &Route, session: Option<&Session>) -> GuardDecision {
    let Some(allowed) = route.allowed_roles() else {
        return GuardDecision::Allow;
    };

    let Some(session) = session else {
        debug!(route = %route, "no session, redirecting to login");
        return GuardDecision::Redirect(Route::Login);
    };

    match session.role() {
        Some(role) if allowed.contains(&role) => GuardDecision::Allow,
        Some(role) => {
            debug!(route = %route, %role, "role not allowed, redirecting to own dashboard");
            GuardDecision::Redirect(Route::dashboard_for(role))
        }
        None => GuardDecision::Redirect(Route::Home),
    }
}
