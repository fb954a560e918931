//! Client library for the rental marketplace backend: typed resources, session
//! persistence, role guarding, the booking and payment workflows and dashboard
//! aggregation.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod media;
pub mod models;
pub mod resources;
pub mod session;
pub mod workflow;

use std::sync::Arc;

use tracing::debug;

use crate::api::{Api, HttpClient};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::resources::Resources;
use crate::session::{check, FileSessionStore, GuardDecision, Route, Session, SessionHandle};

/// A ready-to-use client: persisted session, HTTP transport and every resource.
#[derive(Clone)]
pub struct RentalHub {
    pub config: ClientConfig,
    pub session: SessionHandle,
    pub resources: Resources,
}

impl RentalHub {
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let store = FileSessionStore::new(config.session_file.clone());
        let session = SessionHandle::open(Arc::new(store)).await?;
        let transport = HttpClient::new(&config, session.clone())?;
        let resources = Resources::new(Api::new(Arc::new(transport)), session.clone());
        debug!(base_url = %config.base_url, "client ready");

        Ok(Self {
            config,
            session,
            resources,
        })
    }

    /// Runs the route guard for `route` against the current session.
    pub fn enter(&self, route: &Route) -> Result<Option<Session>> {
        let current = self.session.current();
        match check(route, current.as_ref()) {
            GuardDecision::Allow => Ok(current),
            GuardDecision::Redirect(Route::Login) => Err(ClientError::Unauthenticated),
            GuardDecision::Redirect(target) => Err(ClientError::Forbidden(format!(
                "{route} is not available to this account, go to {target}"
            ))),
        }
    }
}
