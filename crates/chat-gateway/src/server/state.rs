//! Gateway state
//!
//! Application state shared by the WebSocket endpoint and the REST routes.

use std::sync::Arc;

use chat_common::{HubConfig, JwtService};
use chat_service::ServiceContext;

use crate::hub::Hub;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Session registry and room fan-out
    hub: Arc<Hub>,
    /// Service context with repositories and presence store
    service_context: ServiceContext,
    /// Verifies bearer tokens
    jwt_service: Arc<JwtService>,
    /// Per-session queue and write settings
    hub_config: HubConfig,
    /// Reported by the health endpoint
    service_name: Arc<str>,
}

impl GatewayState {
    /// Create a gateway state with a fresh hub sharing the context's presence store
    pub fn new(
        service_context: ServiceContext,
        jwt_service: JwtService,
        hub_config: HubConfig,
        service_name: impl Into<Arc<str>>,
    ) -> Self {
        let hub = Arc::new(Hub::new(service_context.presence_handle()));
        Self {
            hub,
            service_context,
            jwt_service: Arc::new(jwt_service),
            hub_config,
            service_name: service_name.into(),
        }
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Shared handle to the hub, for shutdown
    pub fn hub_handle(&self) -> Arc<Hub> {
        Arc::clone(&self.hub)
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn hub_config(&self) -> &HubConfig {
        &self.hub_config
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("hub", &self.hub)
            .field("hub_config", &self.hub_config)
            .field("service_name", &self.service_name)
            .finish()
    }
}
