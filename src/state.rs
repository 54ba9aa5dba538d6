use std::sync::Arc;

use crate::auth::auth::{authenticator_from_config, Authenticator};
use crate::config::{Config, RelaySettings};
use crate::ws::registry::RoomRegistry;

/// Shared state handed to every handler.
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub authenticator: Box<dyn Authenticator>,
    pub relay: RelaySettings,
    pub max_message_size: usize,
}

impl AppState {
    pub fn new(
        registry: Arc<RoomRegistry>,
        authenticator: Box<dyn Authenticator>,
        relay: RelaySettings,
        max_message_size: usize,
    ) -> Self {
        Self {
            registry,
            authenticator,
            relay,
            max_message_size,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(RoomRegistry::new()),
            authenticator_from_config(config),
            config.relay_settings(),
            config.max_message_size,
        )
    }
}
