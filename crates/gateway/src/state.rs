use std::sync::Arc;

use recap_domain::config::Config;

/// Shared state for API handlers.
///
/// Deliberately small: the MCP client is NOT held here. Each recap
/// request spawns its own subprocess and client, so concurrent requests
/// never contend for one connection.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}
