//! Server application state

use crate::gateway::Gateway;

/// Shared, read-only state handed to every request
pub struct AppState {
    pub gateway: Gateway,
    /// Documentation page rendered once at startup
    pub docs_page: String,
}

impl AppState {
    pub fn new(gateway: Gateway, docs_page: String) -> Self {
        Self { gateway, docs_page }
    }
}
