//! Application state shared by the handlers

use std::sync::Arc;

use crate::domain::Gateway;

/// One gateway serves every request; it holds no per-request state
#[derive(Debug, Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}
