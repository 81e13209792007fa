//! Shared state handed to the HTTP handlers.

use std::sync::Arc;

use crate::policy::Monitor;

#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<Monitor>,
}

impl AppState {
    pub fn new(monitor: Arc<Monitor>) -> Self {
        Self { monitor }
    }
}
