//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use gencrypt::Galois;

/// Application state shared across all request handlers.
///
/// The cipher handle is immutable after construction, so every request shares
/// the same instance without locking.
#[derive(Clone, Debug)]
pub struct AppState {
    pub galois: Arc<Galois>,
}

impl AppState {
    pub fn new(galois: Galois) -> Self {
        Self {
            galois: Arc::new(galois),
        }
    }
}
