use dexadmin_core::ExchangeCore;
use std::sync::Arc;

use crate::auth::AuthSecret;

/// Shared application state handed to every handler and to the auth layer
#[derive(Clone)]
pub struct AppState {
    pub core: Arc<dyn ExchangeCore>,
    pub auth: Arc<AuthSecret>,
}

impl AppState {
    pub fn new(core: Arc<dyn ExchangeCore>, auth: AuthSecret) -> Self {
        AppState {
            core,
            auth: Arc::new(auth),
        }
    }
}
