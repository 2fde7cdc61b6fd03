mod auth;
mod codec;
mod config;
mod dto;
mod error;
mod handlers;
mod penalty;
mod scheduler;
mod server;
mod state;
mod tls;
mod validate;

pub use auth::AuthSecret;
pub use codec::{PrettyJson, JSON_CONTENT_TYPE};
pub use config::{AdminConfig, ConfigError, MarketConfig, PASSWORD_ENV};
pub use dto::{BanResult, MarketStatus, SuspendResult, UnbanResult};
pub use error::{ApiError, ServerError};
pub use server::{create_app, AdminServer, SrvConfig};
pub use state::AppState;
pub use tls::TlsConfig;
