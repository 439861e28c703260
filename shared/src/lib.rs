//! Platform-independent core of the learnhub client: wire types, forms,
//! the typed API client and the state the screens render from.

pub mod certificate;
pub mod client;
pub mod config;
pub mod debounce;
pub mod endpoints;
pub mod error;
pub mod format;
pub mod forms;
pub mod http;
pub mod models;
pub mod moderation;
pub mod optimistic;
pub mod roles;
pub mod search;
pub mod session;
pub mod view;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, FieldErrors};
pub use view::LoadState;
