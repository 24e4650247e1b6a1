//! Back-office change feed.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the envelope published after every successful
//!   mutation and forwarded to WebSocket subscribers.
//! - [`event_types`] -- the event names the service emits.

pub mod bus;
pub mod event_types;

pub use bus::{EventBus, PlatformEvent};
