//! WebSocket change feed.

mod handler;

pub use handler::{ws_handler, FeedQuery};
