//! HTTP surface: router, handlers, middleware, and shared state.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
