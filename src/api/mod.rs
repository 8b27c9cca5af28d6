//! API Lambda handler and request processing

pub mod admin;
pub mod handler;
pub mod helpers;
pub mod parsing;
pub mod session;

// Re-export the main handler for convenience
pub use handler::{handler, route};
