//! Request handler module
//!
//! Responsible for request routing and handing function calls to the dispatcher.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
