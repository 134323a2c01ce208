//! Request handler module
//!
//! Routes requests to the venue API, the landing page or static assets.

pub mod pages;
pub mod recintos;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
