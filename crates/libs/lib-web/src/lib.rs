//! # Web Library
//!
//! Account services, HTTP handlers, middleware, and server startup for the
//! identity backend.

pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;

pub use server::{create_router, start_server, AppState, ServerConfig};
pub use services::{AccountManager, IdentityService, LoginOutcome};
