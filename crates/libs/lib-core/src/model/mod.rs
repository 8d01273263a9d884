//! # Model
//!
//! Account entity types and the credential store.

pub mod store;

pub use store::models::{Account, AccountForCreate, AccountRecord};
