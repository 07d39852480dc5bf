//! Credential handling for the Courier client.
//!
//! This module provides:
//! - In-memory bearer token storage
//! - The request interceptor that attaches the token to outgoing calls

mod interceptor;
mod token_store;

pub use interceptor::AuthInterceptor;
pub use token_store::InMemoryCredentialStore;
