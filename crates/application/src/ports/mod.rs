//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the client core and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod credential_store;
mod transport;

pub use credential_store::{CredentialStore, CredentialStoreError};
pub use transport::{TransferObserver, Transport, TransportError};
