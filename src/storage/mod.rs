//! Implementations of the service traits for the supported backends

pub mod fs;
pub mod in_memory;
pub mod rest;

pub use fs::FsBlobStore;
pub use in_memory::{
    InMemoryAuthAdmin, InMemoryBlobStore, InMemoryPaymentStore, InMemorySettingsStore,
};
pub use rest::{RestAuthAdmin, RestClient, RestRowStore};
