//! Infrastructure layer: concrete store backends

pub mod storage;

pub use storage::InMemoryStore;
