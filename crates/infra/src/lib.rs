//! Infrastructure layer: storage backends and the access-control service that
//! connects the pure authorization core to them.

pub mod access;
pub mod db;
pub mod store;

pub use access::{AccessControl, AccessError};
pub use store::{HrStore, IdentityStore, InMemoryStore, PostgresStore, RealEstateStore, StoreError, Stores};
