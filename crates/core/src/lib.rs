//! Shared domain primitives: tenant and user identifiers, gender, the domain
//! error type and field validation helpers.
//!
//! No IO lives here.

pub mod error;
pub mod gender;
pub mod id;
pub mod validate;

pub use error::{DomainError, DomainResult};
pub use gender::{Gender, parse_gender};
pub use id::{TenantId, UserId};
