//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod employee;
pub mod invoice;
pub mod purchase_request;
pub mod refresh_session;
pub mod role;
pub mod user;
