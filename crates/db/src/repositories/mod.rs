//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod employee_repo;
pub mod invoice_repo;
pub mod purchase_request_repo;
pub mod refresh_session_repo;
pub mod role_repo;
pub mod user_repo;

pub use employee_repo::EmployeeRepo;
pub use invoice_repo::InvoiceRepo;
pub use purchase_request_repo::PurchaseRequestRepo;
pub use refresh_session_repo::RefreshSessionRepo;
pub use role_repo::RoleRepo;
pub use user_repo::UserRepo;
