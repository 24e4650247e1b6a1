pub mod auth;
pub mod employee;
pub mod invoice;
pub mod purchase_request;
