//! Domain logic for the back-office service.
//!
//! This crate has no I/O. It owns the purchase-request approval state
//! machine, the ordinal allocation rule, role vocabulary, and the input
//! validation shared by the DB and API layers.

pub mod attachment;
pub mod billing;
pub mod error;
pub mod payroll;
pub mod purchase;
pub mod roles;
pub mod sequence;
pub mod status;
pub mod types;
pub mod validation;
pub mod workflow;
