//! Event names published on the bus, `{entity}.{action}`.

pub const ENTITY_PURCHASE_REQUEST: &str = "purchase_request";
pub const ENTITY_EMPLOYEE: &str = "employee";
pub const ENTITY_INVOICE: &str = "invoice";

/// The entity kinds a feed subscriber may narrow to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    PurchaseRequest,
    Employee,
    Invoice,
}

impl EntityKind {
    /// The `source_entity_type` carried by events of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::PurchaseRequest => ENTITY_PURCHASE_REQUEST,
            EntityKind::Employee => ENTITY_EMPLOYEE,
            EntityKind::Invoice => ENTITY_INVOICE,
        }
    }
}

pub const PURCHASE_REQUEST_CREATED: &str = "purchase_request.created";
pub const PURCHASE_REQUEST_UPDATED: &str = "purchase_request.updated";
pub const PURCHASE_REQUEST_DELETED: &str = "purchase_request.deleted";
pub const PURCHASE_REQUEST_SIGNED: &str = "purchase_request.signed";
pub const PURCHASE_REQUEST_STATUS_CHANGED: &str = "purchase_request.status_changed";

pub const EMPLOYEE_CREATED: &str = "employee.created";
pub const EMPLOYEE_UPDATED: &str = "employee.updated";
pub const EMPLOYEE_DELETED: &str = "employee.deleted";
pub const EMPLOYEE_PROCESSED: &str = "employee.processed";
pub const EMPLOYEES_PROCESSED_ALL: &str = "employee.processed_all";

pub const INVOICE_CREATED: &str = "invoice.created";
pub const INVOICE_UPDATED: &str = "invoice.updated";
pub const INVOICE_DELETED: &str = "invoice.deleted";
pub const INVOICE_STATUS_CHANGED: &str = "invoice.status_changed";
