//! Purchase-request approval state machine.
//!
//! A request moves through four strictly sequential sign-off stages, each
//! owned by one [`Role`]:
//!
//! ```text
//! pending_validation ──admin──▶ pending_approval_leader ──approval_leader──▶
//! pending_nom ──nom──▶ pending_sm ──sm──▶ completed
//! ```
//!
//! A reject at any stage moves straight to `rejected`. `completed` and
//! `rejected` are terminal. There is no path back to an earlier stage.
//!
//! [`transition`] is pure: it takes the current status, the acting role and
//! the decision, and returns a [`WorkflowPatch`] describing the fields to
//! write. The repository applies the patch only while the row still has
//! `workflow_status = patch.from`, which is what keeps two stale clients
//! from both advancing the same stage.

use crate::error::CoreError;
use crate::roles::Role;
use crate::status::define_text_enum;
use crate::types::{DbId, Timestamp};

define_text_enum! {
    /// Position of a purchase request in the approval chain.
    WorkflowStatus("workflow status") {
        PendingValidation => "pending_validation",
        PendingApprovalLeader => "pending_approval_leader",
        PendingNom => "pending_nom",
        PendingSm => "pending_sm",
        Completed => "completed",
        Rejected => "rejected",
    }
}

impl WorkflowStatus {
    /// Status assigned to every newly submitted request.
    pub const INITIAL: WorkflowStatus = WorkflowStatus::PendingValidation;

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowStatus::Completed | WorkflowStatus::Rejected)
    }

    /// The only role allowed to act while the request sits in this status.
    pub fn required_role(self) -> Option<Role> {
        match self {
            WorkflowStatus::PendingValidation => Some(Role::Admin),
            WorkflowStatus::PendingApprovalLeader => Some(Role::ApprovalLeader),
            WorkflowStatus::PendingNom => Some(Role::Nom),
            WorkflowStatus::PendingSm => Some(Role::Sm),
            WorkflowStatus::Completed | WorkflowStatus::Rejected => None,
        }
    }

    /// Where an approval at this stage leads.
    pub fn next_on_approve(self) -> Option<WorkflowStatus> {
        match self {
            WorkflowStatus::PendingValidation => Some(WorkflowStatus::PendingApprovalLeader),
            WorkflowStatus::PendingApprovalLeader => Some(WorkflowStatus::PendingNom),
            WorkflowStatus::PendingNom => Some(WorkflowStatus::PendingSm),
            WorkflowStatus::PendingSm => Some(WorkflowStatus::Completed),
            WorkflowStatus::Completed | WorkflowStatus::Rejected => None,
        }
    }

    /// Ordinal position along the approve path. `rejected` ranks above every
    /// pending stage so that any legal transition strictly increases rank.
    pub fn rank(self) -> u8 {
        match self {
            WorkflowStatus::PendingValidation => 0,
            WorkflowStatus::PendingApprovalLeader => 1,
            WorkflowStatus::PendingNom => 2,
            WorkflowStatus::PendingSm => 3,
            WorkflowStatus::Completed | WorkflowStatus::Rejected => 4,
        }
    }
}

/// An approve or reject action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn from_approve(approve: bool) -> Self {
        if approve {
            Decision::Approve
        } else {
            Decision::Reject
        }
    }

    pub fn is_approve(self) -> bool {
        self == Decision::Approve
    }
}

/// Column names of the audit triple a role writes when it acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditColumns {
    pub flag: &'static str,
    pub at: &'static str,
    pub actor: &'static str,
}

/// The audit triple owned by `role`.
pub fn audit_columns(role: Role) -> AuditColumns {
    match role {
        Role::Admin => AuditColumns {
            flag: "admin_validated",
            at: "admin_validated_at",
            actor: "admin_validator",
        },
        Role::ApprovalLeader => AuditColumns {
            flag: "approval_leader_signed",
            at: "approval_leader_signed_at",
            actor: "approval_leader_id",
        },
        Role::Nom => AuditColumns {
            flag: "nom_signed",
            at: "nom_signed_at",
            actor: "nom_id",
        },
        Role::Sm => AuditColumns {
            flag: "sm_signed",
            at: "sm_signed_at",
            actor: "sm_id",
        },
    }
}

/// The partial update produced by one legal transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowPatch {
    /// Status the row must still have for the write to apply.
    pub from: WorkflowStatus,
    pub to: WorkflowStatus,
    /// Role whose audit triple is written.
    pub role: Role,
    pub approved: bool,
    pub acted_at: Timestamp,
    pub actor_id: DbId,
}

impl WorkflowPatch {
    pub fn columns(&self) -> AuditColumns {
        audit_columns(self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("Request is already {0}; no further action is possible")]
    AlreadyFinal(WorkflowStatus),

    #[error("Status {status} must be signed by role '{required}', not '{actual}'")]
    RoleMismatch {
        status: WorkflowStatus,
        required: Role,
        actual: Role,
    },
}

impl From<TransitionError> for CoreError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::AlreadyFinal(_) => CoreError::Conflict(err.to_string()),
            TransitionError::RoleMismatch { .. } => CoreError::Forbidden(err.to_string()),
        }
    }
}

/// Compute the next status and audit fields for `role` deciding on a request
/// currently in `current`.
pub fn transition(
    current: WorkflowStatus,
    role: Role,
    decision: Decision,
    actor_id: DbId,
    now: Timestamp,
) -> Result<WorkflowPatch, TransitionError> {
    let Some(required) = current.required_role() else {
        return Err(TransitionError::AlreadyFinal(current));
    };
    if required != role {
        return Err(TransitionError::RoleMismatch {
            status: current,
            required,
            actual: role,
        });
    }

    let to = match decision {
        Decision::Approve => current
            .next_on_approve()
            .ok_or(TransitionError::AlreadyFinal(current))?,
        Decision::Reject => WorkflowStatus::Rejected,
    };

    Ok(WorkflowPatch {
        from: current,
        to,
        role,
        approved: decision.is_approve(),
        acted_at: now,
        actor_id,
    })
}

/// The role, out of those the viewer holds, that may act on a request in
/// `status`. `None` means the viewer has no action available.
pub fn actionable_role(status: WorkflowStatus, held: &[Role]) -> Option<Role> {
    status.required_role().filter(|r| held.contains(r))
}
