//! Integration tests for purchase requests:
//! - Sequence allocation, sequential and concurrent
//! - The approval chain applied through conditional writes
//! - Stale writes, edits and the independent legacy status

use backoffice_core::purchase::LegacyStatus;
use backoffice_core::roles::Role;
use backoffice_core::types::DbId;
use backoffice_core::workflow::{transition, Decision, WorkflowStatus};
use backoffice_db::models::purchase_request::{
    NewPurchaseRequest, PurchaseRequest, PurchaseRequestFilter, UpdatePurchaseRequest,
};
use backoffice_db::models::user::CreateUser;
use backoffice_db::repositories::{PurchaseRequestRepo, UserRepo};
use chrono::Utc;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_request(requester: &str) -> NewPurchaseRequest {
    NewPurchaseRequest {
        request_id: "PR0001".to_string(),
        requester: requester.to_string(),
        position: "Staff".to_string(),
        items: "Office Supplies".to_string(),
        amount: 2_500_000,
        file_url: None,
    }
}

async fn actor(pool: &PgPool, name: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "x".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

async fn sign(
    pool: &PgPool,
    request: &PurchaseRequest,
    role: Role,
    decision: Decision,
    actor_id: DbId,
) -> Option<PurchaseRequest> {
    let patch = transition(request.workflow_status, role, decision, actor_id, Utc::now()).unwrap();
    PurchaseRequestRepo::apply_workflow_patch(pool, request.id, &patch)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Sequence allocation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_first_request_gets_ordinal_one(pool: PgPool) {
    let created = PurchaseRequestRepo::create(&pool, &new_request("Budi")).await.unwrap();
    assert_eq!(created.no_urut, 1);
    assert_eq!(created.workflow_status, WorkflowStatus::PendingValidation);
    assert_eq!(created.status, LegacyStatus::Pending);
    assert!(created.admin_validated.is_none());
    assert!(created.sm_signed.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sequential_ordinals_are_contiguous(pool: PgPool) {
    let mut ordinals = Vec::new();
    for i in 0..5 {
        let created = PurchaseRequestRepo::create(&pool, &new_request(&format!("user{i}")))
            .await
            .unwrap();
        ordinals.push(created.no_urut);
    }
    assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_submissions_get_distinct_ordinals(pool: PgPool) {
    let tasks = (0..10).map(|i| {
        let pool = pool.clone();
        tokio::spawn(async move {
            PurchaseRequestRepo::create(&pool, &new_request(&format!("user{i}")))
                .await
                .map(|r| r.no_urut)
        })
    });

    let mut ordinals: Vec<i64> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();
    ordinals.sort_unstable();

    assert_eq!(ordinals, (1..=10).collect::<Vec<i64>>());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ordinal_follows_max_after_delete(pool: PgPool) {
    let first = PurchaseRequestRepo::create(&pool, &new_request("a")).await.unwrap();
    let second = PurchaseRequestRepo::create(&pool, &new_request("b")).await.unwrap();
    PurchaseRequestRepo::delete(&pool, first.id).await.unwrap();

    let third = PurchaseRequestRepo::create(&pool, &new_request("c")).await.unwrap();
    assert_eq!(third.no_urut, second.no_urut + 1);
}

// ---------------------------------------------------------------------------
// Approval chain
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_full_approval_chain_records_every_stage(pool: PgPool) {
    let admin = actor(&pool, "admin").await;
    let leader = actor(&pool, "leader").await;
    let nom = actor(&pool, "nom").await;
    let sm = actor(&pool, "sm").await;

    let mut request = PurchaseRequestRepo::create(&pool, &new_request("Budi")).await.unwrap();
    for (role, user_id) in [
        (Role::Admin, admin),
        (Role::ApprovalLeader, leader),
        (Role::Nom, nom),
        (Role::Sm, sm),
    ] {
        request = sign(&pool, &request, role, Decision::Approve, user_id)
            .await
            .expect("transition should apply");
    }

    assert_eq!(request.workflow_status, WorkflowStatus::Completed);
    assert_eq!(request.admin_validated, Some(true));
    assert_eq!(request.admin_validator, Some(admin));
    assert_eq!(request.approval_leader_signed, Some(true));
    assert_eq!(request.approval_leader_id, Some(leader));
    assert_eq!(request.nom_signed, Some(true));
    assert_eq!(request.nom_id, Some(nom));
    assert_eq!(request.sm_signed, Some(true));
    assert_eq!(request.sm_id, Some(sm));
    assert!(request.sm_signed_at.is_some());
    // The legacy status is never derived from the workflow.
    assert_eq!(request.status, LegacyStatus::Pending);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_nom_rejection_stops_the_chain(pool: PgPool) {
    let admin = actor(&pool, "admin").await;
    let leader = actor(&pool, "leader").await;
    let nom = actor(&pool, "nom").await;

    let request = PurchaseRequestRepo::create(&pool, &new_request("Budi")).await.unwrap();
    let request = sign(&pool, &request, Role::Admin, Decision::Approve, admin).await.unwrap();
    let request = sign(&pool, &request, Role::ApprovalLeader, Decision::Approve, leader)
        .await
        .unwrap();
    let request = sign(&pool, &request, Role::Nom, Decision::Reject, nom).await.unwrap();

    assert_eq!(request.workflow_status, WorkflowStatus::Rejected);
    assert_eq!(request.nom_signed, Some(false));
    assert_eq!(request.nom_id, Some(nom));
    assert!(request.sm_signed.is_none());
    assert!(request.sm_id.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_rejection_leaves_later_stages_untouched(pool: PgPool) {
    let admin = actor(&pool, "admin").await;
    let request = PurchaseRequestRepo::create(&pool, &new_request("Budi")).await.unwrap();
    let request = sign(&pool, &request, Role::Admin, Decision::Reject, admin).await.unwrap();

    assert_eq!(request.workflow_status, WorkflowStatus::Rejected);
    assert_eq!(request.admin_validated, Some(false));
    assert!(request.approval_leader_signed.is_none());
    assert!(request.nom_signed.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stale_patch_is_not_applied(pool: PgPool) {
    let admin = actor(&pool, "admin").await;
    let other_admin = actor(&pool, "admin2").await;
    let request = PurchaseRequestRepo::create(&pool, &new_request("Budi")).await.unwrap();

    // Both admins read the request while it is pending validation.
    let approve = transition(
        request.workflow_status,
        Role::Admin,
        Decision::Approve,
        admin,
        Utc::now(),
    )
    .unwrap();
    let reject = transition(
        request.workflow_status,
        Role::Admin,
        Decision::Reject,
        other_admin,
        Utc::now(),
    )
    .unwrap();

    let first = PurchaseRequestRepo::apply_workflow_patch(&pool, request.id, &approve)
        .await
        .unwrap();
    assert!(first.is_some());

    let second = PurchaseRequestRepo::apply_workflow_patch(&pool, request.id, &reject)
        .await
        .unwrap();
    assert!(second.is_none());

    let stored = PurchaseRequestRepo::find_by_id(&pool, request.id).await.unwrap().unwrap();
    assert_eq!(stored.workflow_status, WorkflowStatus::PendingApprovalLeader);
    assert_eq!(stored.admin_validator, Some(admin));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_patch_on_missing_row_returns_none(pool: PgPool) {
    let admin = actor(&pool, "admin").await;
    let patch = transition(
        WorkflowStatus::PendingValidation,
        Role::Admin,
        Decision::Approve,
        admin,
        Utc::now(),
    )
    .unwrap();
    let result = PurchaseRequestRepo::apply_workflow_patch(&pool, 999_999, &patch)
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Listing, edits, legacy status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_list_is_oldest_first_and_filterable(pool: PgPool) {
    let admin = actor(&pool, "admin").await;
    let a = PurchaseRequestRepo::create(&pool, &new_request("a")).await.unwrap();
    let b = PurchaseRequestRepo::create(&pool, &new_request("b")).await.unwrap();
    let c = PurchaseRequestRepo::create(&pool, &new_request("c")).await.unwrap();
    sign(&pool, &b, Role::Admin, Decision::Approve, admin).await.unwrap();

    let all = PurchaseRequestRepo::list(&pool, &PurchaseRequestFilter::default())
        .await
        .unwrap();
    assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a.id, b.id, c.id]);

    let pending = PurchaseRequestRepo::list(
        &pool,
        &PurchaseRequestFilter {
            workflow_status: Some(WorkflowStatus::PendingValidation),
            status: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![a.id, c.id]);

    PurchaseRequestRepo::set_legacy_status(&pool, c.id, LegacyStatus::Approved)
        .await
        .unwrap();
    let approved = PurchaseRequestRepo::list(
        &pool,
        &PurchaseRequestFilter {
            workflow_status: None,
            status: Some(LegacyStatus::Approved),
        },
    )
    .await
    .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, c.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_changes_only_given_fields(pool: PgPool) {
    let created = PurchaseRequestRepo::create(&pool, &new_request("Budi")).await.unwrap();
    let updated = PurchaseRequestRepo::update(
        &pool,
        created.id,
        &UpdatePurchaseRequest {
            amount: Some(3_000_000),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.amount, 3_000_000);
    assert_eq!(updated.requester, "Budi");
    assert_eq!(updated.no_urut, created.no_urut);
    assert_eq!(updated.workflow_status, WorkflowStatus::PendingValidation);
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_legacy_status_does_not_touch_workflow(pool: PgPool) {
    let created = PurchaseRequestRepo::create(&pool, &new_request("Budi")).await.unwrap();
    let updated = PurchaseRequestRepo::set_legacy_status(&pool, created.id, LegacyStatus::Rejected)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, LegacyStatus::Rejected);
    assert_eq!(updated.workflow_status, WorkflowStatus::PendingValidation);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_returns_removed_row(pool: PgPool) {
    let mut input = new_request("Budi");
    input.file_url = Some("http://localhost:3000/files/PR0001/1-a.pdf".to_string());
    let created = PurchaseRequestRepo::create(&pool, &input).await.unwrap();

    let deleted = PurchaseRequestRepo::delete(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(deleted.file_url, input.file_url);
    assert!(PurchaseRequestRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
    assert!(PurchaseRequestRepo::delete(&pool, created.id).await.unwrap().is_none());
}
