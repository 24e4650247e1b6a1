//! Integration tests for employees and invoices.

use backoffice_core::billing::InvoiceStatus;
use backoffice_core::payroll::EmployeeStatus;
use backoffice_db::models::employee::{CreateEmployee, UpdateEmployee};
use backoffice_db::models::invoice::{NewInvoice, UpdateInvoice};
use backoffice_db::repositories::{EmployeeRepo, InvoiceRepo};
use chrono::NaiveDate;
use sqlx::PgPool;

fn new_employee(name: &str) -> CreateEmployee {
    CreateEmployee {
        name: name.to_string(),
        position: "Engineer".to_string(),
        salary: 12_000_000,
    }
}

fn new_invoice(client: &str) -> NewInvoice {
    NewInvoice {
        invoice_id: "INV0001".to_string(),
        client: client.to_string(),
        amount: 5_000_000,
        due_date: NaiveDate::from_ymd_opt(2030, 1, 31).unwrap(),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_employee_crud(pool: PgPool) {
    let created = EmployeeRepo::create(&pool, &new_employee("Andi")).await.unwrap();
    assert_eq!(created.status, EmployeeStatus::Pending);

    let updated = EmployeeRepo::update(
        &pool,
        created.id,
        &UpdateEmployee {
            salary: Some(13_000_000),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.salary, 13_000_000);
    assert_eq!(updated.name, "Andi");

    assert!(EmployeeRepo::delete(&pool, created.id).await.unwrap());
    assert!(EmployeeRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_employee_list_is_newest_first(pool: PgPool) {
    let first = EmployeeRepo::create(&pool, &new_employee("a")).await.unwrap();
    let second = EmployeeRepo::create(&pool, &new_employee("b")).await.unwrap();
    let ids: Vec<_> = EmployeeRepo::list(&pool).await.unwrap().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_process_is_one_way(pool: PgPool) {
    let created = EmployeeRepo::create(&pool, &new_employee("Andi")).await.unwrap();

    let processed = EmployeeRepo::process(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(processed.status, EmployeeStatus::Processed);

    assert!(EmployeeRepo::process(&pool, created.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_process_all_counts_only_pending(pool: PgPool) {
    let a = EmployeeRepo::create(&pool, &new_employee("a")).await.unwrap();
    EmployeeRepo::create(&pool, &new_employee("b")).await.unwrap();
    EmployeeRepo::create(&pool, &new_employee("c")).await.unwrap();
    EmployeeRepo::process(&pool, a.id).await.unwrap();

    assert_eq!(EmployeeRepo::process_all_pending(&pool).await.unwrap(), 2);
    assert_eq!(EmployeeRepo::process_all_pending(&pool).await.unwrap(), 0);

    let statuses: Vec<_> = EmployeeRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.status)
        .collect();
    assert!(statuses.iter().all(|s| *s == EmployeeStatus::Processed));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_invoice_crud(pool: PgPool) {
    let created = InvoiceRepo::create(&pool, &new_invoice("PT Maju")).await.unwrap();
    assert_eq!(created.status, InvoiceStatus::Pending);
    assert_eq!(created.due_date, NaiveDate::from_ymd_opt(2030, 1, 31).unwrap());

    let updated = InvoiceRepo::update(
        &pool,
        created.id,
        &UpdateInvoice {
            client: Some("PT Jaya".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.client, "PT Jaya");
    assert_eq!(updated.amount, 5_000_000);

    assert_eq!(InvoiceRepo::list(&pool).await.unwrap().len(), 1);
    assert!(InvoiceRepo::delete(&pool, created.id).await.unwrap());
    assert!(!InvoiceRepo::delete(&pool, created.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_paid_invoice_is_frozen(pool: PgPool) {
    let created = InvoiceRepo::create(&pool, &new_invoice("PT Maju")).await.unwrap();

    let overdue = InvoiceRepo::set_status(&pool, created.id, InvoiceStatus::Overdue)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(overdue.status, InvoiceStatus::Overdue);

    let paid = InvoiceRepo::set_status(&pool, created.id, InvoiceStatus::Paid)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(paid.status, InvoiceStatus::Paid);

    assert!(InvoiceRepo::set_status(&pool, created.id, InvoiceStatus::Overdue)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_zero_amount_invoice_rejected_by_schema(pool: PgPool) {
    let mut input = new_invoice("PT Maju");
    input.amount = 0;
    assert!(InvoiceRepo::create(&pool, &input).await.is_err());
}
