//! Integration tests for the letter repositories.

use chrono::NaiveDate;
use hrdocs_core::letters::{
    AppointmentLetterFields, OfferLetterFields, OfferStatus, RelievingLetterFields,
};
use hrdocs_core::salary::{compute_breakdown, SalaryStructure};
use hrdocs_db::models::hr_admin::CreateHrAdmin;
use hrdocs_db::repositories::{
    AppointmentLetterRepo, HrAdminRepo, OfferLetterRepo, RelievingLetterRepo,
};
use sqlx::PgPool;

async fn admin(pool: &PgPool) -> i64 {
    HrAdminRepo::create(
        pool,
        &CreateHrAdmin {
            first_name: "Meera".into(),
            last_name: "Iyer".into(),
            email: "meera@example.com".into(),
            password_hash: "not-a-real-hash".into(),
            role: "super_admin".into(),
        },
    )
    .await
    .unwrap()
    .id
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn offer(name: &str) -> OfferLetterFields {
    OfferLetterFields {
        candidate_name: name.into(),
        candidate_address: "Bengaluru".into(),
        position: "Engineer".into(),
        joining_date: date(2025, 6, 2),
        joining_time: "10:30 AM".into(),
        ctc_amount: 600_000,
        ctc_in_words: "Six Lakh Rupees Only".into(),
        probation_months: 6,
        date_issued: date(2025, 5, 1),
        status: OfferStatus::Draft,
        salary_breakdown: compute_breakdown(600_000.0, &SalaryStructure::default()).unwrap(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_offer_crud(pool: PgPool) {
    let actor = admin(&pool).await;
    let created = OfferLetterRepo::create(&pool, &offer("Asha Rao"), actor).await.unwrap();
    assert_eq!(created.created_by, Some(actor));
    assert_eq!(created.salary_breakdown.0.len(), 6);
    assert_eq!(created.to_fields().unwrap(), offer("Asha Rao"));

    let mut changed = created.to_fields().unwrap();
    changed.position = "Senior Engineer".into();
    let updated = OfferLetterRepo::update(&pool, created.id, &changed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.position, "Senior Engineer");

    let sent = OfferLetterRepo::set_status(&pool, created.id, OfferStatus::Sent)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(sent.status, "sent");

    assert!(OfferLetterRepo::delete(&pool, created.id).await.unwrap());
    assert!(OfferLetterRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
    assert!(!OfferLetterRepo::delete(&pool, created.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_offer_list_newest_first(pool: PgPool) {
    let actor = admin(&pool).await;
    let first = OfferLetterRepo::create(&pool, &offer("First"), actor).await.unwrap();
    let second = OfferLetterRepo::create(&pool, &offer("Second"), actor).await.unwrap();

    let page = OfferLetterRepo::list(&pool, 10, 0).await.unwrap();
    let ids: Vec<i64> = page.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(OfferLetterRepo::list(&pool, 1, 1).await.unwrap()[0].id, first.id);
    assert_eq!(OfferLetterRepo::count(&pool).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_admin_keeps_letters(pool: PgPool) {
    let actor = admin(&pool).await;
    let created = OfferLetterRepo::create(&pool, &offer("Asha Rao"), actor).await.unwrap();

    sqlx::query("DELETE FROM hr_admins WHERE id = $1")
        .bind(actor)
        .execute(&pool)
        .await
        .unwrap();

    let reloaded = OfferLetterRepo::find_by_id(&pool, created.id).await.unwrap().unwrap();
    assert_eq!(reloaded.created_by, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_appointment_roundtrip(pool: PgPool) {
    let actor = admin(&pool).await;
    let fields = AppointmentLetterFields {
        employee_name: "Ravi Kumar".into(),
        designation: "Analyst".into(),
        address: "Chennai".into(),
        joining_date: date(2025, 7, 1),
        appointment_date: date(2025, 6, 15),
        ctc_annual: 480_000,
        ctc_words: "Four Lakh Eighty Thousand Rupees Only".into(),
        hr_name: "Meera Iyer".into(),
        hr_designation: "HR Manager".into(),
        salary_breakdown: compute_breakdown(480_000.0, &SalaryStructure::default()).unwrap(),
    };
    let created = AppointmentLetterRepo::create(&pool, &fields, actor).await.unwrap();
    assert_eq!(created.to_fields(), fields);
    assert_eq!(AppointmentLetterRepo::list(&pool, 10, 0).await.unwrap().len(), 1);
    assert!(AppointmentLetterRepo::delete(&pool, created.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_relieving_dates_checked_by_storage(pool: PgPool) {
    let actor = admin(&pool).await;
    let mut fields = RelievingLetterFields {
        employee_name: "Ravi Kumar".into(),
        designation: "Analyst".into(),
        employee_id: "EMP-7".into(),
        joining_date: date(2022, 1, 3),
        relieving_date: date(2024, 12, 31),
    };
    let created = RelievingLetterRepo::create(&pool, &fields, actor).await.unwrap();
    assert_eq!(created.to_fields(), fields);

    fields.relieving_date = date(2021, 12, 31);
    assert!(RelievingLetterRepo::create(&pool, &fields, actor).await.is_err());
}
