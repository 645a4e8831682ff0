//! Integration tests: jobs board workflow
//!
//! Covers the approval lifecycle (pending, approve, list), ownership
//! checks, the one-application-per-user rule, and lazy closing of
//! expired approved jobs.

mod common;

use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use serial_test::serial;
use townsquare_api::config::SessionConfig;
use townsquare_api::db::application_repo;
use townsquare_api::error::AppError;
use townsquare_api::routes;
use uuid::Uuid;

macro_rules! test_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(SessionConfig { ttl_days: 30 }))
                .configure(routes::configure),
        )
        .await
    };
}

fn job_body(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Looking for someone reliable.",
        "location": "Downtown",
        "salary_min": 50_000,
        "salary_max": 70_000,
        "expires_at": (Utc::now() + Duration::days(30)).to_rfc3339()
    })
}

#[actix_web::test]
#[serial]
async fn job_approval_lifecycle() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (owner_id, owner_token) = common::seed_user(&pool, "+61400000001", "owner").await;
    let (_, seeker_token) = common::seed_user(&pool, "+61400000002", "seeker").await;
    let (admin_id, admin_token) = common::seed_user(&pool, "+61400000003", "admin").await;
    common::seed_admin_role(&pool, admin_id, "moderator").await;

    // Owner posts a job; it starts pending
    let req = test::TestRequest::post()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(job_body("Barista wanted"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let job: Value = test::read_body_json(resp).await;
    assert_eq!(job["status"], "pending");
    assert_eq!(job["owner_id"], owner_id.to_string());
    let job_id = job["id"].as_str().expect("job id").to_string();

    // Pending jobs stay out of the public listing
    let req = test::TestRequest::get()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing.as_array().map(|a| a.len()), Some(0));

    // And other users cannot fetch them directly
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    // The owner still sees their own pending posting
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // Non-admins cannot touch the moderation queue
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admin/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // Moderator approves
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admin/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {admin_token}")))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // Now it shows up publicly
    let req = test::TestRequest::get()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing.as_array().map(|a| a.len()), Some(1));
    assert_eq!(listing[0]["status"], "approved");

    // Only the owner may edit
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .set_json(job_body("Hijacked title"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // Owner edits drop the job back to pending
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(job_body("Senior barista wanted"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["status"], "pending");
    assert_eq!(updated["title"], "Senior barista wanted");
}

#[actix_web::test]
#[serial]
async fn applications_are_unique_per_user() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (_, owner_token) = common::seed_user(&pool, "+61400000011", "employer").await;
    let (_, seeker_token) = common::seed_user(&pool, "+61400000012", "candidate").await;
    let (admin_id, admin_token) = common::seed_user(&pool, "+61400000013", "mod").await;
    common::seed_admin_role(&pool, admin_id, "moderator").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(job_body("Line cook"))
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;
    let job_id = job["id"].as_str().expect("job id").to_string();

    // Applying before approval is rejected
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/jobs/{job_id}/apply"))
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .set_json(json!({ "cover_note": "Keen to start" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admin/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {admin_token}")))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // Owners cannot apply to their own posting
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/jobs/{job_id}/apply"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // First application succeeds
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/jobs/{job_id}/apply"))
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .set_json(json!({ "cover_note": "Keen to start" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let application: Value = test::read_body_json(resp).await;
    assert_eq!(application["status"], "submitted");
    let application_id = application["id"].as_str().expect("application id").to_string();

    // Second one conflicts
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/jobs/{job_id}/apply"))
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // Applicants cannot read the owner's queue
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/jobs/{job_id}/applications"))
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // Owner shortlists
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/jobs/applications/{application_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(json!({ "status": "shortlisted" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // The applicant sees the new status under their own applications
    let req = test::TestRequest::get()
        .uri("/api/v1/jobs/applications/mine")
        .insert_header(("Authorization", format!("Bearer {seeker_token}")))
        .to_request();
    let mine: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(mine[0]["status"], "shortlisted");
}

#[actix_web::test]
#[serial]
async fn business_links_follow_ownership_on_update() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (_, owner_token) = common::seed_user(&pool, "+61400000031", "cafe_owner").await;
    let (_, other_token) = common::seed_user(&pool, "+61400000032", "other_owner").await;

    // One business each
    let req = test::TestRequest::post()
        .uri("/api/v1/businesses")
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(json!({ "name": "Beanline", "category": "food" }))
        .to_request();
    let mine: Value = test::call_and_read_body_json(&app, req).await;
    let my_business = mine["id"].as_str().expect("business id").to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/businesses")
        .insert_header(("Authorization", format!("Bearer {other_token}")))
        .set_json(json!({ "name": "Rival Roasters", "category": "food" }))
        .to_request();
    let theirs: Value = test::call_and_read_body_json(&app, req).await;
    let their_business = theirs["id"].as_str().expect("business id").to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(job_body("Weekend barista"))
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;
    let job_id = job["id"].as_str().expect("job id").to_string();
    assert!(job["business_id"].is_null());

    // Linking somebody else's business on update is rejected
    let mut body = job_body("Weekend barista");
    body["business_id"] = json!(their_business);
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // Linking your own sticks
    let mut body = job_body("Weekend barista");
    body["business_id"] = json!(my_business);
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["business_id"], my_business);
}

#[actix_web::test]
#[serial]
async fn concurrent_duplicate_application_maps_to_conflict() {
    let pool = common::setup_test_db().await.expect("test db");

    let (owner_id, _) = common::seed_user(&pool, "+61400000041", "hirer").await;
    let (applicant_id, _) = common::seed_user(&pool, "+61400000042", "walkin").await;

    let job_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO jobs (id, owner_id, title, description, status, expires_at)
         VALUES ($1, $2, 'Open role', 'Apply within', 'approved', NOW() + INTERVAL '7 days')",
    )
    .bind(job_id)
    .bind(owner_id)
    .execute(&pool)
    .await
    .expect("seed job");

    application_repo::create_application(&pool, job_id, applicant_id, None)
        .await
        .expect("first application");

    // A second insert that skipped the exists pre-check hits the unique
    // constraint and must surface as a conflict, not a raw database error
    let err = application_repo::create_application(&pool, job_id, applicant_id, None)
        .await
        .expect_err("duplicate application");
    assert!(matches!(AppError::from(err), AppError::Conflict(_)));
}

#[actix_web::test]
#[serial]
async fn expired_jobs_close_before_listing() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (owner_id, token) = common::seed_user(&pool, "+61400000021", "late_owner").await;

    // Approved job whose expiry has already passed
    let job_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO jobs (id, owner_id, title, description, status, expires_at)
         VALUES ($1, $2, 'Old posting', 'Long gone', 'approved', NOW() - INTERVAL '1 day')",
    )
    .bind(job_id)
    .bind(owner_id)
    .execute(&pool)
    .await
    .expect("seed expired job");

    let req = test::TestRequest::get()
        .uri("/api/v1/jobs")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listing.as_array().map(|a| a.len()), Some(0));

    let status: (String,) = sqlx::query_as("SELECT status FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_one(&pool)
        .await
        .expect("job status");
    assert_eq!(status.0, "closed");

    // Closed jobs remain fetchable by anyone
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/jobs/{job_id}"))
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}
