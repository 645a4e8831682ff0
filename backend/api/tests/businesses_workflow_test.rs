//! Integration tests: business listings
//!
//! Covers the approval lifecycle for listings: pending listings stay
//! private to their owner and admins, approval makes them public, and
//! owner edits send them back through moderation.

mod common;

use actix_web::{test, web, App};
use serde_json::{json, Value};
use serial_test::serial;
use townsquare_api::config::SessionConfig;
use townsquare_api::routes;

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

fn listing_body(name: &str, category: &str) -> Value {
    json!({
        "name": name,
        "category": category,
        "description": "Family run since 1998",
        "phone": "+61298765432",
        "email": "hello@example.com",
        "address": "12 Main St"
    })
}

#[actix_web::test]
#[serial]
async fn listing_visibility_follows_approval() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (owner_id, owner_token) = common::seed_user(&pool, "+61420000001", "shopkeeper").await;
    let (_, visitor_token) = common::seed_user(&pool, "+61420000002", "visitor").await;
    let (admin_id, admin_token) = common::seed_user(&pool, "+61420000003", "reviewer").await;
    common::seed_admin_role(&pool, admin_id, "moderator").await;

    // New listing starts pending
    let req = test::TestRequest::post()
        .uri("/api/v1/businesses")
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(listing_body("Corner Bakery", "food"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let listing: Value = test::read_body_json(resp).await;
    assert_eq!(listing["status"], "pending");
    assert_eq!(listing["owner_id"], owner_id.to_string());
    let business_id = listing["id"].as_str().expect("business id").to_string();

    // Pending listings are absent from the public list
    let req = test::TestRequest::get()
        .uri("/api/v1/businesses")
        .insert_header(("Authorization", format!("Bearer {visitor_token}")))
        .to_request();
    let public: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(public.as_array().map(|a| a.len()), Some(0));

    // And hidden from direct fetch by other users
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/businesses/{business_id}"))
        .insert_header(("Authorization", format!("Bearer {visitor_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    // The owner always sees their own listing
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/businesses/{business_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // So do admins, through the moderation queue and direct fetch
    let req = test::TestRequest::get()
        .uri("/api/v1/admin/businesses")
        .insert_header(("Authorization", format!("Bearer {admin_token}")))
        .to_request();
    let queue: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(queue.as_array().map(|a| a.len()), Some(1));

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/businesses/{business_id}"))
        .insert_header(("Authorization", format!("Bearer {admin_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    // Approve, then the listing is public
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admin/businesses/{business_id}"))
        .insert_header(("Authorization", format!("Bearer {admin_token}")))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri("/api/v1/businesses?category=food")
        .insert_header(("Authorization", format!("Bearer {visitor_token}")))
        .to_request();
    let public: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(public.as_array().map(|a| a.len()), Some(1));
    assert_eq!(public[0]["status"], "approved");

    // The category filter excludes non-matching listings
    let req = test::TestRequest::get()
        .uri("/api/v1/businesses?category=retail")
        .insert_header(("Authorization", format!("Bearer {visitor_token}")))
        .to_request();
    let public: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(public.as_array().map(|a| a.len()), Some(0));
}

#[actix_web::test]
#[serial]
async fn owner_edits_reenter_moderation() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (_, owner_token) = common::seed_user(&pool, "+61420000011", "florist").await;
    let (_, other_token) = common::seed_user(&pool, "+61420000012", "rival").await;
    let (admin_id, admin_token) = common::seed_user(&pool, "+61420000013", "panel").await;
    common::seed_admin_role(&pool, admin_id, "moderator").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/businesses")
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(listing_body("Petal & Stem", "retail"))
        .to_request();
    let listing: Value = test::call_and_read_body_json(&app, req).await;
    let business_id = listing["id"].as_str().expect("business id").to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/admin/businesses/{business_id}"))
        .insert_header(("Authorization", format!("Bearer {admin_token}")))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // Only the owner may edit
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/businesses/{business_id}"))
        .insert_header(("Authorization", format!("Bearer {other_token}")))
        .set_json(listing_body("Hostile takeover", "retail"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // An owner edit resets the listing to pending
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/businesses/{business_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(listing_body("Petal, Stem & Thorn", "retail"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["status"], "pending");
    assert_eq!(updated["name"], "Petal, Stem & Thorn");

    // And it disappears from the public list again
    let req = test::TestRequest::get()
        .uri("/api/v1/businesses")
        .insert_header(("Authorization", format!("Bearer {other_token}")))
        .to_request();
    let public: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(public.as_array().map(|a| a.len()), Some(0));

    // Owner delete
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/businesses/{business_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/businesses/{business_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
