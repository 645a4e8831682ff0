//! Integration tests: communities, posts, likes, comments
//!
//! Covers membership gating and posting policies, like idempotence,
//! and who may delete posts and comments.

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

#[actix_web::test]
#[serial]
async fn community_membership_and_posting_policy() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (_, founder_token) = common::seed_user(&pool, "+61410000001", "founder").await;
    let (member_id, member_token) = common::seed_user(&pool, "+61410000002", "member").await;

    // Founder creates a moderators-only community
    let req = test::TestRequest::post()
        .uri("/api/v1/communities")
        .insert_header(("Authorization", format!("Bearer {founder_token}")))
        .set_json(json!({
            "name": "Gardening Club",
            "description": "Tips and seed swaps",
            "posting_policy": "moderators"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let community: Value = test::read_body_json(resp).await;
    let community_id = community["id"].as_str().expect("community id").to_string();

    // Names are unique
    let req = test::TestRequest::post()
        .uri("/api/v1/communities")
        .insert_header(("Authorization", format!("Bearer {member_token}")))
        .set_json(json!({ "name": "Gardening Club" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);

    // Non-members cannot post into the community
    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", format!("Bearer {member_token}")))
        .set_json(json!({ "content": "First!", "community_id": community_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/communities/{community_id}/join"))
        .insert_header(("Authorization", format!("Bearer {member_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // Plain members still cannot post under the moderators policy
    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", format!("Bearer {member_token}")))
        .set_json(json!({ "content": "First!", "community_id": community_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // Owner promotes the member to moderator
    let req = test::TestRequest::put()
        .uri(&format!(
            "/api/v1/communities/{community_id}/members/{member_id}/role"
        ))
        .insert_header(("Authorization", format!("Bearer {founder_token}")))
        .set_json(json!({ "role": "moderator" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    // Moderators may post
    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", format!("Bearer {member_token}")))
        .set_json(json!({ "content": "First!", "community_id": community_id }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    // The community feed shows it; the global feed does not
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts?community_id={community_id}"))
        .insert_header(("Authorization", format!("Bearer {member_token}")))
        .to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed.as_array().map(|a| a.len()), Some(1));

    let req = test::TestRequest::get()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", format!("Bearer {member_token}")))
        .to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed.as_array().map(|a| a.len()), Some(0));

    // Owners cannot leave their own community
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/communities/{community_id}/leave"))
        .insert_header(("Authorization", format!("Bearer {founder_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // Members list carries both, owner first
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/communities/{community_id}/members"))
        .insert_header(("Authorization", format!("Bearer {member_token}")))
        .to_request();
    let members: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(members.as_array().map(|a| a.len()), Some(2));
    assert_eq!(members[0]["role"], "owner");
}

#[actix_web::test]
#[serial]
async fn description_updates_distinguish_absent_from_null() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (_, owner_token) = common::seed_user(&pool, "+61410000031", "curator").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/communities")
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(json!({
            "name": "Chess Circle",
            "description": "Weekly games at the library"
        }))
        .to_request();
    let community: Value = test::call_and_read_body_json(&app, req).await;
    let community_id = community["id"].as_str().expect("community id").to_string();

    // Omitting the description keeps it
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/communities/{community_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(json!({ "posting_policy": "moderators" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["description"], "Weekly games at the library");
    assert_eq!(updated["posting_policy"], "moderators");

    // An explicit null clears it
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/communities/{community_id}"))
        .insert_header(("Authorization", format!("Bearer {owner_token}")))
        .set_json(json!({ "description": null }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: Value = test::read_body_json(resp).await;
    assert!(updated["description"].is_null());
}

#[actix_web::test]
#[serial]
async fn likes_are_idempotent_and_counted() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (_, author_token) = common::seed_user(&pool, "+61410000011", "author").await;
    let (_, fan_token) = common::seed_user(&pool, "+61410000012", "fan").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", format!("Bearer {author_token}")))
        .set_json(json!({ "content": "Hello, town" }))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = post["id"].as_str().expect("post id").to_string();

    // Two likes from the same user count once
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/posts/{post_id}/like"))
            .insert_header(("Authorization", format!("Bearer {fan_token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{post_id}"))
        .insert_header(("Authorization", format!("Bearer {author_token}")))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["like_count"], 1);
    assert_eq!(post["author_username"], "author");

    // Unlike drops the count back to zero
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/posts/{post_id}/like"))
        .insert_header(("Authorization", format!("Bearer {fan_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{post_id}"))
        .insert_header(("Authorization", format!("Bearer {author_token}")))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["like_count"], 0);
}

#[actix_web::test]
#[serial]
async fn comment_deletion_authorization() {
    let pool = common::setup_test_db().await.expect("test db");
    let app = test_app!(pool);

    let (_, author_token) = common::seed_user(&pool, "+61410000021", "poster").await;
    let (_, commenter_token) = common::seed_user(&pool, "+61410000022", "commenter").await;
    let (_, stranger_token) = common::seed_user(&pool, "+61410000023", "stranger").await;

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .insert_header(("Authorization", format!("Bearer {author_token}")))
        .set_json(json!({ "content": "Open thread" }))
        .to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    let post_id = post["id"].as_str().expect("post id").to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{post_id}/comments"))
        .insert_header(("Authorization", format!("Bearer {commenter_token}")))
        .set_json(json!({ "content": "Nice one" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let comment: Value = test::read_body_json(resp).await;
    let comment_id = comment["id"].as_str().expect("comment id").to_string();

    // Unrelated users cannot delete it
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/comments/{comment_id}"))
        .insert_header(("Authorization", format!("Bearer {stranger_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 403);

    // The post owner can moderate their own thread
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/comments/{comment_id}"))
        .insert_header(("Authorization", format!("Bearer {author_token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/posts/{post_id}/comments"))
        .insert_header(("Authorization", format!("Bearer {commenter_token}")))
        .to_request();
    let comments: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(comments.as_array().map(|a| a.len()), Some(0));
}
