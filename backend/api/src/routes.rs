/// Route table for the townsquare API
///
/// Registration and login are the only unauthenticated actions; every
/// other scope sits behind the session-auth middleware.
use crate::handlers;
use crate::middleware::SessionAuthMiddleware;
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(handlers::auth::register))
                    .route("/login", web::post().to(handlers::auth::login))
                    .service(
                        web::resource("/logout")
                            .wrap(SessionAuthMiddleware)
                            .route(web::post().to(handlers::auth::logout)),
                    ),
            )
            .service(
                web::scope("/users")
                    .wrap(SessionAuthMiddleware)
                    .route("/me", web::get().to(handlers::users::get_me))
                    .route("/me", web::put().to(handlers::users::update_me))
                    .route("/{user_id}", web::get().to(handlers::users::get_profile))
                    .route(
                        "/{user_id}/posts",
                        web::get().to(handlers::posts::get_user_posts),
                    ),
            )
            .service(
                web::scope("/posts")
                    .wrap(SessionAuthMiddleware)
                    .route("", web::post().to(handlers::posts::create_post))
                    .route("", web::get().to(handlers::posts::list_posts))
                    .route("/{post_id}", web::get().to(handlers::posts::get_post))
                    .route("/{post_id}", web::delete().to(handlers::posts::delete_post))
                    .route("/{post_id}/like", web::post().to(handlers::posts::like_post))
                    .route(
                        "/{post_id}/like",
                        web::delete().to(handlers::posts::unlike_post),
                    )
                    .route(
                        "/{post_id}/comments",
                        web::post().to(handlers::comments::create_comment),
                    )
                    .route(
                        "/{post_id}/comments",
                        web::get().to(handlers::comments::list_comments),
                    ),
            )
            .service(
                web::scope("/comments")
                    .wrap(SessionAuthMiddleware)
                    .route(
                        "/{comment_id}",
                        web::delete().to(handlers::comments::delete_comment),
                    ),
            )
            .service(
                web::scope("/communities")
                    .wrap(SessionAuthMiddleware)
                    .route("", web::post().to(handlers::communities::create_community))
                    .route("", web::get().to(handlers::communities::list_communities))
                    .route(
                        "/{community_id}",
                        web::get().to(handlers::communities::get_community),
                    )
                    .route(
                        "/{community_id}",
                        web::put().to(handlers::communities::update_community),
                    )
                    .route(
                        "/{community_id}/join",
                        web::post().to(handlers::communities::join_community),
                    )
                    .route(
                        "/{community_id}/leave",
                        web::post().to(handlers::communities::leave_community),
                    )
                    .route(
                        "/{community_id}/members",
                        web::get().to(handlers::communities::list_members),
                    )
                    .route(
                        "/{community_id}/members/{user_id}/role",
                        web::put().to(handlers::communities::update_member_role),
                    ),
            )
            .service(
                web::scope("/businesses")
                    .wrap(SessionAuthMiddleware)
                    .route("", web::post().to(handlers::businesses::create_business))
                    .route("", web::get().to(handlers::businesses::list_businesses))
                    .route(
                        "/mine",
                        web::get().to(handlers::businesses::list_my_businesses),
                    )
                    .route(
                        "/{business_id}",
                        web::get().to(handlers::businesses::get_business),
                    )
                    .route(
                        "/{business_id}",
                        web::put().to(handlers::businesses::update_business),
                    )
                    .route(
                        "/{business_id}",
                        web::delete().to(handlers::businesses::delete_business),
                    ),
            )
            .service(
                web::scope("/jobs")
                    .wrap(SessionAuthMiddleware)
                    .route("", web::post().to(handlers::jobs::create_job))
                    .route("", web::get().to(handlers::jobs::list_jobs))
                    .route("/mine", web::get().to(handlers::jobs::list_my_jobs))
                    .route(
                        "/applications/mine",
                        web::get().to(handlers::jobs::list_my_applications),
                    )
                    .route(
                        "/applications/{application_id}",
                        web::put().to(handlers::jobs::review_application),
                    )
                    .route("/{job_id}", web::get().to(handlers::jobs::get_job))
                    .route("/{job_id}", web::put().to(handlers::jobs::update_job))
                    .route("/{job_id}", web::delete().to(handlers::jobs::delete_job))
                    .route("/{job_id}/apply", web::post().to(handlers::jobs::apply_to_job))
                    .route(
                        "/{job_id}/applications",
                        web::get().to(handlers::jobs::list_applications),
                    ),
            )
            .service(
                web::scope("/promotions")
                    .wrap(SessionAuthMiddleware)
                    .route("", web::post().to(handlers::promotions::create_promotion))
                    .route("", web::get().to(handlers::promotions::list_promotions))
                    .route(
                        "/mine",
                        web::get().to(handlers::promotions::list_my_promotions),
                    )
                    .route(
                        "/{promotion_id}",
                        web::get().to(handlers::promotions::get_promotion),
                    )
                    .route(
                        "/{promotion_id}",
                        web::delete().to(handlers::promotions::delete_promotion),
                    ),
            )
            .service(
                web::scope("/admin")
                    .wrap(SessionAuthMiddleware)
                    .route("/businesses", web::get().to(handlers::admin::list_businesses))
                    .route(
                        "/businesses/{business_id}",
                        web::put().to(handlers::admin::moderate_business),
                    )
                    .route("/jobs", web::get().to(handlers::admin::list_jobs))
                    .route("/jobs/{job_id}", web::put().to(handlers::admin::moderate_job))
                    .route("/promotions", web::get().to(handlers::admin::list_promotions))
                    .route(
                        "/promotions/{promotion_id}",
                        web::put().to(handlers::admin::moderate_promotion),
                    )
                    .route("/posts/{post_id}", web::delete().to(handlers::admin::remove_post))
                    .route(
                        "/comments/{comment_id}",
                        web::delete().to(handlers::admin::remove_comment),
                    )
                    .route("/users", web::get().to(handlers::admin::list_users))
                    .route(
                        "/users/{user_id}/role",
                        web::put().to(handlers::admin::grant_role),
                    )
                    .route(
                        "/users/{user_id}/role",
                        web::delete().to(handlers::admin::revoke_role),
                    ),
            ),
    );
}
