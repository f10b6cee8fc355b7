//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod form;
mod health;
mod posts;
mod users;
mod views;

use actix_web::web;

use crate::middleware::error::{form_config, json_config, path_config, query_config};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(form_config())
        .app_data(query_config())
        .app_data(path_config())
        // Public routes
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/signup", web::post().to(auth::signup))
                .route("/login", web::post().to(auth::login))
                .route("/logout", web::get().to(auth::logout)),
        )
        // Authenticated routes
        .service(
            web::resource("/user")
                .route(web::get().to(users::get_profile))
                .route(web::put().to(users::update_profile)),
        )
        .service(
            web::scope("/posts")
                .route("", web::get().to(posts::list_posts))
                // Registered before `/{id}` so "create" is not read as an id.
                .route("/create", web::post().to(posts::create_post))
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(posts::get_post))
                        .route(web::put().to(posts::update_post))
                        .route(web::delete().to(posts::delete_post)),
                )
                .route("/{id}/publish", web::patch().to(posts::publish_post))
                .route("/{id}/unpublish", web::patch().to(posts::unpublish_post))
                .route("/{id}/comments", web::post().to(comments::add_comment))
                .service(
                    web::resource("/{id}/comments/{comment_id}")
                        .route(web::put().to(comments::update_comment))
                        .route(web::delete().to(comments::delete_comment)),
                ),
        );
}
