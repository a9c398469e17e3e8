//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;
mod tags;
mod users;

#[cfg(test)]
mod tests;

use actix_web::{error, web};

use crate::middleware::error::AppError;

/// Malformed paths, queries and bodies are answered with a 400 problem document.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }));
}

/// Configure all application routes, relative to the API prefix.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    extractor_configs(cfg);

    cfg
        // Public routes
        .route("/health", web::get().to(health::health_check))
        .route("/login", web::post().to(auth::login))
        .route("/login/test-token", web::post().to(auth::test_token))
        .service(
            web::scope("/users")
                .route("/signup", web::post().to(users::signup))
                // `/me` must be registered before `/{id}`
                .service(
                    web::resource("/me")
                        .route(web::get().to(users::read_me))
                        .route(web::put().to(users::update_me))
                        .route(web::delete().to(users::delete_me)),
                )
                .route("/me/password", web::patch().to(users::update_password))
                .service(
                    web::resource("")
                        .route(web::get().to(users::list_users))
                        .route(web::post().to(users::create_user)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(users::get_user))
                        .route(web::patch().to(users::update_user))
                        .route(web::delete().to(users::delete_user)),
                )
                .route("/{id}/restore", web::post().to(users::restore_user)),
        )
        .service(
            web::scope("/posts")
                .service(
                    web::resource("")
                        .route(web::get().to(posts::list_posts))
                        .route(web::post().to(posts::create_post)),
                )
                .route("/author/{author_id}", web::get().to(posts::list_by_author))
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(posts::get_post))
                        .route(web::put().to(posts::update_post))
                        .route(web::delete().to(posts::delete_post)),
                )
                .route("/{id}/restore", web::post().to(posts::restore_post))
                .route("/{id}/comments", web::get().to(posts::list_comments)),
        )
        .service(
            web::scope("/comments")
                .route("", web::post().to(comments::create_comment))
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(comments::get_comment))
                        .route(web::put().to(comments::update_comment))
                        .route(web::delete().to(comments::delete_comment)),
                )
                .route("/{id}/restore", web::post().to(comments::restore_comment)),
        )
        .service(
            web::scope("/tags")
                .service(
                    web::resource("")
                        .route(web::get().to(tags::list_tags))
                        .route(web::post().to(tags::create_tag)),
                )
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(tags::get_tag))
                        .route(web::put().to(tags::update_tag))
                        .route(web::delete().to(tags::delete_tag)),
                )
                .route("/{id}/restore", web::post().to(tags::restore_tag)),
        );
}
