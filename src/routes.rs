//! Route configuration
//!
//! Centralized route setup; each domain manages its own routes.
use actix_web::web;

use crate::handlers;
use crate::middleware::SessionGuard;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health::health_check))
            .configure(routes::users::configure)
            .configure(routes::videos::configure)
            .configure(routes::subscriptions::configure)
            .configure(routes::comments::configure),
    );
}

// Sub-modules for each domain
mod routes {
    use super::*;

    pub mod users {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/users")
                    .route("/register", web::post().to(handlers::users::register))
                    .route("/login", web::post().to(handlers::users::login))
                    .route(
                        "/refreshToken",
                        web::post().to(handlers::users::refresh_token),
                    )
                    .service(
                        web::scope("")
                            .wrap(SessionGuard)
                            .route("/logout", web::post().to(handlers::users::logout))
                            .route(
                                "/changePassword",
                                web::patch().to(handlers::users::change_password),
                            )
                            .route(
                                "/currentUser",
                                web::get().to(handlers::users::current_user),
                            )
                            .route(
                                "/updateAccountDetails",
                                web::patch().to(handlers::users::update_account),
                            )
                            .route("/avatar", web::patch().to(handlers::users::update_avatar))
                            .route(
                                "/coverImage",
                                web::patch().to(handlers::users::update_cover_image),
                            )
                            .route(
                                "/c/{username}",
                                web::get().to(handlers::users::channel_profile),
                            )
                            .route("/history", web::get().to(handlers::users::watch_history)),
                    ),
            );
        }
    }

    pub mod videos {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/videos")
                    .route("", web::get().to(handlers::videos::list))
                    .route("/{id}", web::get().to(handlers::videos::get))
                    .service(
                        web::scope("")
                            .wrap(SessionGuard)
                            .route("", web::post().to(handlers::videos::publish))
                            .route("/{id}", web::patch().to(handlers::videos::update))
                            .route("/{id}", web::delete().to(handlers::videos::delete))
                            .route(
                                "/{id}/togglePublish",
                                web::patch().to(handlers::videos::toggle_publish),
                            ),
                    ),
            );
        }
    }

    pub mod subscriptions {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/subscriptions")
                    .wrap(SessionGuard)
                    .route(
                        "/c/{channelId}/toggle",
                        web::post().to(handlers::subscriptions::toggle),
                    )
                    .route(
                        "/c/{channelId}/subscribers",
                        web::get().to(handlers::subscriptions::subscribers),
                    )
                    .route(
                        "/u/{subscriberId}/channels",
                        web::get().to(handlers::subscriptions::subscribed_channels),
                    ),
            );
        }
    }

    pub mod comments {
        use super::*;
        pub fn configure(cfg: &mut web::ServiceConfig) {
            cfg.service(
                web::scope("/comments")
                    .wrap(SessionGuard)
                    .route("/{videoId}", web::get().to(handlers::comments::list))
                    .route("/{videoId}", web::post().to(handlers::comments::create))
                    .route("/c/{commentId}", web::patch().to(handlers::comments::update))
                    .route(
                        "/c/{commentId}",
                        web::delete().to(handlers::comments::delete),
                    ),
            );
        }
    }
}
