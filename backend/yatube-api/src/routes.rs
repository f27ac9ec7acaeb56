/// Route table shared by the binary and the integration tests.
use actix_web::{guard, web, Route};

use crate::handlers;
use crate::metrics;
use crate::middleware::Authentication;

/// Read route answering both GET and HEAD.
fn read() -> Route {
    web::route().guard(guard::Any(guard::Get()).or(guard::Head()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", read().to(metrics::serve_metrics))
        // Health check endpoints
        .route("/api/v1/health", read().to(handlers::health_summary))
        .route("/api/v1/health/ready", read().to(handlers::readiness_summary))
        .route("/api/v1/health/live", read().to(handlers::liveness_check))
        .service(
            web::scope("/api/v1")
                .wrap(Authentication)
                .service(
                    web::resource("/posts")
                        .route(read().to(handlers::list_posts))
                        .route(web::post().to(handlers::create_post)),
                )
                .service(
                    web::resource("/posts/{post_id}")
                        .route(read().to(handlers::get_post))
                        .route(web::put().to(handlers::update_post))
                        .route(web::patch().to(handlers::partial_update_post))
                        .route(web::delete().to(handlers::delete_post)),
                )
                .service(
                    web::resource("/posts/{post_id}/comments")
                        .route(read().to(handlers::list_comments))
                        .route(web::post().to(handlers::create_comment)),
                )
                .service(
                    web::resource("/posts/{post_id}/comments/{comment_id}")
                        .route(read().to(handlers::get_comment))
                        .route(web::put().to(handlers::update_comment))
                        .route(web::patch().to(handlers::partial_update_comment))
                        .route(web::delete().to(handlers::delete_comment)),
                )
                .service(web::resource("/groups").route(read().to(handlers::list_groups)))
                .service(
                    web::resource("/groups/{group_id}").route(read().to(handlers::get_group)),
                )
                .service(
                    web::resource("/follow")
                        .route(read().to(handlers::list_follows))
                        .route(web::post().to(handlers::create_follow)),
                )
                .service(
                    web::resource("/follow/{follow_id}").route(read().to(handlers::get_follow)),
                ),
        );
}
