pub mod admin;
pub mod application;
pub mod event;
pub mod host;
pub mod user;

use actix_web::http::StatusCode;
use actix_web::web::{delete, get, patch, post, put, scope, Data, JsonConfig, PathConfig, QueryConfig, ServiceConfig};
use actix_web::HttpResponse;

use crate::core::ports::repository::Manager;
use crate::error::Error;
use crate::middlewares::jwt::JWTMiddleware;
use crate::response::Health;

/// Registers every route; the caller provides `Data<M>` as app data.
/// Public routes come first, every route is method-guarded so requests
/// fall through to the authenticated scope.
pub fn configure<M>(jwt_secret: Vec<u8>) -> impl FnOnce(&mut ServiceConfig)
where
    M: Manager + 'static,
{
    move |cfg| {
        cfg.app_data(JsonConfig::default().error_handler(|err, _| Error::InvalidRequestError(err.to_string()).into()))
            .app_data(PathConfig::default().error_handler(|err, _| Error::InvalidRequestError(err.to_string()).into()))
            .app_data(QueryConfig::default().error_handler(|err, _| Error::InvalidRequestError(err.to_string()).into()))
            .route("/health", get().to(health::<M>))
            .route("/events", get().to(event::list::<M>))
            .route("/events/{id}", get().to(event::get::<M>))
            .service(
                scope("")
                    .wrap(JWTMiddleware::new(jwt_secret))
                    .service(
                        scope("/host-applications")
                            .route("", post().to(application::submit::<M>))
                            .route("", get().to(application::list::<M>))
                            .route("/mine", get().to(application::mine::<M>))
                            .route("/{id}", patch().to(application::review::<M>)),
                    )
                    .route("/events", post().to(event::create::<M>))
                    .route("/events/{id}", patch().to(event::update::<M>))
                    .route("/events/{id}", delete().to(event::delete::<M>))
                    .route("/events/{id}/status", patch().to(event::update_status::<M>))
                    .route("/users/me/roles", get().to(user::roles::<M>))
                    .route("/hosts/me", get().to(host::me::<M>))
                    .route("/admin/host-summary", get().to(admin::host_summary::<M>))
                    .route("/admin/users", get().to(admin::users::<M>))
                    .route("/admin/users/{id}", put().to(admin::update_user::<M>))
                    .route("/admin/users/{id}", delete().to(admin::remove_user::<M>)),
            );
    }
}

pub async fn health<M>(manager: Data<M>) -> HttpResponse
where
    M: Manager + 'static,
{
    match manager.ping().await {
        Ok(()) => HttpResponse::Ok().json(Health { ok: true, db: "up" }),
        Err(e) => {
            log::error!("health check failed: {}", e);
            HttpResponse::build(StatusCode::SERVICE_UNAVAILABLE).json(Health { ok: false, db: "down" })
        }
    }
}
