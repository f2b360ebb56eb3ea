use actix_web::web;

use crate::handlers::sessions;

/// Largest spreadsheet accepted on upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sessions")
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_BYTES))
            .route("", web::post().to(sessions::create_session))
            .route("/{id}", web::get().to(sessions::get_session))
            .route("/{id}", web::delete().to(sessions::delete_session))
            .route("/{id}/upload", web::post().to(sessions::upload))
            .route("/{id}/generate", web::post().to(sessions::generate))
            .route("/{id}/download", web::post().to(sessions::download))
            .route("/{id}/settings", web::put().to(sessions::update_settings))
            .route("/{id}/calendar", web::put().to(sessions::select_calendar))
            .route(
                "/{id}/presets/{name}",
                web::post().to(sessions::apply_preset),
            )
            .route("/{id}/grid", web::get().to(sessions::get_grid)),
    );
}
