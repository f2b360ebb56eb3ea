use actix_web::web;

use crate::handlers::presets;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/presets")
            .route("", web::get().to(presets::list_presets))
            .route("/{name}", web::get().to(presets::get_preset))
            .route("/{name}", web::put().to(presets::save_preset))
            .route("/{name}", web::delete().to(presets::delete_preset)),
    );
}
