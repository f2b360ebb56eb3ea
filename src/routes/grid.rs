use actix_web::web;

use crate::handlers::grid;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/grid")
            .route("/render", web::post().to(grid::render_grid))
            .route("/badge", web::get().to(grid::classify)),
    );
}
