pub mod games;
pub mod health;
pub mod media;

use actix_web::web;

use crate::ws::session;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .service(web::scope("/api/games").configure(games::configure_routes))
        .service(web::scope("/api/media").configure(media::configure_routes))
        .service(
            web::resource("/ws/games/{game_id}/{player_id}")
                .route(web::get().to(session::upgrade)),
        );
}
