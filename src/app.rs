//! app.rs
use crate::handlers::{configuration_handler, log_handler, sync_handler};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/configurations")
                    .route(
                        "",
                        web::get().to(configuration_handler::list_configurations_endpoint),
                    )
                    .route(
                        "/defaults",
                        web::post().to(configuration_handler::initialize_defaults_endpoint),
                    )
                    .route(
                        "/{service}",
                        web::get().to(configuration_handler::get_configuration_endpoint),
                    )
                    .route(
                        "/{service}",
                        web::put().to(configuration_handler::save_configuration_endpoint),
                    )
                    .route(
                        "/{service}/test",
                        web::post().to(configuration_handler::test_connection_endpoint),
                    ),
            )
            .service(
                web::scope("/sync")
                    .route("/{direction}", web::post().to(sync_handler::run_sync_endpoint)),
            )
            .service(
                web::scope("/logs")
                    .route("", web::get().to(log_handler::list_logs_endpoint))
                    .route("", web::delete().to(log_handler::clear_logs_endpoint))
                    .route("/stats", web::get().to(log_handler::log_stats_endpoint)),
            ),
    );
}
