use crate::{
    api::{inventory, salary, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::ApiError,
    store::{EmployeeStore, InventoryStore, SalaryStore, UserStore},
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

// Helper to build per-route limiter config
fn limiter_config(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
    let burst = requests_per_min.max(1);
    let per_ms = (60_000 / burst as u64).max(1);
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(burst)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst are non-zero")
}

/// Malformed or mistyped JSON bodies become `400 {"message": ...}`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ApiError::bad_request(err.to_string()).into())
}

pub fn configure<S>(cfg: &mut web::ServiceConfig, config: &Config)
where
    S: EmployeeStore + SalaryStore + UserStore + InventoryStore + 'static,
{
    let login_limiter = limiter_config(config.rate_login_per_min);
    let protected_limiter = limiter_config(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth").service(
            web::resource("/login")
                .wrap(Governor::new(&login_limiter))
                .route(web::post().to(handlers::login::<S>)),
        ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(&protected_limiter)) // rate limiting
            .service(
                web::scope("/salary")
                    .route("/create", web::post().to(salary::create_salary::<S>))
                    .route("/update", web::post().to(salary::update_salary::<S>))
                    .route("/{id}", web::get().to(salary::get_salary::<S>)),
            )
            .service(web::scope("/user").route("/create", web::post().to(user::create_user::<S>)))
            .service(
                web::scope("/inventory")
                    .route("", web::get().to(inventory::list_items::<S>))
                    .route("/create", web::post().to(inventory::create_item::<S>))
                    .route("/borrow", web::post().to(inventory::borrow_item::<S>))
                    .route("/return", web::post().to(inventory::return_item::<S>))
                    .route("/{id}", web::get().to(inventory::get_item::<S>)),
            ),
    );
}
