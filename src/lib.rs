pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::clock::{SystemClock, UuidGen};
use application::order_service::OrderService;
use infrastructure::order_repo::DieselOrderRepository;
use infrastructure::outbox_notifier::OutboxPaymentNotifier;
use infrastructure::product_catalog::DieselProductCatalog;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// The order service wired to its production adapters.
pub type AppService = OrderService<
    DieselProductCatalog,
    DieselOrderRepository,
    OutboxPaymentNotifier,
    SystemClock,
    UuidGen,
>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) {
    let mut conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");
}

/// Wire the orchestrators to the diesel adapters and the outbox.
pub fn build_service(pool: &DbPool, payment_queue: &str) -> AppService {
    OrderService::new(
        DieselProductCatalog::new(pool.clone()),
        DieselOrderRepository::new(pool.clone()),
        OutboxPaymentNotifier::new(pool.clone()),
        SystemClock,
        UuidGen,
        payment_queue.to_string(),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::search_orders,
        handlers::orders::update_order_status,
    ),
    components(schemas(
        handlers::orders::CreateOrderRequest,
        handlers::orders::OrderItemRequest,
        handlers::orders::CreateOrderResponse,
        handlers::orders::UpdateOrderStatusRequest,
        handlers::orders::UpdateOrderStatusResponse,
        handlers::orders::OrderSummaryResponse,
        domain::order::Payment,
    )),
    tags((name = "orders", description = "Order lifecycle operations"))
)]
struct ApiDoc;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: AppService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(service);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .wrap(Logger::default())
            .route("/health", web::get().to(handlers::health::health))
            .service(
                web::scope("/orders")
                    .route("", web::post().to(handlers::orders::create_order))
                    .route("", web::get().to(handlers::orders::search_orders))
                    .route(
                        "/{id}/status",
                        web::patch().to(handlers::orders::update_order_status),
                    ),
            )
            .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()))
    })
    .bind((host.to_string(), port))?
    .run())
}
