mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::{Config, StorageBackend, StoreBackend};
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::categories::models::Category;
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::dashboard::{routes as dashboard_routes, DashboardService};
use crate::features::messages::models::Message;
use crate::features::messages::{routes as messages_routes, MessageService};
use crate::features::orders::models::Order;
use crate::features::orders::{routes as orders_routes, OrderService};
use crate::features::products::models::Product;
use crate::features::products::{routes as products_routes, ProductService};
use crate::modules::catalog::{MemoryRepository, PgRepository, Repository};
use crate::modules::storage::{MemoryStorage, MinIOClient, ObjectStorage};
use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// One repository per resource kind, all on the same backend
struct Repositories {
    categories: Arc<dyn Repository<Category>>,
    products: Arc<dyn Repository<Product>>,
    orders: Arc<dyn Repository<Order>>,
    messages: Arc<dyn Repository<Message>>,
}

impl Repositories {
    fn postgres(pool: PgPool) -> Self {
        Self {
            categories: Arc::new(PgRepository::<Category>::new(pool.clone())),
            products: Arc::new(PgRepository::<Product>::new(pool.clone())),
            orders: Arc::new(PgRepository::<Order>::new(pool.clone())),
            messages: Arc::new(PgRepository::<Message>::new(pool)),
        }
    }

    fn memory() -> Self {
        Self {
            categories: Arc::new(MemoryRepository::<Category>::new()),
            products: Arc::new(MemoryRepository::<Product>::new()),
            orders: Arc::new(MemoryRepository::<Order>::new()),
            messages: Arc::new(MemoryRepository::<Message>::new()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "System info: tokio_worker_threads={}, pid={}",
        worker_threads,
        std::process::id()
    );
    tracing::info!("Configuration loaded successfully");

    let repositories = match config.store.backend {
        StoreBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
            let pool = database::create_pool(&config.database, url).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            database::run_migrations(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Database migrations completed successfully");

            Repositories::postgres(pool)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store: data is lost on restart");
            Repositories::memory()
        }
    };

    let storage: Arc<dyn ObjectStorage> = match config.storage.backend {
        StorageBackend::MinIO => Arc::new(
            MinIOClient::new(config.minio.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
        ),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory image storage: uploads are lost on restart");
            Arc::new(MemoryStorage::new())
        }
    };

    let category_service = Arc::new(CategoryService::new(
        repositories.categories,
        Arc::clone(&storage),
    ));
    let product_service = Arc::new(ProductService::new(
        repositories.products,
        category_service.catalog().clone(),
        Arc::clone(&storage),
    ));
    let order_service = Arc::new(OrderService::new(repositories.orders));
    let message_service = Arc::new(MessageService::new(repositories.messages));
    let dashboard_service = Arc::new(DashboardService::new(
        order_service.catalog().clone(),
        message_service.catalog().clone(),
        category_service.catalog().clone(),
    ));
    tracing::info!("Catalog services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    let api_routes = Router::new()
        .merge(categories_routes::routes(category_service))
        .merge(products_routes::routes(product_service))
        .merge(orders_routes::routes(order_service))
        .merge(messages_routes::routes(message_service))
        .merge(dashboard_routes::routes(dashboard_service));

    let app = middleware::apply_http_layers(
        Router::new()
            .merge(swagger)
            .merge(api_routes)
            .merge(health_route),
        &config.app,
    );

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    socket.set_nodelay(true)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
