//! # Vendas Web Server
//!
//! The four HTTP servers: the products, customers and sales services, and the
//! dashboard gateway that fans out over them.

use aggregator::DashboardService;
use api_client::{CatalogClient, Lookup};
use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use configuration::Settings;
use core_types::{Customer, Product, Sale, Source};
use executor::OffloadExecutor;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use store::Repository;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod dashboard;
pub mod error;
pub mod extract;
pub mod handlers;

pub struct ProductsState {
    pub products: Repository<Product>,
    pub executor: Arc<OffloadExecutor>,
}

pub struct CustomersState {
    pub customers: Repository<Customer>,
    pub executor: Arc<OffloadExecutor>,
}

pub struct SalesState {
    pub sales: Repository<Sale>,
    pub executor: Arc<OffloadExecutor>,
    /// Where customers and products are looked up when a sale is recorded.
    pub catalog: Arc<dyn Lookup>,
    pub lookup_timeout: Duration,
}

pub struct DashboardState {
    pub dashboard: DashboardService,
}

/// Which server `run_service` starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Products,
    Customers,
    Sales,
    Dashboard,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Products => Source::Products.service_name(),
            Service::Customers => Source::Customers.service_name(),
            Service::Sales => Source::Sales.service_name(),
            Service::Dashboard => "dashboard",
        };
        f.write_str(name)
    }
}

pub fn products_router(state: Arc<ProductsState>) -> Router {
    let app = Router::new()
        .route(
            "/produtos",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/produtos/:id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/estatisticas", get(handlers::product_statistics))
        .route("/saude", get(|| handlers::health(Source::Products)))
        .with_state(state);
    with_layers(app)
}

pub fn customers_router(state: Arc<CustomersState>) -> Router {
    let app = Router::new()
        .route(
            "/clientes",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/clientes/:id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route("/estatisticas", get(handlers::customer_statistics))
        .route("/saude", get(|| handlers::health(Source::Customers)))
        .with_state(state);
    with_layers(app)
}

pub fn sales_router(state: Arc<SalesState>) -> Router {
    let app = Router::new()
        .route(
            "/vendas",
            get(handlers::list_sales).post(handlers::create_sale),
        )
        .route("/vendas/:id", get(handlers::get_sale))
        .route("/estatisticas", get(handlers::sale_statistics))
        .route("/saude", get(|| handlers::health(Source::Sales)))
        .with_state(state);
    with_layers(app)
}

pub fn dashboard_router(state: Arc<DashboardState>) -> Router {
    let app = Router::new()
        .route("/api/dashboard", get(dashboard::get_dashboard))
        .route("/api/saude", get(dashboard::get_health))
        .with_state(state);
    with_layers(app)
}

/// Permissive CORS (every server is called from a browser), request tracing
/// and a body limit.
fn with_layers(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Builds the router for `service` from the settings, seeding the store.
pub fn build_router(service: Service, settings: &Settings) -> anyhow::Result<Router> {
    let router = match service {
        Service::Products => products_router(Arc::new(ProductsState {
            products: Repository::new(store::seed::products()),
            executor: Arc::new(OffloadExecutor::new(&settings.offload)?),
        })),
        Service::Customers => customers_router(Arc::new(CustomersState {
            customers: Repository::new(store::seed::customers()),
            executor: Arc::new(OffloadExecutor::new(&settings.offload)?),
        })),
        Service::Sales => sales_router(Arc::new(SalesState {
            sales: Repository::default(),
            executor: Arc::new(OffloadExecutor::new(&settings.offload)?),
            catalog: Arc::new(CatalogClient::from_config(&settings.upstream)?),
            lookup_timeout: settings.upstream.lookup_timeout(),
        })),
        Service::Dashboard => dashboard_router(Arc::new(DashboardState {
            dashboard: DashboardService::from_settings(settings)?,
        })),
    };
    Ok(router)
}

/// Binds the address configured for `service` and serves until the process exits.
pub async fn run_service(service: Service, settings: &Settings) -> anyhow::Result<()> {
    let addr = match service {
        Service::Products => settings.server.bind_addr(Source::Products),
        Service::Customers => settings.server.bind_addr(Source::Customers),
        Service::Sales => settings.server.bind_addr(Source::Sales),
        Service::Dashboard => settings.server.dashboard,
    };
    let app = build_router(service, settings)?;
    serve(app, addr, service).await
}

pub async fn serve(app: Router, addr: SocketAddr, service: Service) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%service, "Web server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
